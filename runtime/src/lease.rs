//! Leadership lease wiring, grounded on the teacher's `runtime/src/lease.rs`:
//! apply-or-adopt a `coordination.k8s.io/v1 Lease` object, then hand its
//! claim updates to `kubert::lease::LeaseManager` for renewal.

use anyhow::Result;
use k8s_openapi::api::coordination::v1 as coordv1;
use kube::api::{Patch, PatchParams};
use ridgeway_ingress_k8s_api::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const LEASE_DURATION: Duration = Duration::from_secs(30);
const RENEW_GRACE_PERIOD: Duration = Duration::from_secs(1);

pub async fn init(
    client: Client,
    namespace: &str,
    lease_name: &str,
    claimant: &str,
) -> Result<watch::Receiver<Arc<kubert::lease::Claim>>> {
    let lease = coordv1::Lease {
        metadata: k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta {
            name: Some(lease_name.to_string()),
            namespace: Some(namespace.to_string()),
            resource_version: Some("0".to_string()),
            ..Default::default()
        },
        spec: None,
    };

    let api = kube::Api::<coordv1::Lease>::namespaced(client, namespace);
    match api
        .patch(
            lease_name,
            &PatchParams {
                field_manager: Some("ridgeway-ingress".to_string()),
                ..Default::default()
            },
            &Patch::Apply(lease),
        )
        .await
    {
        Ok(_) => tracing::info!(%lease_name, "created write lease"),
        Err(kube::Error::Api(_)) => tracing::debug!(%lease_name, "write lease already exists"),
        Err(e) => return Err(e.into()),
    }

    let params = kubert::lease::ClaimParams {
        lease_duration: LEASE_DURATION,
        renew_grace_period: RENEW_GRACE_PERIOD,
    };
    let (claims, _task) = kubert::lease::LeaseManager::init(api, lease_name).await?.spawn(claimant, params).await?;
    Ok(claims)
}
