//! Channel-decoupled status patch executor, grounded on the teacher's
//! `k8s/status-controller` crate boundary: `ridgeway-ingress-k8s-status`
//! owns the pure condition/builder logic, this crate owns the only I/O —
//! draining an `Update` channel and issuing JSON merge-patch status
//! writes. API errors are logged and discarded, never propagated to abort
//! the pipeline (§7).

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use kube::api::{Patch, PatchParams};
use ridgeway_ingress_k8s_api::{gateway, Client, Ingress};
use ridgeway_ingress_k8s_status::condition::{accepted_condition, set_condition};
use ridgeway_ingress_k8s_status::httproute::{upsert_route_parent_status, ParentRefKey};
use ridgeway_ingress_k8s_status::ingress::desired_load_balancer_ingress;
use ridgeway_ingress_k8s_status::{AcceptedStatus, StatusUpdateError, Update};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

pub type UpdateSender = mpsc::UnboundedSender<Update>;

/// §4.H's `status_patches_total{kind,outcome}` counter. Implemented by the
/// orchestrator's metrics registry in `ridgeway-ingress-runtime`; kept as a
/// trait here so this crate doesn't need to depend on `prometheus-client`
/// or the registry that owns it.
pub trait StatusPatchMetrics: Send + Sync {
    fn record_status_patch(&self, kind: &str, outcome: &str);
}

pub struct Controller {
    client: Client,
    rx: mpsc::UnboundedReceiver<Update>,
    metrics: Arc<dyn StatusPatchMetrics>,
}

impl Controller {
    pub fn new(client: Client, metrics: Arc<dyn StatusPatchMetrics>) -> (UpdateSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { client, rx, metrics })
    }

    /// Drains the channel until every sender is dropped. Mirrors the
    /// teacher's `process_patches` loop.
    pub async fn run(mut self) {
        while let Some(update) = self.rx.recv().await {
            let kind = update_kind(&update);
            match self.process(update).await {
                Ok(()) => self.metrics.record_status_patch(kind, "applied"),
                Err(e) => {
                    self.metrics.record_status_patch(kind, "error");
                    tracing::warn!(error = %e, "status update failed");
                }
            }
        }
    }

    async fn process(&self, update: Update) -> Result<(), StatusUpdateError> {
        match update {
            Update::Ingress {
                namespace,
                name,
                publish_address,
            } => self.patch_ingress(&namespace, &name, &publish_address).await,
            Update::GatewayClass { name, status } => self.patch_gateway_class(&name, status).await,
            Update::Gateway { namespace, name, status } => {
                self.patch_gateway(&namespace, &name, status).await
            }
            Update::HttpRoute {
                namespace,
                name,
                parent,
                controller_name,
                status,
            } => {
                self.patch_http_route(&namespace, &name, parent, &controller_name, status)
                    .await
            }
        }
    }

    async fn patch_ingress(&self, namespace: &str, name: &str, publish_address: &str) -> Result<(), StatusUpdateError> {
        let Some(lb) = desired_load_balancer_ingress(publish_address) else {
            return Ok(());
        };
        let api: kube::Api<Ingress> = kube::Api::namespaced(self.client.clone(), namespace);
        let current = api.get_status(name).await.map_err(|cause| StatusUpdateError {
            resource: format!("Ingress {namespace}/{name}"),
            cause,
        })?;
        let current_ingress = current
            .status
            .and_then(|s| s.load_balancer)
            .and_then(|lb| lb.ingress)
            .unwrap_or_default();
        if current_ingress == vec![lb.clone()] {
            // Already current (§4.F): no-op rather than a redundant patch.
            return Ok(());
        }
        let patch = json!({
            "status": {
                "loadBalancer": {
                    "ingress": [lb],
                }
            }
        });
        api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map(|_| ())
            .map_err(|cause| StatusUpdateError {
                resource: format!("Ingress {namespace}/{name}"),
                cause,
            })
    }

    async fn patch_gateway_class(&self, name: &str, status: AcceptedStatus) -> Result<(), StatusUpdateError> {
        let api: kube::Api<gateway::GatewayClass> = kube::Api::all(self.client.clone());
        let current = api.get_status(name).await.map_err(|cause| StatusUpdateError {
            resource: format!("GatewayClass {name}"),
            cause,
        })?;
        let mut conditions: Vec<Condition> = current.status.and_then(|s| s.conditions).unwrap_or_default();
        set_condition(
            &mut conditions,
            accepted_condition(status.observed_generation, status.accepted, &status.reason, &status.message),
        );
        let patch = json!({ "status": { "conditions": conditions } });
        api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map(|_| ())
            .map_err(|cause| StatusUpdateError {
                resource: format!("GatewayClass {name}"),
                cause,
            })
    }

    async fn patch_gateway(&self, namespace: &str, name: &str, status: AcceptedStatus) -> Result<(), StatusUpdateError> {
        let api: kube::Api<gateway::Gateway> = kube::Api::namespaced(self.client.clone(), namespace);
        let current = api.get_status(name).await.map_err(|cause| StatusUpdateError {
            resource: format!("Gateway {namespace}/{name}"),
            cause,
        })?;
        let mut conditions: Vec<Condition> = current.status.and_then(|s| s.conditions).unwrap_or_default();
        set_condition(
            &mut conditions,
            accepted_condition(status.observed_generation, status.accepted, &status.reason, &status.message),
        );
        let patch = json!({ "status": { "conditions": conditions } });
        api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map(|_| ())
            .map_err(|cause| StatusUpdateError {
                resource: format!("Gateway {namespace}/{name}"),
                cause,
            })
    }

    async fn patch_http_route(
        &self,
        namespace: &str,
        name: &str,
        parent: ParentRefKey,
        controller_name: &str,
        status: AcceptedStatus,
    ) -> Result<(), StatusUpdateError> {
        let api: kube::Api<gateway::HTTPRoute> = kube::Api::namespaced(self.client.clone(), namespace);
        let current = api.get_status(name).await.map_err(|cause| StatusUpdateError {
            resource: format!("HTTPRoute {namespace}/{name}"),
            cause,
        })?;
        let mut parents = current.status.map(|s| s.parents).unwrap_or_default();
        upsert_route_parent_status(
            &mut parents,
            parent,
            controller_name,
            status.observed_generation,
            status.accepted,
            &status.reason,
            &status.message,
        );
        let patch = json!({ "status": { "parents": parents } });
        api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map(|_| ())
            .map_err(|cause| StatusUpdateError {
                resource: format!("HTTPRoute {namespace}/{name}"),
                cause,
            })
    }
}

fn update_kind(update: &Update) -> &'static str {
    match update {
        Update::Ingress { .. } => "Ingress",
        Update::GatewayClass { .. } => "GatewayClass",
        Update::Gateway { .. } => "Gateway",
        Update::HttpRoute { .. } => "HTTPRoute",
    }
}
