//! Post-reload status write sweep — this port's resolution of §4.D's
//! "invoke status updater inline from the reconciler" into something that
//! doesn't require `ridgeway-ingress-k8s-index` to depend on
//! `ridgeway-ingress-k8s-status`. After every applied reload, the
//! orchestrator (component G) walks the store's currently-claimed
//! resources and emits one `Update` per resource, mirroring the
//! conditions the inline version would have computed (same idempotent
//! upsert semantics, same leadership gate — see DESIGN.md).

use ridgeway_ingress_k8s_api::{ControllerConfig, ResourceExt};
use ridgeway_ingress_k8s_index::claim::{gateway_claimed, http_route_claimed, ingress_claimed, resolve_parent_ref};
use ridgeway_ingress_k8s_index::ResourceStore;
use ridgeway_ingress_k8s_status::httproute::ParentRefKey;
use ridgeway_ingress_k8s_status::{AcceptedStatus, Update};
use ridgeway_ingress_k8s_status_controller::UpdateSender;

const REASON_ACCEPTED: &str = "Accepted";

pub fn sweep(store: &ResourceStore, cfg: &ControllerConfig, tx: &UpdateSender) {
    for ingress in store.list_ingresses() {
        if !ingress_claimed(&ingress, cfg) {
            continue;
        }
        let Some(namespace) = ingress.namespace() else {
            continue;
        };
        let _ = tx.send(Update::Ingress {
            namespace,
            name: ingress.name_any(),
            publish_address: cfg.publish_address.clone(),
        });
    }

    for gc in store.list_gateway_classes() {
        if gc.spec.controller_name != cfg.controller_name {
            continue;
        }
        let _ = tx.send(Update::GatewayClass {
            name: gc.name_any(),
            status: AcceptedStatus {
                observed_generation: gc.metadata.generation.unwrap_or(0),
                accepted: true,
                reason: REASON_ACCEPTED.to_string(),
                message: "recognized by this controller".to_string(),
            },
        });
    }

    for gw in store.list_gateways() {
        if !gateway_claimed(&gw, store, cfg) {
            continue;
        }
        let Some(namespace) = gw.namespace() else {
            continue;
        };
        let _ = tx.send(Update::Gateway {
            namespace,
            name: gw.name_any(),
            status: AcceptedStatus {
                observed_generation: gw.metadata.generation.unwrap_or(0),
                accepted: true,
                reason: REASON_ACCEPTED.to_string(),
                message: "claimed by this controller".to_string(),
            },
        });
    }

    for route in store.list_http_routes() {
        if !http_route_claimed(&route, store, cfg) {
            continue;
        }
        let Some(namespace) = route.namespace() else {
            continue;
        };
        let name = route.name_any();
        for pr in route.spec.parent_refs.iter().flatten() {
            let parent = resolve_parent_ref(&namespace, pr);
            if parent.kind != "Gateway" {
                continue;
            }
            let Some(gw) = store.get_gateway(&parent.namespace, &parent.name) else {
                continue;
            };
            if !gateway_claimed(&gw, store, cfg) {
                continue;
            }
            let _ = tx.send(Update::HttpRoute {
                namespace: namespace.clone(),
                name: name.clone(),
                parent: ParentRefKey {
                    group: parent.group.clone(),
                    name: parent.name.clone(),
                },
                controller_name: cfg.controller_name.clone(),
                status: AcceptedStatus {
                    observed_generation: route.metadata.generation.unwrap_or(0),
                    accepted: true,
                    reason: REASON_ACCEPTED.to_string(),
                    message: "claimed by this controller".to_string(),
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::networking::v1::{Ingress, IngressSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[tokio::test]
    async fn unclaimed_ingress_produces_no_update() {
        let store = ResourceStore::new();
        let cfg = ControllerConfig {
            ingress_class: "ridgeway".to_string(),
            ..Default::default()
        };
        store.set_ingress(
            "default",
            "other",
            Ingress {
                metadata: ObjectMeta {
                    namespace: Some("default".to_string()),
                    name: Some("other".to_string()),
                    ..Default::default()
                },
                spec: Some(IngressSpec {
                    ingress_class_name: Some("nginx".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        sweep(&store, &cfg, &tx);
        drop(tx);
        assert!(rx.recv().await.is_none());
    }
}
