//! Watch-driven reconcilers (component D): one per watched Kind, each
//! implementing `kubert::index::IndexNamespacedResource<K>` the way the
//! teacher's `k8s/index/src/index.rs` does — `apply`/`delete` pairs that
//! mutate the store and signal the debounce trigger, with no direct
//! cluster round-trips (the watch framework's informer cache already
//! supplies "current state for key").

use crate::claim::{gateway_claimed, gateway_class_claimed, http_route_claimed, ingress_claimed, secret_claimed};
use crate::store::ResourceStore;
use kubert::index::IndexNamespacedResource;
use ridgeway_ingress_k8s_api::{gateway, gateway_beta, ControllerConfig, EndpointSlice, Ingress, Secret, Service};
use std::sync::Arc;

/// Abstraction over "coalesce and eventually re-derive the runway config".
/// Implemented by the orchestrator in `ridgeway-ingress-runtime`; kept as a
/// trait here so this crate never depends on the debounce/reload machinery
/// it doesn't own.
pub trait ReloadTrigger: Send + Sync {
    fn trigger_reload(&self);
}

/// §4.H's `reconciles_total{kind}` counter. Implemented by the
/// orchestrator's metrics registry in `ridgeway-ingress-runtime`, same
/// reasoning as `ReloadTrigger`: this crate doesn't own the metrics
/// registry it reports into.
pub trait ReconcileMetrics: Send + Sync {
    fn record_reconcile(&self, kind: &str);
}

/// Shared state every per-Kind reconciler consults: the store to mutate,
/// the controller configuration for ownership filters, the reload trigger
/// to signal, and the metrics sink to report into.
#[derive(Clone)]
pub struct Index {
    store: ResourceStore,
    cfg: Arc<ControllerConfig>,
    trigger: Arc<dyn ReloadTrigger>,
    metrics: Arc<dyn ReconcileMetrics>,
}

impl Index {
    pub fn new(
        store: ResourceStore,
        cfg: Arc<ControllerConfig>,
        trigger: Arc<dyn ReloadTrigger>,
        metrics: Arc<dyn ReconcileMetrics>,
    ) -> Self {
        Self { store, cfg, trigger, metrics }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }
}

impl IndexNamespacedResource<Ingress> for Index {
    fn apply(&mut self, ingress: Ingress) {
        self.metrics.record_reconcile("Ingress");
        let namespace = ingress.metadata.namespace.clone().unwrap_or_default();
        let name = ingress.metadata.name.clone().unwrap_or_default();
        if ingress_claimed(&ingress, &self.cfg) {
            self.store.set_ingress(&namespace, &name, ingress);
            self.trigger.trigger_reload();
        } else {
            // Not owned: purge and return without reload (§4.D step 4) — an
            // Ingress this controller never claimed can't be in the current
            // config, so there's nothing for a reload to remove.
            self.store.delete_ingress(&namespace, &name);
        }
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.metrics.record_reconcile("Ingress");
        self.store.delete_ingress(&namespace, &name);
        self.trigger.trigger_reload();
    }
}

impl IndexNamespacedResource<gateway::Gateway> for Index {
    fn apply(&mut self, gw: gateway::Gateway) {
        self.metrics.record_reconcile("Gateway");
        let namespace = gw.metadata.namespace.clone().unwrap_or_default();
        let name = gw.metadata.name.clone().unwrap_or_default();
        // Claim evaluation consults the GatewayClass already in the store;
        // always store first so a GatewayClass arriving afterwards can
        // still see this Gateway on the next reconcile of either kind.
        self.store.set_gateway(&namespace, &name, gw.clone());
        if gateway_claimed(&gw, &self.store, &self.cfg) {
            self.trigger.trigger_reload();
        } else {
            // Not owned: purge and return without reload (§4.D step 4).
            self.store.delete_gateway(&namespace, &name);
        }
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.metrics.record_reconcile("Gateway");
        self.store.delete_gateway(&namespace, &name);
        self.trigger.trigger_reload();
    }
}

impl IndexNamespacedResource<gateway::HTTPRoute> for Index {
    fn apply(&mut self, route: gateway::HTTPRoute) {
        self.metrics.record_reconcile("HTTPRoute");
        let namespace = route.metadata.namespace.clone().unwrap_or_default();
        let name = route.metadata.name.clone().unwrap_or_default();
        self.store.set_http_route(&namespace, &name, route.clone());
        if http_route_claimed(&route, &self.store, &self.cfg) {
            self.trigger.trigger_reload();
        } else {
            // Not owned: purge and return without reload (§4.D step 4).
            self.store.delete_http_route(&namespace, &name);
        }
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.metrics.record_reconcile("HTTPRoute");
        self.store.delete_http_route(&namespace, &name);
        self.trigger.trigger_reload();
    }
}

impl IndexNamespacedResource<Secret> for Index {
    fn apply(&mut self, secret: Secret) {
        self.metrics.record_reconcile("Secret");
        let namespace = secret.metadata.namespace.clone().unwrap_or_default();
        let name = secret.metadata.name.clone().unwrap_or_default();
        // §4.D step 3: only cache Secrets actually referenced by a claimed
        // Ingress/Gateway's TLS config. A Secret that arrives before its
        // referencing Ingress/Gateway is dropped here and picked back up on
        // the watch framework's periodic resync, same as any other
        // eventually-consistent informer cache.
        if secret_claimed(&namespace, &name, &self.store, &self.cfg) {
            self.store.set_secret(&namespace, &name, secret);
            // The translator re-resolves Secret data from the store on
            // every reload, so a reload trigger is the entire cross-kind
            // requeue Ingresses and Gateways referencing this Secret need.
            self.trigger.trigger_reload();
        } else {
            self.store.delete_secret(&namespace, &name);
        }
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.metrics.record_reconcile("Secret");
        self.store.delete_secret(&namespace, &name);
        self.trigger.trigger_reload();
    }
}

impl IndexNamespacedResource<Service> for Index {
    fn apply(&mut self, service: Service) {
        self.metrics.record_reconcile("Service");
        let namespace = service.metadata.namespace.clone().unwrap_or_default();
        let name = service.metadata.name.clone().unwrap_or_default();
        self.store.set_service(&namespace, &name, service);
        self.trigger.trigger_reload();
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.metrics.record_reconcile("Service");
        self.store.delete_service(&namespace, &name);
        self.trigger.trigger_reload();
    }
}

impl IndexNamespacedResource<EndpointSlice> for Index {
    fn apply(&mut self, slice: EndpointSlice) {
        self.metrics.record_reconcile("EndpointSlice");
        let namespace = slice.metadata.namespace.clone().unwrap_or_default();
        let name = slice.metadata.name.clone().unwrap_or_default();
        self.store.set_endpoint_slice(&namespace, &name, slice);
        self.trigger.trigger_reload();
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.metrics.record_reconcile("EndpointSlice");
        self.store.delete_endpoint_slice(&namespace, &name);
        self.trigger.trigger_reload();
    }
}

/// ReferenceGrant is watched only to re-queue dependent HTTPRoutes (§1
/// Non-goals: full ReferenceGrant policy is out of scope). No store entry
/// is kept for it; any event simply triggers a reload so the next
/// translation re-evaluates cross-namespace backend refs.
impl IndexNamespacedResource<gateway_beta::ReferenceGrant> for Index {
    fn apply(&mut self, _grant: gateway_beta::ReferenceGrant) {
        self.metrics.record_reconcile("ReferenceGrant");
        self.trigger.trigger_reload();
    }

    fn delete(&mut self, _namespace: String, _name: String) {
        self.metrics.record_reconcile("ReferenceGrant");
        self.trigger.trigger_reload();
    }
}

/// GatewayClass is cluster-scoped and has its own trait in `kubert::index`.
pub struct ClusterIndex {
    store: ResourceStore,
    cfg: Arc<ControllerConfig>,
    trigger: Arc<dyn ReloadTrigger>,
    metrics: Arc<dyn ReconcileMetrics>,
}

impl ClusterIndex {
    pub fn new(
        store: ResourceStore,
        cfg: Arc<ControllerConfig>,
        trigger: Arc<dyn ReloadTrigger>,
        metrics: Arc<dyn ReconcileMetrics>,
    ) -> Self {
        Self { store, cfg, trigger, metrics }
    }
}

impl kubert::index::IndexClusterResource<gateway::GatewayClass> for ClusterIndex {
    fn apply(&mut self, gc: gateway::GatewayClass) {
        self.metrics.record_reconcile("GatewayClass");
        let name = gc.metadata.name.clone().unwrap_or_default();
        if gateway_class_claimed(&gc, &self.cfg) {
            self.store.set_gateway_class(&name, gc);
            self.trigger.trigger_reload();
        } else {
            // Not owned: purge and return without reload (§4.D step 4).
            self.store.delete_gateway_class(&name);
        }
    }

    fn delete(&mut self, name: String) {
        self.metrics.record_reconcile("GatewayClass");
        self.store.delete_gateway_class(&name);
        self.trigger.trigger_reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTrigger(AtomicUsize);

    impl ReloadTrigger for CountingTrigger {
        fn trigger_reload(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct NoopMetrics;

    impl ReconcileMetrics for NoopMetrics {
        fn record_reconcile(&self, _kind: &str) {}
    }

    #[test]
    fn unowned_ingress_is_purged_without_retry() {
        let store = ResourceStore::new();
        let trigger = Arc::new(CountingTrigger(AtomicUsize::new(0)));
        let cfg = Arc::new(ControllerConfig {
            ingress_class: "gateway".to_string(),
            ..Default::default()
        });
        let mut index = Index::new(store.clone(), cfg, trigger.clone(), Arc::new(NoopMetrics));

        use k8s_openapi::api::networking::v1::{Ingress, IngressSpec};
        index.apply(Ingress {
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
        });

        assert!(store.get_ingress("default", "other").is_none());
        assert_eq!(trigger.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn delete_purges_store_and_triggers_reload() {
        let store = ResourceStore::new();
        let trigger = Arc::new(CountingTrigger(AtomicUsize::new(0)));
        let cfg = Arc::new(ControllerConfig::default());
        let mut index = Index::new(store.clone(), cfg, trigger.clone(), Arc::new(NoopMetrics));
        IndexNamespacedResource::<Ingress>::delete(&mut index, "default".to_string(), "gone".to_string());
        assert_eq!(trigger.0.load(Ordering::SeqCst), 1);
    }
}
