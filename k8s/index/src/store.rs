//! Thread-safe, monotonically-versioned in-memory snapshot of watched
//! cluster resources (component A).
//!
//! A single `parking_lot::RwLock` guards all seven maps; the generation
//! counter is a separate atomic so callers can observe "has anything
//! changed since I looked?" without taking the lock, mirroring the
//! teacher's `Index`/`NamespaceIndex` split between a locked map and an
//! externally-visible version.

use ahash::AHashMap;
use parking_lot::RwLock;
use ridgeway_ingress_k8s_api::{gateway, EndpointSlice, Ingress, Secret, Service};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type NamespacedKey = (String, String);

#[derive(Default)]
struct Inner {
    ingresses: AHashMap<NamespacedKey, Arc<Ingress>>,
    gateways: AHashMap<NamespacedKey, Arc<gateway::Gateway>>,
    gateway_classes: AHashMap<String, Arc<gateway::GatewayClass>>,
    http_routes: AHashMap<NamespacedKey, Arc<gateway::HTTPRoute>>,
    endpoint_slices: AHashMap<NamespacedKey, Arc<EndpointSlice>>,
    services: AHashMap<NamespacedKey, Arc<Service>>,
    secrets: AHashMap<NamespacedKey, Arc<Secret>>,
}

/// The resource store. Cloning is cheap (`Arc`-backed); every clone
/// observes the same underlying state.
#[derive(Clone)]
pub struct ResourceStore {
    inner: Arc<RwLock<Inner>>,
    generation: Arc<AtomicU64>,
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! namespaced_accessors {
    ($set:ident, $delete:ident, $list:ident, $get:ident, $field:ident, $ty:ty) => {
        pub fn $set(&self, namespace: &str, name: &str, value: $ty) {
            let mut inner = self.inner.write();
            inner
                .$field
                .insert((namespace.to_string(), name.to_string()), Arc::new(value));
            self.bump();
        }

        pub fn $delete(&self, namespace: &str, name: &str) {
            let mut inner = self.inner.write();
            inner.$field.remove(&(namespace.to_string(), name.to_string()));
            self.bump();
        }

        pub fn $list(&self) -> Vec<Arc<$ty>> {
            self.inner.read().$field.values().cloned().collect()
        }

        pub fn $get(&self, namespace: &str, name: &str) -> Option<Arc<$ty>> {
            self.inner
                .read()
                .$field
                .get(&(namespace.to_string(), name.to_string()))
                .cloned()
        }
    };
}

impl ResourceStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Current monotonic generation. Safe to read without the lock.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    namespaced_accessors!(set_ingress, delete_ingress, list_ingresses, get_ingress, ingresses, Ingress);
    namespaced_accessors!(set_gateway, delete_gateway, list_gateways, get_gateway, gateways, gateway::Gateway);
    namespaced_accessors!(
        set_http_route,
        delete_http_route,
        list_http_routes,
        get_http_route,
        http_routes,
        gateway::HTTPRoute
    );
    namespaced_accessors!(
        set_endpoint_slice,
        delete_endpoint_slice,
        list_endpoint_slices,
        get_endpoint_slice,
        endpoint_slices,
        EndpointSlice
    );
    namespaced_accessors!(set_service, delete_service, list_services, get_service, services, Service);
    namespaced_accessors!(set_secret, delete_secret, list_secrets, get_secret, secrets, Secret);

    /// GatewayClass is cluster-scoped, keyed by name alone.
    pub fn set_gateway_class(&self, name: &str, value: gateway::GatewayClass) {
        self.inner.write().gateway_classes.insert(name.to_string(), Arc::new(value));
        self.bump();
    }

    pub fn delete_gateway_class(&self, name: &str) {
        self.inner.write().gateway_classes.remove(name);
        self.bump();
    }

    pub fn get_gateway_class(&self, name: &str) -> Option<Arc<gateway::GatewayClass>> {
        self.inner.read().gateway_classes.get(name).cloned()
    }

    pub fn list_gateway_classes(&self) -> Vec<Arc<gateway::GatewayClass>> {
        self.inner.read().gateway_classes.values().cloned().collect()
    }

    /// Returns all EndpointSlices whose owning-service label matches.
    pub fn endpoint_slices_for_service(&self, namespace: &str, service_name: &str) -> Vec<Arc<EndpointSlice>> {
        const SERVICE_LABEL: &str = "kubernetes.io/service-name";
        self.inner
            .read()
            .endpoint_slices
            .values()
            .filter(|slice| {
                slice.metadata.namespace.as_deref() == Some(namespace)
                    && slice
                        .metadata
                        .labels
                        .as_ref()
                        .and_then(|labels| labels.get(SERVICE_LABEL))
                        .map(|v| v == service_name)
                        .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

impl ridgeway_ingress_core::tls::SecretLookup for ResourceStore {
    fn get_secret(&self, namespace: &str, name: &str) -> Option<ridgeway_ingress_core::tls::SecretData> {
        let secret = self.get_secret(namespace, name)?;
        let data = secret.data.as_ref();
        Some(ridgeway_ingress_core::tls::SecretData {
            cert: data.and_then(|d| d.get(ridgeway_ingress_core::tls::TLS_CERT_KEY)).map(|b| b.0.clone()),
            key: data.and_then(|d| d.get(ridgeway_ingress_core::tls::TLS_PRIVATE_KEY)).map(|b| b.0.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn ingress(name: &str) -> Ingress {
        Ingress {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn every_mutation_increments_generation_by_exactly_one() {
        let store = ResourceStore::new();
        assert_eq!(store.generation(), 0);
        store.set_ingress("default", "a", ingress("a"));
        assert_eq!(store.generation(), 1);
        store.set_ingress("default", "a", ingress("a"));
        assert_eq!(store.generation(), 2);
        store.delete_ingress("default", "a");
        assert_eq!(store.generation(), 3);
    }

    #[test]
    fn list_returns_independent_snapshot() {
        let store = ResourceStore::new();
        store.set_ingress("default", "a", ingress("a"));
        let snapshot = store.list_ingresses();
        store.set_ingress("default", "b", ingress("b"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.list_ingresses().len(), 2);
    }

    #[test]
    fn get_returns_none_for_absent_key() {
        let store = ResourceStore::new();
        assert!(store.get_ingress("default", "missing").is_none());
    }
}
