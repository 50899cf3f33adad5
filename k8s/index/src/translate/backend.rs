//! Backend resolution (§4.E.4): ExternalName passthrough, ClusterIP DNS
//! synthesis, or EndpointSlice enumeration with a ClusterIP fallback when
//! no ready endpoints resolve.

use crate::store::ResourceStore;
use ridgeway_ingress_core::annotations::UpstreamMode;
use ridgeway_ingress_core::config::Backend;

const SERVICE_TYPE_EXTERNAL_NAME: &str = "ExternalName";

fn clusterip_backend(namespace: &str, service_name: &str, port: u16) -> Backend {
    Backend::new(format!("http://{service_name}.{namespace}.svc.cluster.local:{port}"))
}

/// Resolves a single backend reference to zero or more runway backends.
/// `weight` is applied uniformly to every backend produced for this ref.
pub fn resolve_backend(
    store: &ResourceStore,
    namespace: &str,
    service_name: &str,
    port: u16,
    weight: u32,
    mode: UpstreamMode,
) -> (Vec<Backend>, Vec<String>) {
    let mut warnings = Vec::new();

    if let Some(svc) = store.get_service(namespace, service_name) {
        let is_external_name = svc
            .spec
            .as_ref()
            .and_then(|s| s.type_.as_deref())
            .map(|t| t == SERVICE_TYPE_EXTERNAL_NAME)
            .unwrap_or(false);
        if is_external_name {
            let external_name = svc
                .spec
                .as_ref()
                .and_then(|s| s.external_name.clone())
                .unwrap_or_default();
            return (
                vec![Backend::weighted(format!("http://{external_name}:{port}"), weight)],
                warnings,
            );
        }
    }

    if mode == UpstreamMode::ClusterIp {
        return (
            vec![Backend::weighted(
                clusterip_backend(namespace, service_name, port).url,
                weight,
            )],
            warnings,
        );
    }

    let mut backends = Vec::new();
    for slice in store.endpoint_slices_for_service(namespace, service_name) {
        let target_port = slice
            .ports
            .as_ref()
            .and_then(|ports| {
                if port == 0 {
                    ports.first()
                } else {
                    ports.iter().find(|p| p.port == Some(port as i32))
                }
            })
            .and_then(|p| p.port)
            .unwrap_or(port as i32);

        for endpoint in &slice.endpoints {
            let ready = endpoint
                .conditions
                .as_ref()
                .and_then(|c| c.ready)
                .unwrap_or(true);
            if !ready {
                continue;
            }
            for address in &endpoint.addresses {
                backends.push(Backend::weighted(
                    format!("http://{address}:{target_port}"),
                    weight,
                ));
            }
        }
    }

    if backends.is_empty() {
        warnings.push(format!(
            "no ready endpoints for {namespace}/{service_name}, falling back to ClusterIP"
        ));
        backends.push(Backend::weighted(
            clusterip_backend(namespace, service_name, port).url,
            weight,
        ));
    }

    (backends, warnings)
}

/// Numeric Ingress backend port resolution: non-zero literal port, else 80.
/// Named ports are not supported and silently default to 80.
pub fn ingress_backend_port(number: Option<i32>) -> u16 {
    match number {
        Some(n) if n != 0 => n as u16,
        _ => 80,
    }
}

/// Gateway API backend ports default to 80 when unspecified.
pub fn gateway_backend_port(port: Option<i32>) -> u16 {
    port.map(|p| p as u16).unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Service;
    use k8s_openapi::api::discovery::v1::{Endpoint, EndpointConditions, EndpointPort, EndpointSlice};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn labeled_slice(svc: &str, addrs: &[&str], ready: bool, port: i32) -> EndpointSlice {
        let mut labels = BTreeMap::new();
        labels.insert("kubernetes.io/service-name".to_string(), svc.to_string());
        EndpointSlice {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some(format!("{svc}-abcde")),
                labels: Some(labels),
                ..Default::default()
            },
            ports: Some(vec![EndpointPort {
                port: Some(port),
                ..Default::default()
            }]),
            endpoints: addrs
                .iter()
                .map(|a| Endpoint {
                    addresses: vec![a.to_string()],
                    conditions: Some(EndpointConditions {
                        ready: Some(ready),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
            address_type: "IPv4".to_string(),
        }
    }

    #[test]
    fn endpointslice_mode_enumerates_ready_endpoints() {
        let store = ResourceStore::new();
        store.set_endpoint_slice(
            "default",
            "api-svc-abcde",
            labeled_slice("api-svc", &["10.0.0.1", "10.0.0.2"], true, 8080),
        );
        let (backends, warnings) = resolve_backend(
            &store,
            "default",
            "api-svc",
            8080,
            1,
            UpstreamMode::EndpointSlice,
        );
        assert!(warnings.is_empty());
        let urls: Vec<_> = backends.iter().map(|b| b.url.clone()).collect();
        assert_eq!(urls, vec!["http://10.0.0.1:8080", "http://10.0.0.2:8080"]);
    }

    #[test]
    fn no_ready_endpoints_falls_back_to_clusterip() {
        let store = ResourceStore::new();
        store.set_endpoint_slice(
            "default",
            "api-svc-abcde",
            labeled_slice("api-svc", &["10.0.0.1"], false, 8080),
        );
        let (backends, warnings) = resolve_backend(
            &store,
            "default",
            "api-svc",
            8080,
            1,
            UpstreamMode::EndpointSlice,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(backends[0].url, "http://api-svc.default.svc.cluster.local:8080");
    }

    #[test]
    fn clusterip_mode_synthesizes_dns_name() {
        let store = ResourceStore::new();
        let (backends, warnings) =
            resolve_backend(&store, "prod", "api", 8080, 1, UpstreamMode::ClusterIp);
        assert!(warnings.is_empty());
        assert_eq!(backends[0].url, "http://api.prod.svc.cluster.local:8080");
    }

    #[test]
    fn external_name_service_short_circuits_other_modes() {
        let store = ResourceStore::new();
        store.set_service(
            "default",
            "ext-svc",
            Service {
                metadata: ObjectMeta {
                    namespace: Some("default".to_string()),
                    name: Some("ext-svc".to_string()),
                    ..Default::default()
                },
                spec: Some(k8s_openapi::api::core::v1::ServiceSpec {
                    type_: Some("ExternalName".to_string()),
                    external_name: Some("example.upstream.internal".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let (backends, _) = resolve_backend(
            &store,
            "default",
            "ext-svc",
            443,
            1,
            UpstreamMode::EndpointSlice,
        );
        assert_eq!(backends[0].url, "http://example.upstream.internal:443");
    }

    #[test]
    fn port_resolution_defaults_named_ports_to_80() {
        assert_eq!(ingress_backend_port(Some(8080)), 8080);
        assert_eq!(ingress_backend_port(Some(0)), 80);
        assert_eq!(ingress_backend_port(None), 80);
        assert_eq!(gateway_backend_port(None), 80);
    }
}
