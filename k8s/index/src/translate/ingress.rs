//! Ingress path translation (§4.E.2) and TLS listener synthesis (§4.E.7).

use crate::store::ResourceStore;
use crate::translate::backend::{ingress_backend_port, resolve_backend};
use ridgeway_ingress_core::annotations::{self, upstream_mode, Annotations};
use ridgeway_ingress_core::config::{Listener, Match, Route};
use ridgeway_ingress_core::tls::TlsMaterializer;
use ridgeway_ingress_k8s_api::{ControllerConfig, Ingress};

pub struct IngressTranslation {
    pub routes: Vec<Route>,
    pub listeners: Vec<Listener>,
    pub warnings: Vec<String>,
}

pub fn translate_ingresses(
    store: &ResourceStore,
    claimed: &[std::sync::Arc<Ingress>],
    cfg: &ControllerConfig,
) -> IngressTranslation {
    let mut routes = Vec::new();
    let mut warnings = Vec::new();
    let mut all_certs = Vec::new();

    for ingress in claimed {
        let namespace = ingress.metadata.namespace.as_deref().unwrap_or_default();
        let name = ingress.metadata.name.as_deref().unwrap_or_default();
        let annotation_map = ingress.metadata.annotations.clone().unwrap_or_default();
        let ann = Annotations::new(&annotation_map);
        let mode = upstream_mode(ann);

        let Some(spec) = ingress.spec.as_ref() else {
            continue;
        };

        for tls_entry in spec.tls.iter().flatten() {
            let mut hosts = tls_entry.hosts.clone().unwrap_or_default();
            if hosts.is_empty() {
                hosts = vec!["*".to_string()];
            }
            let secret_name = tls_entry.secret_name.clone().unwrap_or_default();
            let (mut pairs, mut w) =
                TlsMaterializer::resolve_cert_pairs(store, namespace, &[(secret_name, hosts)]);
            all_certs.append(&mut pairs);
            warnings.append(&mut w);
        }

        for (rule_index, rule) in spec.rules.iter().flatten().enumerate() {
            let Some(http) = rule.http.as_ref() else {
                continue;
            };
            for (path_index, path) in http.paths.iter().enumerate() {
                let id = format!("ing-{namespace}-{name}-{rule_index}-{path_index}");
                let mut route = Route::new(id);
                route.path = path.path.clone().filter(|p| !p.is_empty()).unwrap_or_else(|| "/".to_string());
                route.path_prefix = path.path_type == "Prefix";
                if let Some(host) = rule.host.as_deref().filter(|h| !h.is_empty()) {
                    route.r#match = Match {
                        domains: vec![host.to_string()],
                        ..Match::default()
                    };
                }

                if let Some(svc) = path.backend.service.as_ref() {
                    let port = ingress_backend_port(svc.port.as_ref().and_then(|p| p.number));
                    let (backends, mut w) =
                        resolve_backend(store, namespace, &svc.name, port, 1, mode);
                    route.backends = backends;
                    warnings.append(&mut w);
                } else {
                    warnings.push(format!(
                        "ing-{namespace}-{name}: unsupported or missing backend kind on rule {rule_index} path {path_index}"
                    ));
                }

                annotations::apply(&mut route, ann);
                routes.push(route);
            }
        }

        if let Some(default_backend) = spec.default_backend.as_ref() {
            let id = format!("ing-{namespace}-{name}-default");
            let mut route = Route::new(id);
            route.path = "/".to_string();
            route.path_prefix = true;
            if let Some(svc) = default_backend.service.as_ref() {
                let port = ingress_backend_port(svc.port.as_ref().and_then(|p| p.number));
                let (backends, mut w) = resolve_backend(store, namespace, &svc.name, port, 1, mode);
                route.backends = backends;
                warnings.append(&mut w);
            }
            annotations::apply(&mut route, ann);
            routes.push(route);
        }
    }

    let mut listeners = Vec::new();
    if !all_certs.is_empty() {
        let mut listener = Listener::new("ingress-https", format!(":{}", cfg.default_https_port));
        listener.tls_enabled = true;
        listener.certificates = all_certs;
        listeners.push(listener);
    }

    IngressTranslation {
        routes,
        listeners,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::discovery::v1::{Endpoint, EndpointConditions, EndpointPort, EndpointSlice};
    use k8s_openapi::api::networking::v1::{
        HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule, IngressServiceBackend,
        IngressSpec, ServiceBackendPort,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn basic_ingress() -> Ingress {
        let mut annotations = BTreeMap::new();
        annotations.insert("retry-max".to_string(), "3".to_string());
        annotations.insert("timeout".to_string(), "10s".to_string());
        Ingress {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some("test-ing".to_string()),
                annotations: Some(annotations),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                ingress_class_name: Some("gateway".to_string()),
                rules: Some(vec![IngressRule {
                    host: Some("example.com".to_string()),
                    http: Some(HTTPIngressRuleValue {
                        paths: vec![HTTPIngressPath {
                            path: Some("/api".to_string()),
                            path_type: "Prefix".to_string(),
                            backend: IngressBackend {
                                service: Some(IngressServiceBackend {
                                    name: "api-svc".to_string(),
                                    port: Some(ServiceBackendPort {
                                        number: Some(8080),
                                        ..Default::default()
                                    }),
                                }),
                                ..Default::default()
                            },
                        }],
                    }),
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn slice_with_ready(addrs: &[&str]) -> EndpointSlice {
        let mut labels = BTreeMap::new();
        labels.insert("kubernetes.io/service-name".to_string(), "api-svc".to_string());
        EndpointSlice {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some("api-svc-xyz".to_string()),
                labels: Some(labels),
                ..Default::default()
            },
            ports: Some(vec![EndpointPort {
                port: Some(8080),
                ..Default::default()
            }]),
            endpoints: addrs
                .iter()
                .map(|a| Endpoint {
                    addresses: vec![a.to_string()],
                    conditions: Some(EndpointConditions {
                        ready: Some(true),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
            address_type: "IPv4".to_string(),
        }
    }

    #[test]
    fn scenario_1_basic_ingress_with_endpointslice_fanout() {
        let store = ResourceStore::new();
        store.set_endpoint_slice("default", "api-svc-xyz", slice_with_ready(&["10.0.0.1", "10.0.0.2"]));
        let cfg = ControllerConfig {
            ingress_class: "gateway".to_string(),
            ..Default::default()
        };
        let ingress = Arc::new(basic_ingress());
        let result = translate_ingresses(&store, &[ingress], &cfg);
        assert_eq!(result.routes.len(), 1);
        let route = &result.routes[0];
        assert_eq!(route.id, "ing-default-test-ing-0-0");
        assert_eq!(route.path, "/api");
        assert!(route.path_prefix);
        assert_eq!(route.r#match.domains, vec!["example.com".to_string()]);
        assert_eq!(
            route.backends.iter().map(|b| b.url.clone()).collect::<Vec<_>>(),
            vec!["http://10.0.0.1:8080".to_string(), "http://10.0.0.2:8080".to_string()]
        );
        assert_eq!(route.retries, 3);
        assert_eq!(route.timeout_policy.request, Some(std::time::Duration::from_secs(10)));
    }

    #[test]
    fn scenario_3_clusterip_upstream_mode() {
        let store = ResourceStore::new();
        let mut ingress = basic_ingress();
        ingress.metadata.namespace = Some("prod".to_string());
        ingress.metadata.annotations = Some(BTreeMap::from([(
            "upstream-mode".to_string(),
            "clusterip".to_string(),
        )]));
        ingress.spec.as_mut().unwrap().rules.as_mut().unwrap()[0]
            .http
            .as_mut()
            .unwrap()
            .paths[0]
            .backend
            .service
            .as_mut()
            .unwrap()
            .name = "api".to_string();
        let cfg = ControllerConfig {
            ingress_class: "gateway".to_string(),
            ..Default::default()
        };
        let result = translate_ingresses(&store, &[Arc::new(ingress)], &cfg);
        assert_eq!(result.routes[0].backends[0].url, "http://api.prod.svc.cluster.local:8080");
    }
}
