//! Gateway API translation (§4.E.3): Gateway listeners and claimed
//! HTTPRoute rules.

use crate::store::ResourceStore;
use crate::translate::backend::{gateway_backend_port, resolve_backend};
use crate::translate::convert;
use ridgeway_ingress_core::config::{HeaderMatch, Listener, Route};
use ridgeway_ingress_core::filters::apply_filter;
use ridgeway_ingress_core::hostname::intersect_hostnames;
use ridgeway_ingress_core::tls::TlsMaterializer;
use ridgeway_ingress_k8s_api::gateway::{
    GatewayListenersTlsMode, HTTPRouteRulesMatchesHeadersType, HTTPRouteRulesMatchesMethod,
    HTTPRouteRulesMatchesPathType,
};
use ridgeway_ingress_k8s_api::{gateway, ControllerConfig};
use std::sync::Arc;

pub struct GatewayTranslation {
    pub routes: Vec<Route>,
    pub listeners: Vec<Listener>,
    pub warnings: Vec<String>,
}

pub fn translate_gateway_api(
    store: &ResourceStore,
    claimed_gateways: &[Arc<gateway::Gateway>],
    claimed_routes: &[Arc<gateway::HTTPRoute>],
    _cfg: &ControllerConfig,
) -> GatewayTranslation {
    let mut listeners = Vec::new();
    let mut warnings = Vec::new();
    // listener_name -> (namespace, gateway_name, hostname) used when
    // intersecting HTTPRoute hostnames against the parent listener.
    let mut listener_hostnames: std::collections::HashMap<(String, String, String), Option<String>> =
        std::collections::HashMap::new();

    for gw in claimed_gateways {
        let namespace = gw.metadata.namespace.as_deref().unwrap_or_default();
        let gw_name = gw.metadata.name.as_deref().unwrap_or_default();
        for listener in &gw.spec.listeners {
            let id = format!("gw-{namespace}-{gw_name}-{}", listener.name);
            let mut l = Listener::new(id, format!(":{}", listener.port));
            if let Some(tls) = listener.tls.as_ref() {
                if tls.mode == Some(GatewayListenersTlsMode::Terminate) || tls.mode.is_none() {
                    l.tls_enabled = true;
                    let hosts = listener
                        .hostname
                        .clone()
                        .map(|h| vec![h])
                        .unwrap_or_default();
                    for cert_ref in tls.certificate_refs.iter().flatten() {
                        let cert_namespace = cert_ref.namespace.clone().unwrap_or_else(|| namespace.to_string());
                        let (mut pairs, mut w) = TlsMaterializer::resolve_cert_pairs(
                            store,
                            &cert_namespace,
                            &[(cert_ref.name.clone(), hosts.clone())],
                        );
                        l.certificates.append(&mut pairs);
                        warnings.append(&mut w);
                    }
                }
            }
            listener_hostnames.insert(
                (namespace.to_string(), gw_name.to_string(), listener.name.clone()),
                listener.hostname.clone(),
            );
            listeners.push(l);
        }
    }

    let mut routes = Vec::new();
    for route in claimed_routes {
        let namespace = route.metadata.namespace.as_deref().unwrap_or_default();
        let name = route.metadata.name.as_deref().unwrap_or_default();
        let route_hosts = route.spec.hostnames.clone().unwrap_or_default();

        // Intersect against every claimed parent Gateway's listener
        // hostnames; a route may be attached to several.
        let mut gateway_hosts: Vec<String> = Vec::new();
        for parent_ref in route.spec.parent_refs.iter().flatten() {
            let gw_namespace = parent_ref.namespace.clone().unwrap_or_else(|| namespace.to_string());
            for ((ns, gw_name, _listener_name), hostname) in listener_hostnames.iter() {
                if *ns == gw_namespace && *gw_name == parent_ref.name {
                    if let Some(h) = hostname {
                        gateway_hosts.push(h.clone());
                    }
                }
            }
        }
        let effective_hosts = intersect_hostnames(&route_hosts, &gateway_hosts);

        for (rule_index, rule) in route.spec.rules.iter().flatten().enumerate() {
            let backends: Vec<_> = rule
                .backend_refs
                .iter()
                .flatten()
                .flat_map(|br| {
                    let port = gateway_backend_port(br.port);
                    let weight = br.weight.unwrap_or(1).max(0) as u32;
                    let backend_namespace = br.namespace.clone().unwrap_or_else(|| namespace.to_string());
                    resolve_backend(store, &backend_namespace, &br.name, port, weight, ridgeway_ingress_core::annotations::UpstreamMode::EndpointSlice).0
                })
                .collect();

            let matches = rule.matches.clone().unwrap_or_default();
            let synthetic_match_count = if matches.is_empty() { 1 } else { matches.len() };
            for match_index in 0..synthetic_match_count {
                let id = format!("hr-{namespace}-{name}-{rule_index}-{match_index}");
                let mut r = Route::new(id);
                r.backends = backends.clone();
                r.r#match.domains = effective_hosts.clone();

                if let Some(m) = matches.get(match_index) {
                    if let Some(path) = m.path.as_ref() {
                        r.path_prefix = path.r#type == Some(HTTPRouteRulesMatchesPathType::PathPrefix);
                        r.path = path.value.clone().filter(|v| !v.is_empty()).unwrap_or_else(|| "/".to_string());
                    }
                    for h in m.headers.iter().flatten() {
                        let is_regex = h.r#type == Some(HTTPRouteRulesMatchesHeadersType::RegularExpression);
                        r.r#match.headers.push(HeaderMatch {
                            name: h.name.clone(),
                            value: (!is_regex).then(|| h.value.clone()),
                            regex: is_regex.then(|| h.value.clone()),
                        });
                    }
                    if let Some(method) = m.method.as_deref() {
                        r.r#match.methods = vec![method.to_string()];
                    }
                    for f in rule.filters.iter().flatten() {
                        if let Some(w) = apply_filter(&mut r, &convert::filter(f)) {
                            warnings.push(format!("hr-{namespace}-{name}: {w}"));
                        }
                    }
                } else {
                    r.path_prefix = true;
                    r.path = "/".to_string();
                }

                routes.push(r);
            }
        }
    }

    GatewayTranslation {
        routes,
        listeners,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::discovery::v1::{Endpoint, EndpointConditions, EndpointPort, EndpointSlice};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn slice(svc: &str, addr: &str, port: i32) -> EndpointSlice {
        let mut labels = BTreeMap::new();
        labels.insert("kubernetes.io/service-name".to_string(), svc.to_string());
        EndpointSlice {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some(format!("{svc}-x")),
                labels: Some(labels),
                ..Default::default()
            },
            ports: Some(vec![EndpointPort {
                port: Some(port),
                ..Default::default()
            }]),
            endpoints: vec![Endpoint {
                addresses: vec![addr.to_string()],
                conditions: Some(EndpointConditions {
                    ready: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            address_type: "IPv4".to_string(),
        }
    }

    #[test]
    fn scenario_4_gateway_plus_httproute_with_prefix_match() {
        let store = ResourceStore::new();
        store.set_endpoint_slice("default", "backend-svc-x", slice("backend-svc", "10.0.1.1", 8080));

        let gw = Arc::new(gateway::Gateway {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some("main-gw".to_string()),
                ..Default::default()
            },
            spec: gateway::GatewaySpec {
                gateway_class_name: "gateway".to_string(),
                listeners: vec![gateway::GatewaySpecListeners {
                    name: "http".to_string(),
                    port: 8080,
                    protocol: "HTTP".to_string(),
                    hostname: None,
                    tls: None,
                    allowed_routes: None,
                }],
                ..Default::default()
            },
            status: None,
        });

        let route = Arc::new(gateway::HTTPRoute {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some("api-route".to_string()),
                ..Default::default()
            },
            spec: gateway::HTTPRouteSpec {
                parent_refs: Some(vec![gateway::HTTPRouteParentRefs {
                    group: None,
                    kind: None,
                    namespace: None,
                    name: "main-gw".to_string(),
                    section_name: None,
                    port: None,
                }]),
                hostnames: Some(vec!["api.example.com".to_string()]),
                rules: Some(vec![gateway::HTTPRouteRules {
                    matches: Some(vec![gateway::HTTPRouteRulesMatches {
                        path: Some(gateway::HTTPRouteRulesMatchesPath {
                            type_: Some("PathPrefix".to_string()),
                            value: Some("/v1".to_string()),
                        }),
                        headers: None,
                        method: None,
                        query_params: None,
                    }]),
                    backend_refs: Some(vec![gateway::HTTPRouteRulesBackendRefs {
                        group: None,
                        kind: None,
                        name: "backend-svc".to_string(),
                        namespace: None,
                        port: Some(8080),
                        weight: None,
                        filters: None,
                    }]),
                    filters: None,
                    timeouts: None,
                }]),
                ..Default::default()
            },
            status: None,
        });

        let cfg = ControllerConfig::default();
        let result = translate_gateway_api(&store, &[gw], &[route], &cfg);
        assert_eq!(result.listeners.len(), 1);
        assert_eq!(result.listeners[0].id, "gw-default-main-gw-http");
        assert_eq!(result.listeners[0].address, ":8080");
        assert_eq!(result.routes.len(), 1);
        let r = &result.routes[0];
        assert_eq!(r.path, "/v1");
        assert!(r.path_prefix);
        assert_eq!(r.r#match.domains, vec!["api.example.com".to_string()]);
        assert_eq!(r.backends[0].url, "http://10.0.1.1:8080");
    }
}
