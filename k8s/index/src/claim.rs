//! Ownership ("claim") rules from §3 invariants 3–5: decides whether this
//! controller is responsible for a given Ingress, Gateway, or HTTPRoute.

use crate::store::ResourceStore;
use ridgeway_ingress_core::annotations::keys::LEGACY_INGRESS_CLASS;
use ridgeway_ingress_k8s_api::{gateway, ControllerConfig, Ingress};

/// §3 invariant analogous to `ingress_claimed`/`gateway_claimed`: a
/// GatewayClass belongs to this controller iff its `spec.controllerName`
/// names it.
pub fn gateway_class_claimed(gc: &gateway::GatewayClass, cfg: &ControllerConfig) -> bool {
    gc.spec.controller_name == cfg.controller_name
}

pub const GATEWAY_API_GROUP: &str = "gateway.networking.k8s.io";

/// §3 invariant 3: the spec field takes precedence over the legacy
/// annotation; the watch-without-class fallback only applies when neither
/// is present.
pub fn ingress_claimed(ingress: &Ingress, cfg: &ControllerConfig) -> bool {
    if let Some(class) = ingress.spec.as_ref().and_then(|s| s.ingress_class_name.as_deref()) {
        return class == cfg.ingress_class;
    }
    if let Some(class) = ingress
        .metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(LEGACY_INGRESS_CLASS))
    {
        return *class == cfg.ingress_class;
    }
    cfg.watch_without_class
}

/// §3 invariant 4.
pub fn gateway_claimed(gw: &gateway::Gateway, store: &ResourceStore, cfg: &ControllerConfig) -> bool {
    let class_name = &gw.spec.gateway_class_name;
    match store.get_gateway_class(class_name) {
        Some(gc) => gc.spec.controller_name == cfg.controller_name,
        None => false,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentRef {
    pub group: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub section_name: Option<String>,
}

/// `isSameParentRef`: group (defaulted) and name must match; kind/
/// namespace/section-name are left to callers.
pub fn is_same_parent_ref(a: &ParentRef, b: &ParentRef) -> bool {
    a.group == b.group && a.name == b.name
}

pub fn resolve_parent_ref(
    route_namespace: &str,
    parent_ref: &gateway::HTTPRouteParentRefs,
) -> ParentRef {
    ParentRef {
        group: parent_ref
            .group
            .clone()
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| GATEWAY_API_GROUP.to_string()),
        kind: parent_ref.kind.clone().unwrap_or_else(|| "Gateway".to_string()),
        namespace: parent_ref
            .namespace
            .clone()
            .unwrap_or_else(|| route_namespace.to_string()),
        name: parent_ref.name.clone(),
        section_name: parent_ref.section_name.clone(),
    }
}

/// §3 invariant 5: a HTTPRoute is claimed iff at least one parent ref
/// targets a Gateway this controller claims.
pub fn http_route_claimed(route: &gateway::HTTPRoute, store: &ResourceStore, cfg: &ControllerConfig) -> bool {
    let namespace = route.metadata.namespace.as_deref().unwrap_or_default();
    route.spec.parent_refs.iter().flatten().any(|pr| {
        let parent = resolve_parent_ref(namespace, pr);
        if parent.kind != "Gateway" || parent.group != GATEWAY_API_GROUP {
            return false;
        }
        match store.get_gateway(&parent.namespace, &parent.name) {
            Some(gw) => gateway_claimed(&gw, store, cfg),
            None => false,
        }
    })
}

/// §4.D step 3's Secret filter: a Secret is only cached if some claimed
/// Ingress or Gateway currently in the store references it by name — as
/// an Ingress `spec.tls[].secretName`, or a Gateway listener's
/// `tls.certificateRefs[].name` (namespace defaults to the Gateway's own).
pub fn secret_claimed(namespace: &str, name: &str, store: &ResourceStore, cfg: &ControllerConfig) -> bool {
    let referenced_by_ingress = store.list_ingresses().iter().any(|ing| {
        ing.metadata.namespace.as_deref() == Some(namespace)
            && ingress_claimed(ing, cfg)
            && ing
                .spec
                .as_ref()
                .map(|s| s.tls.iter().flatten().any(|t| t.secret_name.as_deref() == Some(name)))
                .unwrap_or(false)
    });
    if referenced_by_ingress {
        return true;
    }
    store.list_gateways().iter().any(|gw| {
        gateway_claimed(gw, store, cfg)
            && gw.spec.listeners.iter().any(|listener| {
                listener
                    .tls
                    .as_ref()
                    .map(|tls| {
                        tls.certificate_refs.iter().flatten().any(|cert_ref| {
                            let cert_namespace = cert_ref
                                .namespace
                                .as_deref()
                                .unwrap_or_else(|| gw.metadata.namespace.as_deref().unwrap_or_default());
                            cert_namespace == namespace && cert_ref.name == name
                        })
                    })
                    .unwrap_or(false)
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_parent_ref_ignores_namespace_and_kind() {
        let a = ParentRef {
            group: GATEWAY_API_GROUP.to_string(),
            kind: "Gateway".to_string(),
            namespace: "ns-a".to_string(),
            name: "gw".to_string(),
            section_name: None,
        };
        let b = ParentRef {
            namespace: "ns-b".to_string(),
            kind: "OtherKind".to_string(),
            ..a.clone()
        };
        assert!(is_same_parent_ref(&a, &b));
    }

    #[test]
    fn ingress_spec_field_takes_precedence_over_annotation() {
        use k8s_openapi::api::networking::v1::{Ingress, IngressSpec};
        use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
        use std::collections::BTreeMap;

        let mut annotations = BTreeMap::new();
        annotations.insert(LEGACY_INGRESS_CLASS.to_string(), "nginx".to_string());
        let ing = Ingress {
            metadata: ObjectMeta {
                annotations: Some(annotations),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                ingress_class_name: Some("gateway".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = ControllerConfig {
            ingress_class: "gateway".to_string(),
            ..Default::default()
        };
        assert!(ingress_claimed(&ing, &cfg));
    }

    #[test]
    fn watch_without_class_only_applies_when_neither_hint_present() {
        use k8s_openapi::api::networking::v1::Ingress;
        let ing = Ingress::default();
        let mut cfg = ControllerConfig {
            ingress_class: "gateway".to_string(),
            watch_without_class: false,
            ..Default::default()
        };
        assert!(!ingress_claimed(&ing, &cfg));
        cfg.watch_without_class = true;
        assert!(ingress_claimed(&ing, &cfg));
    }

    #[test]
    fn gateway_class_claimed_matches_controller_name() {
        let gc = gateway::GatewayClass {
            metadata: Default::default(),
            spec: gateway::GatewayClassSpec {
                controller_name: "example.com/ridgeway-ingress".to_string(),
                ..Default::default()
            },
            status: None,
        };
        let cfg = ControllerConfig {
            controller_name: "example.com/ridgeway-ingress".to_string(),
            ..Default::default()
        };
        assert!(gateway_class_claimed(&gc, &cfg));
        let other = ControllerConfig {
            controller_name: "example.com/other".to_string(),
            ..Default::default()
        };
        assert!(!gateway_class_claimed(&gc, &other));
    }

    #[test]
    fn secret_claimed_only_when_referenced_by_a_claimed_ingress() {
        use k8s_openapi::api::networking::v1::{Ingress, IngressSpec, IngressTLS};
        use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

        let store = ResourceStore::new();
        let cfg = ControllerConfig {
            ingress_class: "gateway".to_string(),
            ..Default::default()
        };

        assert!(!secret_claimed("default", "tls-secret", &store, &cfg));

        store.set_ingress(
            "default",
            "site",
            Ingress {
                metadata: ObjectMeta {
                    namespace: Some("default".to_string()),
                    name: Some("site".to_string()),
                    ..Default::default()
                },
                spec: Some(IngressSpec {
                    ingress_class_name: Some("gateway".to_string()),
                    tls: Some(vec![IngressTLS {
                        secret_name: Some("tls-secret".to_string()),
                        hosts: Some(vec!["example.com".to_string()]),
                    }]),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );

        assert!(secret_claimed("default", "tls-secret", &store, &cfg));
        assert!(!secret_claimed("default", "other-secret", &store, &cfg));
        assert!(!secret_claimed("other-ns", "tls-secret", &store, &cfg));
    }
}
