//! The translator (component E): a deterministic pure function from a
//! store snapshot plus base config to a merged, validated runway config.

mod backend;
mod convert;
mod gateway;
mod ingress;

use crate::claim::{gateway_claimed, http_route_claimed, ingress_claimed};
use crate::store::ResourceStore;
use ridgeway_ingress_core::config::{Config, Listener};
use ridgeway_ingress_core::validate::ConfigValidator;
use ridgeway_ingress_k8s_api::ControllerConfig;

pub struct Translation {
    pub config: Config,
    pub warnings: Vec<String>,
}

/// `Translate(store, baseConfig, settings) -> (mergedConfig, warnings)`.
pub fn translate(
    store: &ResourceStore,
    validator: &dyn ConfigValidator,
    cfg: &ControllerConfig,
) -> Result<Translation, ridgeway_ingress_core::validate::ValidationError> {
    let mut warnings = Vec::new();

    // Phase 1: clone base.
    let mut merged = cfg.base_config.clone();

    // Phase 2/3: translate each family, gated by the enable toggles.
    let mut ingress_routes = Vec::new();
    let mut ingress_listeners = Vec::new();
    if cfg.enable_ingress {
        let claimed: Vec<_> = store
            .list_ingresses()
            .into_iter()
            .filter(|i| ingress_claimed(i, cfg))
            .collect();
        let result = ingress::translate_ingresses(store, &claimed, cfg);
        ingress_routes = result.routes;
        ingress_listeners = result.listeners;
        warnings.extend(result.warnings);
    }

    let mut gateway_routes = Vec::new();
    let mut gateway_listeners = Vec::new();
    if cfg.enable_gateway_api {
        let claimed_gateways: Vec<_> = store
            .list_gateways()
            .into_iter()
            .filter(|g| gateway_claimed(g, store, cfg))
            .collect();
        let claimed_routes: Vec<_> = store
            .list_http_routes()
            .into_iter()
            .filter(|r| http_route_claimed(r, store, cfg))
            .collect();
        let result = gateway::translate_gateway_api(store, &claimed_gateways, &claimed_routes, cfg);
        gateway_routes = result.routes;
        gateway_listeners = result.listeners;
        warnings.extend(result.warnings);
    }

    // Phase 4: merge routes, keyed by ID, k8s-derived overlays replace base.
    merge_routes(&mut merged, ingress_routes);
    merge_routes(&mut merged, gateway_routes);

    // Phase 5: merge listeners.
    merge_ingress_listeners(&mut merged, ingress_listeners);
    merge_gateway_listeners(&mut merged, gateway_listeners, &mut warnings);

    // Phase 6: guarantee at least one listener.
    if merged.listeners.is_empty() {
        merged.listeners.push(Listener::new(
            "ingress-http",
            format!(":{}", cfg.default_http_port),
        ));
    }

    merged.sort();

    // Phase 7: validate.
    validator.validate(&merged)?;

    Ok(Translation {
        config: merged,
        warnings,
    })
}

fn merge_routes(config: &mut Config, overlay: Vec<ridgeway_ingress_core::config::Route>) {
    for route in overlay {
        config.routes.retain(|r| r.id != route.id);
        config.routes.push(route);
    }
}

/// Ingress-derived listeners append certs into a colliding base listener
/// (enabling TLS) rather than dropping either side.
fn merge_ingress_listeners(config: &mut Config, overlay: Vec<Listener>) {
    for listener in overlay {
        if let Some(existing) = config.listeners.iter_mut().find(|l| l.id == listener.id) {
            existing.certificates.extend(listener.certificates);
            existing.tls_enabled = existing.tls_enabled || listener.tls_enabled;
        } else {
            config.listeners.push(listener);
        }
    }
}

/// Gateway-derived listeners conflict-and-drop on collision with any
/// existing listener (base or ingress-derived).
fn merge_gateway_listeners(config: &mut Config, overlay: Vec<Listener>, warnings: &mut Vec<String>) {
    for listener in overlay {
        if config.listeners.iter().any(|l| l.id == listener.id) {
            warnings.push(format!("listener id {} conflicts with an existing listener; dropped", listener.id));
            continue;
        }
        config.listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridgeway_ingress_core::config::Route;
    use ridgeway_ingress_core::validate::StructuralValidator;

    #[test]
    fn scenario_6_default_listener_synthesis() {
        let store = ResourceStore::new();
        let cfg = ControllerConfig {
            default_http_port: 9999,
            ..Default::default()
        };
        let result = translate(&store, &StructuralValidator, &cfg).unwrap();
        assert_eq!(result.config.listeners.len(), 1);
        assert_eq!(result.config.listeners[0].id, "ingress-http");
        assert_eq!(result.config.listeners[0].address, ":9999");
    }

    #[test]
    fn scenario_7_base_config_merge_preserves_base() {
        let store = ResourceStore::new();
        let mut base = Config::default();
        base.listeners.push(Listener::new("base-http", ":9090"));
        base.routes.push(Route::new("base-route"));
        base.globals.insert("registry".to_string(), "memory".to_string());

        let cfg = ControllerConfig {
            base_config: base,
            ..Default::default()
        };
        let result = translate(&store, &StructuralValidator, &cfg).unwrap();
        assert_eq!(result.config.routes.len(), 1);
        assert!(result.config.listeners.iter().any(|l| l.id == "base-http"));
        assert_eq!(result.config.globals.get("registry"), Some(&"memory".to_string()));
    }

    #[test]
    fn scenario_2_wrong_ingress_class_is_ignored() {
        use k8s_openapi::api::networking::v1::{Ingress, IngressSpec};
        use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

        let store = ResourceStore::new();
        store.set_ingress(
            "default",
            "wrong-class",
            Ingress {
                metadata: ObjectMeta {
                    namespace: Some("default".to_string()),
                    name: Some("wrong-class".to_string()),
                    ..Default::default()
                },
                spec: Some(IngressSpec {
                    ingress_class_name: Some("nginx".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let cfg = ControllerConfig {
            ingress_class: "gateway".to_string(),
            watch_without_class: false,
            ..Default::default()
        };
        let result = translate(&store, &StructuralValidator, &cfg).unwrap();
        assert!(result.config.routes.iter().all(|r| !r.id.starts_with("ing-")));
    }
}
