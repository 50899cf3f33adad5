//! The controller configuration record handed in from the runway host
//! process (§6 inbound interfaces table).

use ridgeway_ingress_core::Config;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Class string matched against an Ingress's `spec.ingressClassName`
    /// or its legacy `kubernetes.io/ingress.class` annotation.
    pub ingress_class: String,
    /// Controller identity matched against a GatewayClass's controller
    /// name.
    pub controller_name: String,
    /// Namespaces to watch; empty means all namespaces.
    pub watch_namespaces: Vec<String>,
    /// Claim Ingresses that declare neither a class field nor the legacy
    /// annotation.
    pub watch_without_class: bool,
    pub enable_ingress: bool,
    pub enable_gateway_api: bool,
    /// Reload coalescing window.
    pub debounce_delay: Duration,
    /// Static config merged with derived output.
    pub base_config: Config,
    /// IP/hostname published in Ingress LoadBalancer status.
    pub publish_address: String,
    pub default_http_port: u16,
    pub default_https_port: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ingress_class: String::new(),
            controller_name: String::new(),
            watch_namespaces: Vec::new(),
            watch_without_class: false,
            enable_ingress: true,
            enable_gateway_api: true,
            debounce_delay: Duration::from_millis(100),
            base_config: Config::default(),
            publish_address: String::new(),
            default_http_port: 8080,
            default_https_port: 8443,
        }
    }
}
