//! The runway's configuration vocabulary: listeners, routes, backends.
//!
//! These types are emitted by the translator and consumed by the runway.
//! They are plain data — nothing here talks to Kubernetes.

use std::collections::BTreeMap;

/// A single backend URL with its relative weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backend {
    pub url: String,
    pub weight: u32,
}

impl Backend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            weight: 1,
        }
    }

    pub fn weighted(url: impl Into<String>, weight: u32) -> Self {
        Self {
            url: url.into(),
            weight,
        }
    }
}

/// Host/path match criteria for a [`Route`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Match {
    pub domains: Vec<String>,
    pub methods: Vec<String>,
    pub headers: Vec<HeaderMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderMatch {
    pub name: String,
    pub value: Option<String>,
    pub regex: Option<String>,
}

/// Header add/set/remove instructions applied in one direction (request or
/// response).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderTransform {
    pub add: BTreeMap<String, String>,
    pub set: BTreeMap<String, String>,
    pub remove: Vec<String>,
}

impl HeaderTransform {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.set.is_empty() && self.remove.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionalTransform {
    pub headers: HeaderTransform,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transform {
    pub request: DirectionalTransform,
    pub response: DirectionalTransform,
}

/// A timeout policy on a route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub request: Option<std::time::Duration>,
}

/// A single routing rule emitted by the translator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub id: String,
    pub path: String,
    pub path_prefix: bool,
    pub strip_prefix: bool,
    pub r#match: Match,
    pub backends: Vec<Backend>,
    pub transform: Transform,
    pub timeout_policy: TimeoutPolicy,
    pub retries: u32,
    pub rate_limit: bool,
    pub rate_limit_rps: u32,
    pub cors_enabled: bool,
    pub circuit_breaker: bool,
    pub auth_required: bool,
    pub cache_enabled: bool,
    pub load_balancer: Option<String>,
}

impl Route {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: "/".to_string(),
            path_prefix: false,
            strip_prefix: false,
            r#match: Match::default(),
            backends: Vec::new(),
            transform: Transform::default(),
            timeout_policy: TimeoutPolicy::default(),
            retries: 0,
            rate_limit: false,
            rate_limit_rps: 0,
            cors_enabled: false,
            circuit_breaker: false,
            auth_required: false,
            cache_enabled: false,
            load_balancer: None,
        }
    }
}

/// A TLS certificate/key pair plus the hostnames it should be offered for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Certificate {
    pub hosts: Vec<String>,
    pub cert: Vec<u8>,
    pub key: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    Http,
}

/// A listening address emitted by the translator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listener {
    pub id: String,
    pub address: String,
    pub protocol: Protocol,
    pub tls_enabled: bool,
    pub certificates: Vec<Certificate>,
}

impl Listener {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            protocol: Protocol::Http,
            tls_enabled: false,
            certificates: Vec::new(),
        }
    }
}

/// The full runway configuration: listeners, routes, and opaque global
/// fields carried verbatim from the base config.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub listeners: Vec<Listener>,
    pub routes: Vec<Route>,
    pub globals: BTreeMap<String, String>,
}

impl Config {
    /// Sorts listeners and routes ascending by ID, as required of the
    /// translator's output.
    pub fn sort(&mut self) {
        self.listeners.sort_by(|a, b| a.id.cmp(&b.id));
        self.routes.sort_by(|a, b| a.id.cmp(&b.id));
    }
}
