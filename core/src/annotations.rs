//! Typed accessor over an opaque annotation map, with per-type default
//! fallback and the vendor annotation table.

use std::collections::BTreeMap;
use std::time::Duration;

const TRUE_TOKENS: &[&str] = &["true", "1", "yes", "y", "t"];
const FALSE_TOKENS: &[&str] = &["false", "0", "no", "n", "f"];

/// Wraps a borrowed `namespace/name` annotation map with typed getters.
///
/// A missing key or an empty value falls back to the caller-supplied
/// default, except [`Annotations::has`], which is true for a present but
/// empty value.
#[derive(Clone, Copy, Debug)]
pub struct Annotations<'a> {
    map: &'a BTreeMap<String, String>,
}

impl<'a> Annotations<'a> {
    pub fn new(map: &'a BTreeMap<String, String>) -> Self {
        Self { map }
    }

    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.map.get(key) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => default.to_string(),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        let Some(v) = self.map.get(key) else {
            return default;
        };
        if v.is_empty() {
            return default;
        }
        let lower = v.to_ascii_lowercase();
        if TRUE_TOKENS.contains(&lower.as_str()) {
            true
        } else if FALSE_TOKENS.contains(&lower.as_str()) {
            false
        } else {
            default
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.map.get(key) {
            Some(v) if !v.is_empty() => v.parse::<i64>().unwrap_or(default),
            _ => default,
        }
    }

    pub fn get_duration(&self, key: &str, default: Duration) -> Duration {
        match self.map.get(key) {
            Some(v) if !v.is_empty() => parse_duration(v).unwrap_or(default),
            _ => default,
        }
    }
}

/// Parses a unit-suffixed duration string (`10s`, `1h30m`). Bare numbers
/// without a unit are rejected, matching the annotation parser's contract
/// that "duration" fields never implicitly mean seconds.
fn parse_duration(s: &str) -> Option<Duration> {
    let mut total = Duration::ZERO;
    let mut rest = s;
    let mut matched_any = false;
    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let (num, tail) = rest.split_at(digits_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, remainder) = tail.split_at(unit_end);
        let n: u64 = num.parse().ok()?;
        let unit_duration = match unit {
            "ms" => Duration::from_millis(n),
            "s" => Duration::from_secs(n),
            "m" => Duration::from_secs(n * 60),
            "h" => Duration::from_secs(n * 3600),
            _ => return None,
        };
        total += unit_duration;
        matched_any = true;
        rest = remainder;
    }
    matched_any.then_some(total)
}

/// Vendor-namespaced annotation keys recognized by the translator.
pub mod keys {
    pub const RATE_LIMIT: &str = "rate-limit";
    pub const TIMEOUT: &str = "timeout";
    pub const RETRY_MAX: &str = "retry-max";
    pub const CORS_ENABLED: &str = "cors-enabled";
    pub const CIRCUIT_BREAKER: &str = "circuit-breaker";
    pub const AUTH_REQUIRED: &str = "auth-required";
    pub const CACHE_ENABLED: &str = "cache-enabled";
    pub const LOAD_BALANCER: &str = "load-balancer";
    pub const STRIP_PREFIX: &str = "strip-prefix";
    pub const UPSTREAM_MODE: &str = "upstream-mode";

    /// Legacy alias consulted by the Ingress reconciler for ownership only.
    pub const LEGACY_INGRESS_CLASS: &str = "kubernetes.io/ingress.class";
}

/// Applies the annotation table (§4.B) onto a route under construction.
pub fn apply(route: &mut crate::config::Route, annotations: Annotations<'_>) {
    if annotations.get_int(keys::RATE_LIMIT, 0) > 0 {
        route.rate_limit = true;
        route.rate_limit_rps = annotations.get_int(keys::RATE_LIMIT, 0) as u32;
    }
    if let Some(timeout) = annotations
        .has(keys::TIMEOUT)
        .then(|| annotations.get_duration(keys::TIMEOUT, Duration::ZERO))
    {
        if timeout > Duration::ZERO {
            route.timeout_policy.request = Some(timeout);
        }
    }
    route.retries = annotations.get_int(keys::RETRY_MAX, route.retries as i64) as u32;
    route.cors_enabled = annotations.get_bool(keys::CORS_ENABLED, route.cors_enabled);
    route.circuit_breaker = annotations.get_bool(keys::CIRCUIT_BREAKER, route.circuit_breaker);
    route.auth_required = annotations.get_bool(keys::AUTH_REQUIRED, route.auth_required);
    route.cache_enabled = annotations.get_bool(keys::CACHE_ENABLED, route.cache_enabled);
    if annotations.has(keys::LOAD_BALANCER) {
        route.load_balancer = Some(annotations.get_string(keys::LOAD_BALANCER, ""));
    }
    route.strip_prefix = annotations.get_bool(keys::STRIP_PREFIX, route.strip_prefix);
}

/// Backend resolution mode chosen by the `upstream-mode` annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpstreamMode {
    EndpointSlice,
    ClusterIp,
}

pub fn upstream_mode(annotations: Annotations<'_>) -> UpstreamMode {
    match annotations.get_string(keys::UPSTREAM_MODE, "endpointslice").as_str() {
        "clusterip" => UpstreamMode::ClusterIp,
        _ => UpstreamMode::EndpointSlice,
    }
}
