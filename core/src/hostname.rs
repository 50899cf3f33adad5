//! Hostname wildcard matching and intersection used to reconcile HTTPRoute
//! hostnames against a parent Gateway listener's hostname.

/// Single-label wildcard match: `*.example.com` matches `foo.example.com`
/// but not `deep.foo.example.com`.
pub fn hostname_match(name: &str, pattern: &str) -> bool {
    if name == pattern {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix("*.") {
        return matches_wildcard_suffix(name, suffix);
    }
    if let Some(suffix) = name.strip_prefix("*.") {
        return matches_wildcard_suffix(pattern, suffix);
    }
    false
}

fn matches_wildcard_suffix(name: &str, suffix: &str) -> bool {
    match name.strip_suffix(suffix) {
        Some(prefix) => !prefix.is_empty() && !prefix[..prefix.len() - 1].contains('.'),
        None => false,
    }
}

/// Intersects route hostnames with gateway listener hostnames. An empty
/// side returns the other side verbatim; otherwise keeps route hosts that
/// match some gateway host, preserving route-host ordering.
pub fn intersect_hostnames(route_hosts: &[String], gateway_hosts: &[String]) -> Vec<String> {
    if route_hosts.is_empty() {
        return gateway_hosts.to_vec();
    }
    if gateway_hosts.is_empty() {
        return route_hosts.to_vec();
    }
    route_hosts
        .iter()
        .filter(|rh| gateway_hosts.iter().any(|gh| hostname_match(rh, gh)))
        .cloned()
        .collect()
}
