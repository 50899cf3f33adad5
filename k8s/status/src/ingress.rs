//! `UpdateIngressStatus` (§4.F): publishes a LoadBalancer address, choosing
//! between an IP and a hostname entry with a conservative literal
//! heuristic.

use k8s_openapi::api::networking::v1::IngressLoadBalancerIngress;

/// Contains only digits, dots, colons, and hex letters — the same loose
/// IPv4/IPv6-literal heuristic the spec calls for rather than full parsing,
/// since a real IP parse would also have to reject trailing garbage the
/// spec doesn't ask us to care about.
fn looks_like_ip_literal(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_hexdigit() || c == '.' || c == ':')
}

/// Returns `None` when `publish_address` is empty (no-op per §4.F).
pub fn desired_load_balancer_ingress(publish_address: &str) -> Option<IngressLoadBalancerIngress> {
    if publish_address.is_empty() {
        return None;
    }
    if looks_like_ip_literal(publish_address) {
        Some(IngressLoadBalancerIngress {
            ip: Some(publish_address.to_string()),
            ..Default::default()
        })
    } else {
        Some(IngressLoadBalancerIngress {
            hostname: Some(publish_address.to_string()),
            ..Default::default()
        })
    }
}
