//! Gateway-API-shaped path/header match and filter vocabulary, decoupled
//! from the `gateway-api` crate's wire types so this crate stays
//! cluster-client-free. `ridgeway-ingress-k8s-index` converts the wire
//! types into these before calling [`apply_filter`].

use crate::config::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathMatchType {
    Exact,
    PathPrefix,
    RegularExpression,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderModifier {
    pub add: Vec<(String, String)>,
    pub set: Vec<(String, String)>,
    pub remove: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathModifierType {
    PrefixMatch,
    FullPath,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlRewrite {
    pub path_modifier_type: Option<PathModifierType>,
    pub replace_prefix_match: Option<String>,
}

/// One HTTPRoute filter, in the subset this translator understands plus a
/// catch-all for everything it doesn't.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    RequestHeaderModifier(HeaderModifier),
    ResponseHeaderModifier(HeaderModifier),
    UrlRewrite(UrlRewrite),
    RequestRedirect,
    RequestMirror,
    Unrecognized,
}

/// Applies one filter to the route under construction, returning a warning
/// when the filter cannot be fully honored. Mirrors §4.E.6 exactly: header
/// modifiers merge into the route's transform maps, URL rewrite maps to
/// `StripPrefix` only for a prefix-match replacement, and redirect/mirror/
/// unrecognized filters never mutate the route.
pub fn apply_filter(route: &mut Route, filter: &Filter) -> Option<String> {
    match filter {
        Filter::RequestHeaderModifier(hm) => {
            let headers = &mut route.transform.request.headers;
            headers.add.extend(hm.add.iter().cloned());
            headers.set.extend(hm.set.iter().cloned());
            headers.remove.extend(hm.remove.iter().cloned());
            None
        }
        Filter::ResponseHeaderModifier(hm) => {
            let headers = &mut route.transform.response.headers;
            headers.add.extend(hm.add.iter().cloned());
            headers.set.extend(hm.set.iter().cloned());
            headers.remove.extend(hm.remove.iter().cloned());
            None
        }
        Filter::UrlRewrite(rw) => {
            if matches!(rw.path_modifier_type, Some(PathModifierType::PrefixMatch))
                && rw.replace_prefix_match.is_some()
            {
                route.strip_prefix = true;
                None
            } else {
                Some("unsupported URLRewrite: only prefix-match path modifiers are honored".to_string())
            }
        }
        Filter::RequestRedirect => {
            Some("RequestRedirect filter requires manual rules configuration".to_string())
        }
        Filter::RequestMirror => Some("RequestMirror filter is not supported".to_string()),
        Filter::Unrecognized => Some("unrecognized HTTPRoute filter type".to_string()),
    }
}
