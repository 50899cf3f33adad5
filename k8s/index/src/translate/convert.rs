//! Small pure conversions from `gateway-api` wire filter/match types into
//! this crate's `ridgeway_ingress_core::filters` vocabulary, mirroring the
//! teacher's `http_route::convert` submodule of narrow, testable
//! converters rather than one monolithic translation function.

use ridgeway_ingress_core::filters::{Filter, HeaderModifier, PathModifierType, UrlRewrite};
use ridgeway_ingress_k8s_api::gateway;
use ridgeway_ingress_k8s_api::gateway::{HTTPRouteRulesFiltersType, HTTPRouteRulesFiltersUrlRewritePathType};

pub fn header_modifier(hm: &gateway::HTTPRouteRulesFiltersRequestHeaderModifier) -> HeaderModifier {
    HeaderModifier {
        add: hm
            .add
            .iter()
            .flatten()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect(),
        set: hm
            .set
            .iter()
            .flatten()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect(),
        remove: hm.remove.clone().unwrap_or_default(),
    }
}

pub fn response_header_modifier(
    hm: &gateway::HTTPRouteRulesFiltersResponseHeaderModifier,
) -> HeaderModifier {
    HeaderModifier {
        add: hm
            .add
            .iter()
            .flatten()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect(),
        set: hm
            .set
            .iter()
            .flatten()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect(),
        remove: hm.remove.clone().unwrap_or_default(),
    }
}

pub fn url_rewrite(rw: &gateway::HTTPRouteRulesFiltersUrlRewrite) -> UrlRewrite {
    let path = rw.path.as_ref();
    UrlRewrite {
        path_modifier_type: path.map(|p| match p.r#type {
            HTTPRouteRulesFiltersUrlRewritePathType::ReplacePrefixMatch => PathModifierType::PrefixMatch,
            HTTPRouteRulesFiltersUrlRewritePathType::ReplaceFullPath => PathModifierType::FullPath,
        }),
        replace_prefix_match: path.and_then(|p| p.replace_prefix_match.clone()),
    }
}

pub fn filter(f: &gateway::HTTPRouteRulesFilters) -> Filter {
    match f.r#type {
        HTTPRouteRulesFiltersType::RequestHeaderModifier => f
            .request_header_modifier
            .as_ref()
            .map(header_modifier)
            .map(Filter::RequestHeaderModifier)
            .unwrap_or(Filter::Unrecognized),
        HTTPRouteRulesFiltersType::ResponseHeaderModifier => f
            .response_header_modifier
            .as_ref()
            .map(response_header_modifier)
            .map(Filter::ResponseHeaderModifier)
            .unwrap_or(Filter::Unrecognized),
        HTTPRouteRulesFiltersType::UrlRewrite => f
            .url_rewrite
            .as_ref()
            .map(url_rewrite)
            .map(Filter::UrlRewrite)
            .unwrap_or(Filter::Unrecognized),
        HTTPRouteRulesFiltersType::RequestRedirect => Filter::RequestRedirect,
        HTTPRouteRulesFiltersType::RequestMirror => Filter::RequestMirror,
        HTTPRouteRulesFiltersType::ExtensionRef => Filter::Unrecognized,
    }
}
