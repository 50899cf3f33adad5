//! `UpdateHTTPRouteStatus` (§4.F): upserts a `RouteParentStatus` entry
//! keyed by parent-ref equivalence (group + name; kind/namespace/section
//! are the caller's concern, matching `isSameParentRef` in §4.E.5).

use crate::condition::{accepted_condition, set_condition};
use ridgeway_ingress_k8s_api::gateway;

pub const GATEWAY_API_GROUP: &str = "gateway.networking.k8s.io";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentRefKey {
    pub group: String,
    pub name: String,
}

pub fn is_same_parent_ref(a: &ParentRefKey, b: &ParentRefKey) -> bool {
    a.group == b.group && a.name == b.name
}

pub fn upsert_route_parent_status(
    statuses: &mut Vec<gateway::HTTPRouteStatusParents>,
    parent: ParentRefKey,
    controller_name: &str,
    observed_generation: i64,
    accepted: bool,
    reason: &str,
    message: &str,
) {
    let condition = accepted_condition(observed_generation, accepted, reason, message);
    let existing = statuses.iter_mut().find(|s| {
        is_same_parent_ref(
            &ParentRefKey {
                group: s
                    .parent_ref
                    .group
                    .clone()
                    .filter(|g| !g.is_empty())
                    .unwrap_or_else(|| GATEWAY_API_GROUP.to_string()),
                name: s.parent_ref.name.clone(),
            },
            &parent,
        )
    });

    match existing {
        Some(entry) => {
            entry.controller_name = controller_name.to_string();
            let mut conditions = entry.conditions.clone().unwrap_or_default();
            set_condition(&mut conditions, condition);
            entry.conditions = Some(conditions);
        }
        None => {
            statuses.push(gateway::HTTPRouteStatusParents {
                parent_ref: gateway::HTTPRouteStatusParentsParentRef {
                    group: Some(parent.group),
                    kind: Some("Gateway".to_string()),
                    name: parent.name,
                    namespace: None,
                    section_name: None,
                    port: None,
                },
                controller_name: controller_name.to_string(),
                conditions: Some(vec![condition]),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(name: &str) -> ParentRefKey {
        ParentRefKey {
            group: GATEWAY_API_GROUP.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn appends_new_parent_status_when_absent() {
        let mut statuses = vec![];
        upsert_route_parent_status(&mut statuses, parent("main-gw"), "ridgeway.io/controller", 1, true, "Accepted", "ok");
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].parent_ref.name, "main-gw");
    }

    #[test]
    fn overwrites_accepted_condition_for_existing_parent() {
        let mut statuses = vec![];
        upsert_route_parent_status(&mut statuses, parent("main-gw"), "ridgeway.io/controller", 1, true, "Accepted", "ok");
        upsert_route_parent_status(&mut statuses, parent("main-gw"), "ridgeway.io/controller", 2, false, "NoMatchingParent", "gone");
        assert_eq!(statuses.len(), 1);
        let conditions = statuses[0].conditions.as_ref().unwrap();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].status, "False");
    }
}
