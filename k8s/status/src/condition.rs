//! `setCondition` (§4.F): find an existing condition by `Type` and replace
//! in place; otherwise append. Last write wins.

use chrono::Utc;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, Time};

pub const TYPE_ACCEPTED: &str = "Accepted";

pub fn accepted_condition(observed_generation: i64, accepted: bool, reason: &str, message: &str) -> Condition {
    Condition {
        type_: TYPE_ACCEPTED.to_string(),
        status: if accepted { "True".to_string() } else { "False".to_string() },
        observed_generation: Some(observed_generation),
        last_transition_time: Time(Utc::now()),
        reason: reason.to_string(),
        message: message.to_string(),
    }
}

pub fn set_condition(conditions: &mut Vec<Condition>, new: Condition) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.type_ == new.type_) {
        *existing = new;
    } else {
        conditions.push(new);
    }
}
