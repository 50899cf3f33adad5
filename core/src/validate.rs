//! The runway's config validator boundary. The runway itself is out of
//! scope, so it is modeled as a trait the controller crate injects; this
//! module supplies the two structural checks that are actually checkable
//! from outside the runway (route and listener ID uniqueness).

use crate::config::Config;
use std::collections::HashSet;

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate route id {0}")]
    DuplicateRouteId(String),
    #[error("duplicate listener id {0}")]
    DuplicateListenerId(String),
}

pub trait ConfigValidator: Send + Sync {
    fn validate(&self, cfg: &Config) -> Result<(), ValidationError>;
}

/// Default validator enforcing route/listener ID uniqueness (§8 properties
/// 3–4). A concrete runway may supply a stricter validator.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralValidator;

impl ConfigValidator for StructuralValidator {
    fn validate(&self, cfg: &Config) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for route in &cfg.routes {
            if !seen.insert(route.id.as_str()) {
                return Err(ValidationError::DuplicateRouteId(route.id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for listener in &cfg.listeners {
            if !seen.insert(listener.id.as_str()) {
                return Err(ValidationError::DuplicateListenerId(listener.id.clone()));
            }
        }
        Ok(())
    }
}
