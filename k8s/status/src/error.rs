use std::fmt;

/// Wraps a status-subresource API failure with the resource identity that
/// caused it. Never propagated to abort a reconcile — callers log and move
/// on (§7).
#[derive(Debug, thiserror::Error)]
pub struct StatusUpdateError {
    pub resource: String,
    #[source]
    pub cause: kube::Error,
}

impl fmt::Display for StatusUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status update for {} failed: {}", self.resource, self.cause)
    }
}
