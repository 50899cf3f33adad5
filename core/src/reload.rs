//! The runway's reload hook boundary, injected by the controller binary.

use crate::config::Config;

/// Receives one call per applied generation, carrying the newly merged
/// config. A concrete runway implements this to hot-swap its live routing
/// table; tests and the demo binary can supply a logging stand-in.
pub trait ReloadSink: Send + Sync {
    fn reload(&self, cfg: Config);
}
