#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

#[cfg(all(target_os = "linux", target_arch = "x86_64", target_env = "gnu"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use ridgeway_ingress_core::config::Config;
use ridgeway_ingress_core::reload::ReloadSink;
use std::sync::Arc;

/// Stands in for the runway host process: logs the config it would have
/// applied. A real deployment wires its own `ReloadSink` that feeds the
/// in-process reverse proxy instead.
struct LoggingReloadSink;

impl ReloadSink for LoggingReloadSink {
    fn reload(&self, cfg: Config) {
        tracing::info!(
            routes = cfg.routes.len(),
            listeners = cfg.listeners.len(),
            "applying new runway configuration"
        );
        for listener in &cfg.listeners {
            tracing::debug!(id = %listener.id, address = %listener.address, "listener");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if rustls::crypto::aws_lc_rs::default_provider().install_default().is_err() {
        anyhow::bail!("no other crypto provider should be installed yet");
    }

    ridgeway_ingress_runtime::Args::parse_and_run(Arc::new(LoggingReloadSink)).await
}
