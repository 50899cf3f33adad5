//! The orchestrator (component G): owns the store, coalesces reload
//! requests, invokes the translator, and gates status writes on
//! leadership.
//!
//! Grounded on the teacher's `runtime/src/args.rs` wiring for the overall
//! shape (build index → spawn watches → spawn a reconciliation loop), but
//! the debounce mechanism itself is the spec's redesign note (§9): a
//! `tokio::sync::Notify` plus one background task, rather than a mutable
//! timer handle that gets reset on every call. Concurrent `trigger_reload`
//! calls collapse onto the single stored permit.

use crate::metrics::Metrics;
use crate::status_sweep;
use ridgeway_ingress_core::reload::ReloadSink;
use ridgeway_ingress_core::validate::ConfigValidator;
use ridgeway_ingress_k8s_api::ControllerConfig;
use ridgeway_ingress_k8s_index::{translate, ReloadTrigger, ResourceStore};
use ridgeway_ingress_k8s_status_controller::UpdateSender;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Coalesced reload signal consulted by `Controller::run_reload_loop`.
/// Implements `ReloadTrigger` so `k8s-index` reconcilers can fire it
/// without depending on this crate.
pub struct DebounceTrigger {
    notify: Notify,
}

impl DebounceTrigger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { notify: Notify::new() })
    }
}

impl ReloadTrigger for DebounceTrigger {
    fn trigger_reload(&self) {
        self.notify.notify_one();
    }
}

/// Reports whether the local instance currently holds the leadership
/// lease. A trait rather than a concrete `kubert::lease::Claim` receiver
/// so the debounce loop can be tested without a lease manager.
pub trait LeadershipGate: Send + Sync {
    fn is_leader(&self) -> bool;
}

pub struct Controller {
    store: ResourceStore,
    cfg: Arc<ControllerConfig>,
    validator: Arc<dyn ConfigValidator>,
    sink: Arc<dyn ReloadSink>,
    trigger: Arc<DebounceTrigger>,
    leadership: Arc<dyn LeadershipGate>,
    metrics: Metrics,
    status_tx: UpdateSender,
    last_applied_gen: AtomicU64,
    reloading: AtomicBool,
}

impl Controller {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: ResourceStore,
        cfg: Arc<ControllerConfig>,
        validator: Arc<dyn ConfigValidator>,
        sink: Arc<dyn ReloadSink>,
        trigger: Arc<DebounceTrigger>,
        leadership: Arc<dyn LeadershipGate>,
        metrics: Metrics,
        status_tx: UpdateSender,
    ) -> Self {
        Self {
            store,
            cfg,
            validator,
            sink,
            trigger,
            leadership,
            metrics,
            status_tx,
            last_applied_gen: AtomicU64::new(u64::MAX),
            reloading: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn is_leader(&self) -> bool {
        self.leadership.is_leader()
    }

    /// Blocks forever, draining debounced reload signals. Each signal is
    /// followed by a `DebounceDelay` sleep before `do_reload` runs, so
    /// bursts of concurrent `TriggerReload` calls collapse into one pass.
    pub async fn run_reload_loop(&self) {
        loop {
            self.trigger.notify.notified().await;
            if !self.cfg.debounce_delay.is_zero() {
                tokio::time::sleep(self.cfg.debounce_delay).await;
            }
            self.do_reload();
        }
    }

    fn do_reload(&self) {
        self.metrics.set_store_generation(self.store.generation());

        let gen = self.store.generation();
        if gen == self.last_applied_gen.load(Ordering::SeqCst) {
            self.metrics.record_reload("skipped");
            return;
        }
        if self
            .reloading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let start = std::time::Instant::now();
        let result = translate::translate(&self.store, self.validator.as_ref(), &self.cfg);
        let outcome = match result {
            Ok(translation) => {
                for warning in &translation.warnings {
                    tracing::warn!(%warning, "translation warning");
                }
                self.sink.reload(translation.config);
                self.last_applied_gen.store(gen, Ordering::SeqCst);
                if self.leadership.is_leader() {
                    status_sweep::sweep(&self.store, &self.cfg, &self.status_tx);
                }
                "applied"
            }
            Err(e) => {
                tracing::warn!(error = %e, "validation failed, skipping reload");
                "validation_failed"
            }
        };
        self.metrics.observe_reload_duration(start.elapsed().as_secs_f64());
        self.metrics.record_reload(outcome);
        self.reloading.store(false, Ordering::SeqCst);
    }
}

/// Leadership gate backed by `kubert::lease::Claim` watches, as the
/// teacher's `runtime/src/lease.rs` produces.
pub struct LeaseLeadershipGate {
    claims: tokio::sync::watch::Receiver<Arc<kubert::lease::Claim>>,
    claimant: String,
}

impl LeaseLeadershipGate {
    pub fn new(claims: tokio::sync::watch::Receiver<Arc<kubert::lease::Claim>>, claimant: String) -> Self {
        Self { claims, claimant }
    }
}

impl LeadershipGate for LeaseLeadershipGate {
    fn is_leader(&self) -> bool {
        self.claims.borrow().holder == self.claimant
    }
}
