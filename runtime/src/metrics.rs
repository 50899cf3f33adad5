//! Prometheus counters for the controller, grounded on the teacher's
//! `k8s/index/src/metrics.rs` `Family`/`Counter`/`Gauge` registration
//! pattern, scoped down to the counters SPEC_FULL.md §4.H names.

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;
use std::sync::Arc;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct KindLabel {
    pub kind: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ReloadOutcomeLabel {
    pub outcome: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StatusPatchLabel {
    pub kind: String,
    pub outcome: String,
}

#[derive(Clone)]
pub struct Metrics(Arc<Inner>);

struct Inner {
    store_generation: Gauge,
    reconciles_total: Family<KindLabel, Counter>,
    reloads_total: Family<ReloadOutcomeLabel, Counter>,
    reload_duration_seconds: Histogram,
    status_patches_total: Family<StatusPatchLabel, Counter>,
}

impl Metrics {
    pub fn register(registry: &mut Registry) -> Self {
        let store_generation = Gauge::default();
        registry.register(
            "store_generation",
            "Current generation of the resource store",
            store_generation.clone(),
        );

        let reconciles_total = Family::default();
        registry.register(
            "reconciles_total",
            "Count of reconcile invocations per watched kind",
            reconciles_total.clone(),
        );

        let reloads_total = Family::default();
        registry.register(
            "reloads_total",
            "Count of debounced reload attempts by outcome",
            reloads_total.clone(),
        );

        let reload_duration_seconds = Histogram::new(prometheus_client::metrics::histogram::exponential_buckets(0.001, 2.0, 12));
        registry.register(
            "reload_duration_seconds",
            "Translator wall time per applied reload",
            reload_duration_seconds.clone(),
        );

        let status_patches_total = Family::default();
        registry.register(
            "status_patches_total",
            "Count of status-subresource patch attempts by kind and outcome",
            status_patches_total.clone(),
        );

        Self(Arc::new(Inner {
            store_generation,
            reconciles_total,
            reloads_total,
            reload_duration_seconds,
            status_patches_total,
        }))
    }

    pub fn set_store_generation(&self, generation: u64) {
        self.0.store_generation.set(generation as i64);
    }

    pub fn record_reconcile(&self, kind: &str) {
        self.0
            .reconciles_total
            .get_or_create(&KindLabel { kind: kind.to_string() })
            .inc();
    }

    pub fn record_reload(&self, outcome: &str) {
        self.0
            .reloads_total
            .get_or_create(&ReloadOutcomeLabel { outcome: outcome.to_string() })
            .inc();
    }

    pub fn observe_reload_duration(&self, seconds: f64) {
        self.0.reload_duration_seconds.observe(seconds);
    }

    pub fn record_status_patch(&self, kind: &str, outcome: &str) {
        self.0
            .status_patches_total
            .get_or_create(&StatusPatchLabel {
                kind: kind.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();
    }
}

impl ridgeway_ingress_k8s_index::ReconcileMetrics for Metrics {
    fn record_reconcile(&self, kind: &str) {
        self.record_reconcile(kind);
    }
}

impl ridgeway_ingress_k8s_status_controller::StatusPatchMetrics for Metrics {
    fn record_status_patch(&self, kind: &str, outcome: &str) {
        self.record_status_patch(kind, outcome);
    }
}
