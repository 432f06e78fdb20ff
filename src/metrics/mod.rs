//! Rebuild metrics
//!
//! Each manager owns its own registry so separate vaults (and tests) never
//! share counters.

use prometheus::{
    register_counter_vec_with_registry, register_gauge_with_registry,
    register_histogram_with_registry, CounterVec, Encoder, Gauge, Histogram, HistogramOpts,
    Opts, Registry, TextEncoder,
};

/// Outcome label values for `vault_context_rebuilds_total`
pub const OUTCOME_COMPLETED: &str = "completed";
pub const OUTCOME_FAILED: &str = "failed";
pub const OUTCOME_CONFLICT: &str = "conflict";

/// Metrics collector for vault context rebuilds
pub struct RebuildMetrics {
    registry: Registry,

    pub rebuilds: CounterVec,
    pub rebuild_duration: Histogram,
    pub notes: Gauge,
    pub compacted_chars: Gauge,
}

impl RebuildMetrics {
    /// Create a collector with a fresh registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let rebuilds = register_counter_vec_with_registry!(
            Opts::new("vault_context_rebuilds_total", "Vault context rebuild attempts"),
            &["outcome"],
            registry
        )?;

        let rebuild_duration = register_histogram_with_registry!(
            HistogramOpts::new(
                "vault_context_rebuild_duration_seconds",
                "Duration of scan, compact and save in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            registry
        )?;

        let notes = register_gauge_with_registry!(
            "vault_context_notes",
            "Notes in the current context",
            registry
        )?;

        let compacted_chars = register_gauge_with_registry!(
            "vault_context_compacted_chars",
            "Characters in the current compacted context",
            registry
        )?;

        Ok(Self {
            registry,
            rebuilds,
            rebuild_duration,
            notes,
            compacted_chars,
        })
    }

    /// Count one rebuild attempt with the given outcome label
    pub fn record_outcome(&self, outcome: &str) {
        self.rebuilds.with_label_values(&[outcome]).inc();
    }

    /// Number of rebuild attempts recorded for an outcome
    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.rebuilds.with_label_values(&[outcome]).get() as u64
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
