//! Prometheus metrics for committee sync replicas.
//!
//! All metrics follow the naming convention: `cs_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., transitions_applied_total)
//! - **Gauge**: Value that can go up or down (e.g., committee_size)
//! - **Histogram**: Distribution of values (e.g., sync_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSITION METRICS
    // =========================================================================

    /// Roster transitions committed (one per `sync` and per batch step)
    pub static ref TRANSITIONS_APPLIED: Counter = Counter::new(
        "cs_sync_transitions_applied_total",
        "Total number of committee transitions committed"
    ).expect("metric creation failed");

    /// Rejected calls by operation and reason
    pub static ref SYNC_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("cs_sync_rejections_total", "Rejected sync/syncs/init calls"),
        &["operation", "reason"]  // operation: sync/syncs/init
    ).expect("metric creation failed");

    /// Successful bootstrap nonce seeds
    pub static ref BOOTSTRAP_INITS: Counter = Counter::new(
        "cs_sync_bootstrap_inits_total",
        "Total number of bootstrap nonce initializations"
    ).expect("metric creation failed");

    /// Time spent inside a mutating call
    pub static ref SYNC_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "cs_sync_duration_seconds",
            "Time spent validating and committing a mutating call"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // SIGNATURE METRICS
    // =========================================================================

    /// Distinct authorized approvals counted
    pub static ref SIGNATURES_COUNTED: Counter = Counter::new(
        "cs_signatures_counted_total",
        "Distinct current-member approvals counted"
    ).expect("metric creation failed");

    /// Approvals discarded by the counter
    pub static ref SIGNATURES_SKIPPED: CounterVec = CounterVec::new(
        Opts::new("cs_signatures_skipped_total", "Approvals discarded by the signature counter"),
        &["reason"]  // reason: unrecoverable/non_member/duplicate
    ).expect("metric creation failed");

    // =========================================================================
    // STATE METRICS
    // =========================================================================

    /// Current committee size
    pub static ref COMMITTEE_SIZE: Gauge = Gauge::new(
        "cs_state_committee_size",
        "Number of members in the current committee"
    ).expect("metric creation failed");

    /// Current nonce
    pub static ref CURRENT_NONCE: Gauge = Gauge::new(
        "cs_state_nonce",
        "Current committee nonce"
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Transitions
        Box::new(TRANSITIONS_APPLIED.clone()),
        Box::new(SYNC_REJECTIONS.clone()),
        Box::new(BOOTSTRAP_INITS.clone()),
        Box::new(SYNC_DURATION.clone()),
        // Signatures
        Box::new(SIGNATURES_COUNTED.clone()),
        Box::new(SIGNATURES_SKIPPED.clone()),
        // State
        Box::new(COMMITTEE_SIZE.clone()),
        Box::new(CURRENT_NONCE.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
