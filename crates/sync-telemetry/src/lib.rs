//! # Sync Telemetry
//!
//! Observability for committee sync replicas.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with env-filter, pretty or JSON output
//! - **Metrics**: Prometheus counters, gauges and histograms in a global registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sync_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CS_SERVICE_NAME` | `committee-sync` | Service name in log lines |
//! | `CS_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CS_CONSOLE_OUTPUT` | `true` | Write log lines to stderr |
//! | `CS_JSON_LOGS` | `false` | Emit JSON log lines |
//!
//! Metrics are gathered in-process; hosts export them with `encode_metrics()`.

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, BOOTSTRAP_INITS, COMMITTEE_SIZE,
    CURRENT_NONCE, SIGNATURES_COUNTED, SIGNATURES_SKIPPED, SYNC_DURATION, SYNC_REJECTIONS,
    TRANSITIONS_APPLIED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard that should be held for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!("Shutting down telemetry");
    }
}

/// Create a span carrying the subsystem name.
///
/// ```rust,ignore
/// let _span = sync_telemetry::subsystem_span!("sync", subsystem = "committee-sync", nonce = 7).entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
