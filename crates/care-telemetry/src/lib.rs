//! # Care Telemetry
//!
//! Metrics and logging for the clinical services: a Prometheus registry
//! with counters and histograms keyed `(service, operation, outcome)`, and
//! the tracing-subscriber bootstrap the runtime calls once at startup.

pub mod logging;
pub mod metrics;

pub use logging::init_tracing;
pub use metrics::{observe_duration, record_outcome, text_exposition, Outcome};

use thiserror::Error;

/// Telemetry setup/exposition failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("metrics exposition failed: {0}")]
    Exposition(String),
}
