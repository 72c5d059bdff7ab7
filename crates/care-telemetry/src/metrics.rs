//! Prometheus metrics for the clinical services.
//!
//! All metrics follow the naming convention `care_<metric>_<unit>` and are
//! labeled `(service, operation, outcome)` so dashboards can slice request
//! totals and latencies per service endpoint.
//!
//! ## Metric Types
//!
//! - **Counter**: monotonically increasing value (e.g. requests_total)
//! - **Histogram**: distribution of values (e.g. request_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry.
    pub static ref REGISTRY: Registry = Registry::new();

    /// Total requests handled, by service, operation and outcome.
    pub static ref REQUESTS: CounterVec = {
        let counter = CounterVec::new(
            Opts::new("care_requests_total", "Total requests handled"),
            &["service", "operation", "outcome"],
        )
        .expect("metric creation failed");
        REGISTRY
            .register(Box::new(counter.clone()))
            .expect("metric registration failed");
        counter
    };

    /// Request duration, by service and operation.
    pub static ref REQUEST_DURATION: HistogramVec = {
        let histogram = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "care_request_duration_seconds",
                "Time spent handling requests",
            )
            .buckets(exponential_buckets(0.001, 2.0, 12).expect("bucket layout")),
            &["service", "operation"],
        )
        .expect("metric creation failed");
        REGISTRY
            .register(Box::new(histogram.clone()))
            .expect("metric registration failed");
        histogram
    };

    /// Domain events published, by service and topic.
    pub static ref EVENTS_PUBLISHED: CounterVec = {
        let counter = CounterVec::new(
            Opts::new("care_events_published_total", "Domain events published"),
            &["service", "topic"],
        )
        .expect("metric creation failed");
        REGISTRY
            .register(Box::new(counter.clone()))
            .expect("metric registration failed");
        counter
    };
}

/// How an operation ended, for the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    /// Rejected by an open circuit without executing.
    ShortCircuited,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::ShortCircuited => "short-circuited",
        }
    }
}

/// Count one completed operation.
pub fn record_outcome(service: &str, operation: &str, outcome: Outcome) {
    REQUESTS
        .with_label_values(&[service, operation, outcome.as_str()])
        .inc();
}

/// Record one operation's duration in seconds.
pub fn observe_duration(service: &str, operation: &str, seconds: f64) {
    REQUEST_DURATION
        .with_label_values(&[service, operation])
        .observe(seconds);
}

/// Render the registry in the Prometheus text exposition format.
///
/// This is the payload the (external) `/metrics` endpoint serves.
pub fn text_exposition() -> Result<String, TelemetryError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::Exposition(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Exposition(e.to_string()))
}
