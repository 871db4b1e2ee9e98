//! Observability for the Locations service.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - [`RequestContext`] and [`OperationRecord`], the request-scoped values
//!   passed between middleware, handlers and services
//! - [`RequestScope`], the per-request guard that flushes metrics and closes the
//!   trace span exactly once
//! - Axum middleware that opens the scope for every request
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, middleware::request_scope};
//!
//! init_metrics()?;
//!
//! let app = Router::new()
//!     .route("/locations", get(list))
//!     .layer(axum::middleware::from_fn(request_scope))
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod context;
pub mod middleware;
pub mod scope;

pub use context::{Operation, OperationRecord, RequestContext};
pub use middleware::request_scope;
pub use scope::RequestScope;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

/// `service` label value on every metric.
pub const SERVICE_NAME: &str = "Locations";

pub const PROCESSED_TOTAL: &str = "processed_locations_total";
pub const ERRORS_TOTAL: &str = "locations_errors_total";
pub const REQUEST_DURATION: &str = "locations_request_duration_seconds";

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at application startup; later calls return the same handle.
///
/// # Errors
/// Fails if another global recorder is already installed.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION.to_string()),
                DURATION_BUCKETS,
            )?
            .install_recorder()?;

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(PROCESSED_TOTAL, "Requests processed by the Locations service");
    describe_counter!(
        ERRORS_TOTAL,
        "Locations requests that ended in a 4xx, 5xx or were cancelled"
    );
    describe_histogram!(
        REQUEST_DURATION,
        metrics::Unit::Seconds,
        "Locations request duration in seconds"
    );
}
