//! Per-request metric and trace scope.

use crate::context::{OperationRecord, RequestContext};
use crate::{ERRORS_TOTAL, PROCESSED_TOTAL, REQUEST_DURATION, SERVICE_NAME};
use axum::http::StatusCode;
use metrics::{counter, histogram};
use std::time::Instant;
use tracing::{Span, field};

/// Status label recorded when the request future was dropped before a response existed.
pub const CANCELLED: &str = "cancelled";

/// RAII guard covering one request.
///
/// Opening the scope creates the `locations-service` span. The scope is
/// flushed exactly once, when it is dropped: either after [`RequestScope::finish`]
/// with the response status, or with status `cancelled` if the request future
/// was dropped mid-flight. Flushing records:
/// - `processed_locations_total` for every request
/// - `locations_errors_total` for 4xx, 5xx and cancelled requests
/// - `locations_request_duration_seconds`
///
/// Metric calls are no-ops when no recorder is installed.
pub struct RequestScope {
    context: RequestContext,
    span: Span,
    started: Instant,
    status: Option<StatusCode>,
    payload: Option<OperationRecord>,
}

impl RequestScope {
    pub fn open(context: RequestContext) -> Self {
        let span = tracing::info_span!(
            "locations-service",
            request_id = %context.request_id,
            method = %context.method,
            route = %context.route,
            status = field::Empty,
            latency_ms = field::Empty,
        );

        Self {
            context,
            span,
            started: Instant::now(),
            status: None,
            payload: None,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn record_payload(&mut self, record: OperationRecord) {
        self.payload = Some(record);
    }

    /// Close the scope with the response status.
    pub fn finish(mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn flush(&mut self) {
        let elapsed = self.started.elapsed();
        let (status_label, is_error) = match self.status {
            Some(status) => (
                status.as_u16().to_string(),
                status.is_client_error() || status.is_server_error(),
            ),
            None => (CANCELLED.to_string(), true),
        };

        let method = self.context.method.clone();
        let route = self.context.route.clone();

        counter!(
            PROCESSED_TOTAL,
            "service" => SERVICE_NAME,
            "method" => method.clone(),
            "route" => route.clone(),
            "status" => status_label.clone()
        )
        .increment(1);

        if is_error {
            counter!(
                ERRORS_TOTAL,
                "service" => SERVICE_NAME,
                "method" => method.clone(),
                "route" => route.clone(),
                "status" => status_label.clone()
            )
            .increment(1);
        }

        histogram!(
            REQUEST_DURATION,
            "service" => SERVICE_NAME,
            "method" => method,
            "route" => route
        )
        .record(elapsed.as_secs_f64());

        let latency_ms = elapsed.as_millis() as u64;
        self.span.record("status", status_label.as_str());
        self.span.record("latency_ms", latency_ms);

        let operation = self.payload.as_ref().map(|p| p.operation.to_string());
        let resource_id = self.payload.as_ref().and_then(|p| p.resource_id.clone());

        self.span.in_scope(|| {
            if is_error {
                tracing::warn!(
                    request_id = %self.context.request_id,
                    status = %status_label,
                    latency_ms,
                    operation = operation.as_deref(),
                    location_id = resource_id.as_deref(),
                    "request failed"
                );
            } else {
                tracing::info!(
                    request_id = %self.context.request_id,
                    status = %status_label,
                    latency_ms,
                    operation = operation.as_deref(),
                    location_id = resource_id.as_deref(),
                    "request completed"
                );
            }
        });
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Operation;
    use test_utils::CountingRecorder;

    fn context() -> RequestContext {
        RequestContext::new("req-1", "GET", "/locations/{id}")
    }

    #[test]
    fn test_success_flushes_once_without_error() {
        let recorder = CountingRecorder::default();
        metrics::with_local_recorder(&recorder, || {
            let mut scope = RequestScope::open(context());
            scope.record_payload(OperationRecord::new(Operation::Get).with_resource_id("42"));
            scope.finish(StatusCode::OK);
        });

        assert_eq!(recorder.count(PROCESSED_TOTAL), 1);
        assert_eq!(recorder.count(ERRORS_TOTAL), 0);
        assert_eq!(recorder.statuses(PROCESSED_TOTAL), vec!["200"]);
    }

    #[test]
    fn test_error_status_records_error_metric() {
        let recorder = CountingRecorder::default();
        metrics::with_local_recorder(&recorder, || {
            RequestScope::open(context()).finish(StatusCode::NOT_FOUND);
        });

        assert_eq!(recorder.count(PROCESSED_TOTAL), 1);
        assert_eq!(recorder.count(ERRORS_TOTAL), 1);
        assert_eq!(recorder.statuses(ERRORS_TOTAL), vec!["404"]);
    }

    #[test]
    fn test_dropped_scope_is_cancelled() {
        let recorder = CountingRecorder::default();
        metrics::with_local_recorder(&recorder, || {
            let scope = RequestScope::open(context());
            drop(scope);
        });

        assert_eq!(recorder.count(PROCESSED_TOTAL), 1);
        assert_eq!(recorder.statuses(ERRORS_TOTAL), vec![CANCELLED]);
    }
}
