//! Axum middleware that wraps every request in a [`RequestScope`].

use crate::context::{OperationRecord, RequestContext};
use crate::scope::RequestScope;
use axum::{body::Body, extract::Request, http::Response, middleware::Next};
use tracing::Instrument;

/// Opens a [`RequestScope`] around the inner service.
///
/// Builds the [`RequestContext`] and stores it in the request extensions so
/// handlers can extract it. Picks up the [`OperationRecord`] a handler attached to
/// its response. The scope flushes when this future completes or is dropped.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use observability::middleware::request_scope;
///
/// let app = Router::new()
///     .route("/locations", get(handler))
///     .layer(middleware::from_fn(request_scope));
/// ```
pub async fn request_scope(mut request: Request, next: Next) -> Response<Body> {
    let context = RequestContext::from_request(&request);
    request.extensions_mut().insert(context.clone());

    let mut scope = RequestScope::open(context);
    let span = scope.span().clone();

    let response = next.run(request).instrument(span).await;

    if let Some(record) = response.extensions().get::<OperationRecord>() {
        scope.record_payload(record.clone());
    }
    scope.finish(response.status());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Operation, UNMATCHED_ROUTE};
    use crate::{ERRORS_TOTAL, PROCESSED_TOTAL};
    use axum::{
        Extension, Router,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
    };
    use http_body_util::BodyExt;
    use test_utils::CountingRecorder;
    use tower::ServiceExt;

    async fn echo(ctx: RequestContext) -> (Extension<OperationRecord>, String) {
        (
            Extension(OperationRecord::new(Operation::Get).with_resource_id("42")),
            format!("{}|{}|{}", ctx.request_id, ctx.method, ctx.route),
        )
    }

    #[tokio::test]
    async fn test_context_reaches_handler_with_matched_route() {
        let app = Router::new()
            .route("/locations/{id}", get(echo))
            .layer(middleware::from_fn(request_scope));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/locations/42")
                    .header("requestId", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.extensions().get::<OperationRecord>().is_some());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"abc-123|GET|/locations/{id}");
    }

    #[tokio::test]
    async fn test_context_extracts_without_middleware() {
        let app = Router::new().route("/locations/{id}", get(echo));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/locations/7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"|GET|/locations/{id}");
    }

    async fn missing(ctx: RequestContext) -> impl IntoResponse {
        (
            StatusCode::NOT_FOUND,
            Extension(OperationRecord::new(Operation::Get).with_resource_id("gone")),
            ctx.route,
        )
    }

    async fn broken() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn get_request(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_failed_request_flushes_once_with_error() {
        let recorder = CountingRecorder::default();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/locations/{id}", get(missing))
            .layer(middleware::from_fn(request_scope));

        let response = app.oneshot(get_request("/locations/gone")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<OperationRecord>().is_some());
        assert_eq!(recorder.count(PROCESSED_TOTAL), 1);
        assert_eq!(recorder.count(ERRORS_TOTAL), 1);
        assert_eq!(recorder.statuses(ERRORS_TOTAL), vec!["404"]);
    }

    #[tokio::test]
    async fn test_server_error_flushes_once_with_error() {
        let recorder = CountingRecorder::default();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/locations", get(broken))
            .layer(middleware::from_fn(request_scope));

        let response = app.oneshot(get_request("/locations")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(recorder.count(PROCESSED_TOTAL), 1);
        assert_eq!(recorder.statuses(ERRORS_TOTAL), vec!["500"]);
    }

    #[tokio::test]
    async fn test_success_records_no_error() {
        let recorder = CountingRecorder::default();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/locations/{id}", get(echo))
            .layer(middleware::from_fn(request_scope));

        app.oneshot(get_request("/locations/42")).await.unwrap();

        assert_eq!(recorder.count(PROCESSED_TOTAL), 1);
        assert_eq!(recorder.count(ERRORS_TOTAL), 0);
    }

    #[tokio::test]
    async fn test_unmatched_path_under_nested_router_is_scoped() {
        let recorder = CountingRecorder::default();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let locations = Router::new()
            .route("/{id}", get(echo))
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn(request_scope));
        let app = Router::new().nest("/locations", locations);

        let response = app.oneshot(get_request("/locations/a/b")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(recorder.count(PROCESSED_TOTAL), 1);
        assert_eq!(recorder.statuses(ERRORS_TOTAL), vec!["404"]);
    }

    #[tokio::test]
    async fn test_unmatched_route_label_is_fixed() {
        let app = Router::new()
            .fallback(|ctx: RequestContext| async move { ctx.route })
            .layer(middleware::from_fn(request_scope));

        let response = app.oneshot(get_request("/anything/at/all")).await.unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], UNMATCHED_ROUTE.as_bytes());
    }
}
