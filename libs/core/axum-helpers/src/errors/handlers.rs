use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response};

/// Handler for 404 Not Found errors.
///
/// Used as the router fallback so unknown paths still answer with JSON.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
        ErrorCode::NotFound,
    )
}
