use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Location not found: {0}")]
    NotFound(String),

    /// Backend unreachable, failing or too slow. The only retryable kind.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

pub type LocationResult<T> = Result<T, LocationError>;

/// Convert LocationError to AppError for standardized error responses
impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Validation(msg) => AppError::BadRequest(msg),
            LocationError::NotFound(id) => AppError::NotFound(format!("Location {} not found", id)),
            LocationError::StorageUnavailable(msg) => AppError::StorageUnavailable(msg),
            LocationError::Unknown(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for LocationError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<redis::RedisError> for LocationError {
    fn from(err: redis::RedisError) -> Self {
        LocationError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for LocationError {
    fn from(err: serde_json::Error) -> Self {
        LocationError::Unknown(format!("Stored location is not valid JSON: {}", err))
    }
}

impl From<tokio::time::error::Elapsed> for LocationError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        LocationError::StorageUnavailable("storage call timed out".to_string())
    }
}
