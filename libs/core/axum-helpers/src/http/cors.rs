use axum::http::{HeaderName, HeaderValue, Method, header};
use std::time::Duration;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Error)]
pub enum CorsConfigError {
    #[error("CORS origin list cannot be empty")]
    Empty,

    #[error("Invalid CORS origin {origin:?}: {details}")]
    InvalidOrigin { origin: String, details: String },
}

/// Creates a CORS layer for the given origins.
///
/// Configured with:
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Accept, Authorization, requestId, x-request-id
/// - 1 hour max age
///
/// # Errors
/// Returns an error if the list is empty or an origin is not a valid header value.
pub fn create_cors_layer(origins: &[String]) -> Result<CorsLayer, CorsConfigError> {
    if origins.is_empty() {
        return Err(CorsConfigError::Empty);
    }

    let allowed = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| CorsConfigError::InvalidOrigin {
                    origin: origin.clone(),
                    details: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("requestid"),
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(Duration::from_secs(3600)))
}
