//! HTTP middleware module.
//!
//! - CORS configuration built from the configured origin list
//! - Security headers on every response
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{create_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_cors_layer(&config.cors_allowed_origins)?);
//! ```

pub mod cors;
pub mod security;

pub use cors::{CorsConfigError, create_cors_layer};
pub use security::security_headers;
