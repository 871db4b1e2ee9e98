//! Server infrastructure module.
//!
//! This module provides:
//! - Router setup with OpenAPI documentation and common middleware
//! - Liveness and readiness endpoints
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.server)?
//!     .merge(health_router());
//!
//! create_production_app(router, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
