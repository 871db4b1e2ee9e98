//! Locations Domain
//!
//! CRUD for the Location resource with cursor pagination and idempotent upsert.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, input validation, error → status mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← id generation, timestamps, cursor pass-through, timeouts
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Store    │  ← get/put/delete/scan (trait + in-memory and Redis adapters)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Location, input DTO, page
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_locations::{handlers, InMemoryLocationStore, LocationService};
//! use std::time::Duration;
//!
//! let service = LocationService::new(InMemoryLocationStore::new(), Duration::from_secs(3));
//! let router = axum::Router::new().nest("/locations", handlers::router(service));
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod redis;
pub mod service;
pub mod store;

pub use error::{LocationError, LocationResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryLocationStore;
pub use models::{ListQuery, Location, LocationInput, LocationPage};
pub use self::redis::RedisLocationStore;
pub use service::{DEFAULT_STORAGE_TIMEOUT, LocationService};
pub use store::LocationStore;
