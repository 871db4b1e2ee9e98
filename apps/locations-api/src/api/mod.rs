//! API routes module

pub mod health;
pub mod locations;

use axum::{Router, routing::get};
use domain_locations::LocationStore;
use observability::metrics_handler;

use crate::state::AppState;

/// Create all API routes
pub fn routes<S: LocationStore + 'static>(state: &AppState<S>) -> Router {
    Router::new()
        .nest("/locations", locations::router(state))
        .merge(health::router(state.clone()))
        .route("/metrics", get(metrics_handler))
}
