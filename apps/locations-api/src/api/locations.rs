//! Locations API routes

use axum::{Router, middleware};
use axum_helpers::errors::handlers::not_found;
use domain_locations::{LocationStore, handlers};
use observability::request_scope;

use crate::state::AppState;

/// Create locations router; every request under `/locations`, including paths
/// no route matches, runs inside a request scope.
pub fn router<S: LocationStore + 'static>(state: &AppState<S>) -> Router {
    handlers::router(state.service.clone())
        .fallback(not_found)
        .layer(middleware::from_fn(request_scope))
}
