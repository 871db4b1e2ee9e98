//! Locations API - REST service over the locations domain

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::{CorsConfigError, create_router, health_router};
use domain_locations::LocationStore;

use state::AppState;

/// Assemble the full HTTP application: API routes with docs and common
/// middleware, plus the liveness probe.
pub fn build_app<S: LocationStore + 'static>(state: &AppState<S>) -> Result<Router, CorsConfigError> {
    let api_routes = api::routes(state);
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;
    Ok(router.merge(health_router()))
}
