//! Readiness endpoint. Liveness (`/health`) comes from `axum_helpers::health_router`
//! and never touches storage.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use domain_locations::LocationStore;

use crate::state::AppState;

async fn ready<S: LocationStore + 'static>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "storage",
        Box::pin(async {
            state
                .service
                .health_check()
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    match run_health_checks(checks).await {
        Ok(ready) => ready,
        Err(not_ready) => not_ready,
    }
}

pub fn router<S: LocationStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/ready", get(ready::<S>))
        .with_state(state)
}
