//! Locations API - REST server

use axum_helpers::server::create_production_app;
use core_config::storage::StorageBackend;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_locations::{InMemoryLocationStore, LocationService, LocationStore, RedisLocationStore};
use eyre::{WrapErr, eyre};
use locations_api::{build_app, config::Config, state::AppState};
use observability::init_metrics;
use std::time::Duration;
use tracing::info;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment, &config.app);

    init_metrics().wrap_err("Failed to install Prometheus recorder")?;

    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory location store");
            run(config, InMemoryLocationStore::new()).await
        }
        StorageBackend::Redis => {
            let url = config
                .storage
                .redis_url
                .clone()
                .ok_or_else(|| eyre!("REDIS_URL is required for the redis backend"))?;
            let store = RedisLocationStore::connect(&url, config.storage.table.clone())
                .await
                .wrap_err("Failed to connect to Redis")?;
            run(config, store).await
        }
    }
}

async fn run<S: LocationStore + 'static>(config: Config, store: S) -> eyre::Result<()> {
    let service = LocationService::new(store, config.storage.timeout);
    let state = AppState::new(config, service);

    let app = build_app(&state)?;

    info!(
        "Starting Locations API on port {} (storage table: {})",
        state.config.server.port, state.config.storage.table
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, SHUTDOWN_TIMEOUT, async move {
        info!("Shutting down: releasing storage client");
        drop(state);
    })
    .await
    .map_err(|e| eyre!("Server error: {}", e))?;

    info!("Locations API shutdown complete");
    Ok(())
}
