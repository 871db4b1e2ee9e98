//! Application state management

use domain_locations::{LocationService, LocationStore};

use crate::config::Config;

/// Shared application state
pub struct AppState<S: LocationStore> {
    pub config: Config,
    pub service: LocationService<S>,
}

impl<S: LocationStore> AppState<S> {
    pub fn new(config: Config, service: LocationService<S>) -> Self {
        Self { config, service }
    }
}

impl<S: LocationStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            service: self.service.clone(),
        }
    }
}
