//! Configuration for Locations API

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig, storage::StorageConfig};

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }

    /// In-memory storage on defaults; used by tests and local runs.
    pub fn local() -> Self {
        Self {
            app: app_info!(),
            environment: Environment::Development,
            server: ServerConfig::default(),
            storage: StorageConfig::memory("locations"),
        }
    }
}
