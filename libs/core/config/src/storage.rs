use crate::{env_or_default, env_parse, env_required, ConfigError, FromEnv};
use std::time::Duration;
use strum::{Display, EnumString};

/// Which key-value backend the service persists into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    /// Process-local map, lost on restart. Useful for local runs and tests.
    Memory,
    /// Redis reachable at `REDIS_URL`
    Redis,
}

/// Key-value storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Connection string, required when `backend` is `Redis`
    pub redis_url: Option<String>,
    /// Logical table name; used as the key prefix
    pub table: String,
    /// Upper bound on a single storage call
    pub timeout: Duration,
}

impl StorageConfig {
    pub fn memory(table: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::Memory,
            redis_url: None,
            table: table.into(),
            timeout: Duration::from_millis(3000),
        }
    }
}

impl FromEnv for StorageConfig {
    /// Environment variables:
    /// - STORAGE_BACKEND: `memory` (default) or `redis`
    /// - REDIS_URL: required for the redis backend
    /// - LOCATIONS_TABLE: defaults to `locations`
    /// - STORAGE_TIMEOUT_MS: defaults to 3000
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_parse("STORAGE_BACKEND", StorageBackend::Memory)?;
        let redis_url = match backend {
            StorageBackend::Redis => Some(env_required("REDIS_URL")?),
            StorageBackend::Memory => std::env::var("REDIS_URL").ok(),
        };
        let table = env_or_default("LOCATIONS_TABLE", "locations");
        let timeout = Duration::from_millis(env_parse("STORAGE_TIMEOUT_MS", 3000u64)?);

        Ok(Self {
            backend,
            redis_url,
            table,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults_to_memory() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", None::<&str>),
                ("REDIS_URL", None::<&str>),
                ("LOCATIONS_TABLE", None::<&str>),
                ("STORAGE_TIMEOUT_MS", None::<&str>),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.backend, StorageBackend::Memory);
                assert_eq!(config.table, "locations");
                assert_eq!(config.timeout, Duration::from_millis(3000));
                assert!(config.redis_url.is_none());
            },
        );
    }

    #[test]
    fn test_storage_config_redis_requires_url() {
        temp_env::with_vars(
            [("STORAGE_BACKEND", Some("Redis")), ("REDIS_URL", None::<&str>)],
            || {
                let err = StorageConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("REDIS_URL"));
            },
        );
    }

    #[test]
    fn test_storage_config_redis_with_url() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("redis")),
                ("REDIS_URL", Some("redis://localhost:6379")),
                ("LOCATIONS_TABLE", Some("prod-locations")),
                ("STORAGE_TIMEOUT_MS", Some("500")),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.backend, StorageBackend::Redis);
                assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
                assert_eq!(config.table, "prod-locations");
                assert_eq!(config.timeout, Duration::from_millis(500));
            },
        );
    }

    #[test]
    fn test_storage_config_unknown_backend() {
        temp_env::with_var("STORAGE_BACKEND", Some("dynamo"), || {
            let err = StorageConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("STORAGE_BACKEND"));
        });
    }
}
