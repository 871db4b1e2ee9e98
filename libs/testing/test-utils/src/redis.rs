//! Redis test infrastructure
//!
//! Provides a `TestRedis` helper that creates a Redis container for testing.

use redis::Client;
use redis::aio::ConnectionManager;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// Test Redis wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    client: Client,
    pub connection_string: String,
}

impl TestRedis {
    /// Create a new test Redis instance
    ///
    /// Uses Redis 8 Alpine image by default.
    pub async fn new() -> Self {
        let redis_image = Redis::default().with_tag("8-alpine");

        let container = redis_image
            .start()
            .await
            .expect("Failed to start Redis container");

        let host_port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        let connection_string = format!("redis://127.0.0.1:{}", host_port);

        let client =
            Client::open(connection_string.clone()).expect("Failed to create Redis client");

        tracing::info!(port = host_port, "Test Redis ready (Redis 8-alpine)");

        Self {
            _container: container,
            client,
            connection_string,
        }
    }

    /// A managed connection, the type production stores are built on
    pub async fn connection_manager(&self) -> ConnectionManager {
        ConnectionManager::new(self.client.clone())
            .await
            .expect("Failed to connect to Redis")
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Drop every key, for tests that share one container
    pub async fn flush(&self) {
        let mut conn = self.connection_manager().await;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .expect("Failed to flush Redis");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::AsyncCommands;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_redis_set_get() {
        let redis = TestRedis::new().await;
        let mut conn = redis.connection_manager().await;

        conn.set::<_, _, ()>("test_key", "test_value").await.unwrap();

        let value: String = conn.get("test_key").await.unwrap();
        assert_eq!(value, "test_value");

        redis.flush().await;
        let value: Option<String> = conn.get("test_key").await.unwrap();
        assert!(value.is_none());
    }
}
