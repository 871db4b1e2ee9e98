//! Shared test utilities for domain testing
//!
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//! - `CountingRecorder`: in-process `metrics` recorder that counts counter
//!   increments (feature: "metrics")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//!
//! # Redis Testing
//!
//! Add `features = ["redis"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["redis"] }
//! ```
//!
//! Then in your tests:
//!
//! ```rust,ignore
//! use test_utils::TestRedis;
//!
//! #[tokio::test]
//! #[ignore = "requires docker"]
//! async fn my_redis_test() {
//!     let redis = TestRedis::new().await;
//!     let store = RedisLocationStore::new(redis.connection_manager().await, "locations");
//! }
//! ```

use serde_json::{Value, json};

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "redis")]
pub use self::redis::TestRedis;

#[cfg(feature = "metrics")]
mod recorder;

#[cfg(feature = "metrics")]
pub use recorder::CountingRecorder;

/// Builder for test data with deterministic values
///
/// Seeded from the test name so reruns produce the same ids and names, while
/// different tests never collide in a shared store.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_location");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A client-chosen location id, unique to this builder and suffix
    pub fn location_id(&self, suffix: &str) -> String {
        format!("loc-{:016x}-{}", self.seed, suffix)
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("location", "main"), "test-location-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A complete create/upsert request body
    pub fn location_body(&self, suffix: &str) -> Value {
        json!({
            "name": self.name("location", suffix),
            "description": format!("Description for {}", suffix),
            "imageUrl": format!("https://images.example.com/{}/{}.png", self.seed, suffix),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.location_id("a"), builder2.location_id("a"));
        assert_eq!(builder1.location_body("a"), builder2.location_body("a"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.location_id("a"), builder2.location_id("a"));
    }

    #[test]
    fn test_location_body_has_wire_fields() {
        let body = TestDataBuilder::new(1).location_body("park");
        for field in ["name", "description", "imageUrl"] {
            assert!(body.get(field).is_some(), "missing {}", field);
        }
    }
}
