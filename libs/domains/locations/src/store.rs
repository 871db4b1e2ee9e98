use async_trait::async_trait;

use crate::error::LocationResult;
use crate::models::{Location, LocationPage};

/// Storage adapter for locations.
///
/// A narrow key-value contract; implementations decide the storage-native
/// order that `scan` pages through.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Fetch one location. Fails with `NotFound` when no item has this id.
    async fn get(&self, id: &str) -> LocationResult<Location>;

    /// Write a location, fully replacing any item with the same id.
    async fn put(&self, location: &Location) -> LocationResult<()>;

    /// Remove a location. Returns whether an item existed.
    async fn delete(&self, id: &str) -> LocationResult<bool>;

    /// Read up to `limit` items strictly after `cursor`.
    ///
    /// `next_cursor` is set only when more items follow, and is only valid for a
    /// subsequent call with the same `limit`.
    async fn scan(&self, cursor: Option<String>, limit: usize) -> LocationResult<LocationPage>;

    /// Probe the backend for readiness checks.
    async fn health_check(&self) -> LocationResult<()> {
        Ok(())
    }
}
