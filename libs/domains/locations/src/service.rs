//! Location Service - the resource repository over a [`LocationStore`]

use chrono::Utc;
use observability::RequestContext;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{LocationError, LocationResult};
use crate::models::{Location, LocationInput, LocationPage, page_size, validate_id};
use crate::store::LocationStore;

/// Default bound on a single storage call
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Maps list/get/create/upsert/delete onto storage calls.
///
/// Owns id generation (UUID v7) and timestamping. Holds no cache; the store is
/// the only source of truth. Every storage call is bounded by `timeout` and
/// surfaces as `StorageUnavailable` when it expires.
pub struct LocationService<S: LocationStore> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S: LocationStore> LocationService<S> {
    pub fn new(store: S, timeout: Duration) -> Self {
        Self {
            store: Arc::new(store),
            timeout,
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = LocationResult<T>>) -> LocationResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .inspect_err(|_| warn!(timeout_ms = self.timeout.as_millis() as u64, "Storage call timed out"))?
    }

    /// One page of locations in storage order. The cursor is passed through untouched.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn list_locations(
        &self,
        ctx: &RequestContext,
        cursor: Option<String>,
        limit: Option<usize>,
    ) -> LocationResult<LocationPage> {
        let limit = page_size(limit);
        self.bounded(self.store.scan(cursor, limit)).await
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn get_location(&self, ctx: &RequestContext, id: &str) -> LocationResult<Location> {
        self.bounded(self.store.get(id)).await
    }

    /// Create a location under a fresh id, stamped with the current time.
    #[instrument(skip(self, ctx, input), fields(request_id = %ctx.request_id))]
    pub async fn create_location(
        &self,
        ctx: &RequestContext,
        input: LocationInput,
    ) -> LocationResult<Location> {
        let fields = input.into_fields()?;
        let location = fields.into_location(Uuid::now_v7().to_string(), Utc::now());

        self.bounded(self.store.put(&location)).await?;

        info!(location_id = %location.id, "Location created");
        Ok(location)
    }

    /// Create or fully replace a location.
    ///
    /// Without an id this is [`create_location`](Self::create_location). With an
    /// id the mutable fields are replaced and the first-write timestamp is kept;
    /// an id seen for the first time gets the current time.
    #[instrument(skip(self, ctx, input), fields(request_id = %ctx.request_id))]
    pub async fn upsert_location(
        &self,
        ctx: &RequestContext,
        id: Option<String>,
        input: LocationInput,
    ) -> LocationResult<Location> {
        let Some(id) = id else {
            return self.create_location(ctx, input).await;
        };

        validate_id(&id)?;
        let fields = input.into_fields()?;

        let timestamp = match self.bounded(self.store.get(&id)).await {
            Ok(existing) => existing.timestamp,
            Err(LocationError::NotFound(_)) => Utc::now(),
            Err(e) => return Err(e),
        };

        let location = fields.into_location(id, timestamp);
        self.bounded(self.store.put(&location)).await?;

        info!(location_id = %location.id, "Location upserted");
        Ok(location)
    }

    /// Delete a location. Deleting an id that does not exist succeeds.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn delete_location(&self, ctx: &RequestContext, id: &str) -> LocationResult<()> {
        let existed = self.bounded(self.store.delete(id)).await?;
        if existed {
            info!(location_id = %id, "Location deleted");
        } else {
            info!(location_id = %id, "Delete of unknown location treated as success");
        }
        Ok(())
    }

    /// Readiness probe for the backing store, bounded like any other call.
    pub async fn health_check(&self) -> LocationResult<()> {
        self.bounded(self.store.health_check()).await
    }
}

impl<S: LocationStore> Clone for LocationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}
