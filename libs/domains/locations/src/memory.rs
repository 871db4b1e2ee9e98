//! In-process store backed by an ordered map.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::{LocationError, LocationResult};
use crate::models::{Location, LocationPage};
use crate::store::LocationStore;

/// Locations kept in a `BTreeMap`; scan order is id order and the cursor is the
/// last id of the previous page.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocationStore {
    items: Arc<RwLock<BTreeMap<String, Location>>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> LocationResult<Location> {
        self.items
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| LocationError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, location), fields(location_id = %location.id))]
    async fn put(&self, location: &Location) -> LocationResult<()> {
        self.items
            .write()
            .await
            .insert(location.id.clone(), location.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> LocationResult<bool> {
        Ok(self.items.write().await.remove(id).is_some())
    }

    #[instrument(skip(self))]
    async fn scan(&self, cursor: Option<String>, limit: usize) -> LocationResult<LocationPage> {
        let items = self.items.read().await;
        let lower = match cursor {
            Some(cursor) => Bound::Excluded(cursor),
            None => Bound::Unbounded,
        };

        let mut page: Vec<Location> = items
            .range((lower, Bound::Unbounded))
            .map(|(_, location)| location.clone())
            .take(limit.saturating_add(1))
            .collect();

        let has_more = page.len() > limit;
        page.truncate(limit);
        let next_cursor = if has_more {
            page.last().map(|location| location.id.clone())
        } else {
            None
        };

        Ok(LocationPage {
            items: page,
            next_cursor,
        })
    }
}
