//! Redis-backed store.
//!
//! Key layout, with `{table}` from `LOCATIONS_TABLE`:
//! - `{table}:item:{id}`: the location as a JSON string
//! - `{table}:index`: sorted set of every id, all scores 0, so members sort
//!   lexicographically and `ZRANGEBYLEX` pages through them
//!
//! `put` and `delete` update item and index in one `MULTI/EXEC` block.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info, instrument, warn};

use crate::error::{LocationError, LocationResult};
use crate::models::{Location, LocationPage};
use crate::store::LocationStore;

#[derive(Clone)]
pub struct RedisLocationStore {
    conn: ConnectionManager,
    table: String,
}

impl RedisLocationStore {
    pub fn new(conn: ConnectionManager, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
        }
    }

    /// Open a managed connection and verify it with `PING`.
    ///
    /// The `ConnectionManager` reconnects on its own after transient failures.
    pub async fn connect(url: &str, table: impl Into<String>) -> LocationResult<Self> {
        info!("Connecting to Redis location store");

        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        let store = Self::new(manager, table);
        store.health_check().await?;

        info!(table = %store.table, "Redis location store ready");
        Ok(store)
    }

    fn item_key(&self, id: &str) -> String {
        format!("{}:item:{}", self.table, id)
    }

    fn index_key(&self) -> String {
        format!("{}:index", self.table)
    }
}

#[async_trait]
impl LocationStore for RedisLocationStore {
    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> LocationResult<Location> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.item_key(id)).await?;

        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(LocationError::NotFound(id.to_string())),
        }
    }

    #[instrument(skip(self, location), fields(location_id = %location.id))]
    async fn put(&self, location: &Location) -> LocationResult<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(location)?;

        redis::pipe()
            .atomic()
            .set(self.item_key(&location.id), json)
            .ignore()
            .zadd(self.index_key(), &location.id, 0)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> LocationResult<bool> {
        let mut conn = self.conn.clone();

        let (removed,): (i64,) = redis::pipe()
            .atomic()
            .del(self.item_key(id))
            .zrem(self.index_key(), id)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(removed > 0)
    }

    #[instrument(skip(self))]
    async fn scan(&self, cursor: Option<String>, limit: usize) -> LocationResult<LocationPage> {
        let mut conn = self.conn.clone();

        let min = match &cursor {
            Some(cursor) => format!("({}", cursor),
            None => "-".to_string(),
        };
        let fetch = isize::try_from(limit.saturating_add(1)).unwrap_or(isize::MAX);

        let mut ids: Vec<String> = conn
            .zrangebylex_limit(self.index_key(), min, "+", 0, fetch)
            .await?;

        let has_more = ids.len() > limit;
        ids.truncate(limit);
        if ids.is_empty() {
            return Ok(LocationPage::default());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.item_key(id)).collect();
        let raws: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let mut items = Vec::with_capacity(raws.len());
        for (id, raw) in ids.iter().zip(raws) {
            match raw {
                Some(json) => items.push(serde_json::from_str::<Location>(&json)?),
                // Deleted between the index read and MGET.
                None => debug!(location_id = %id, "Indexed location vanished during scan"),
            }
        }

        let next_cursor = if has_more { ids.last().cloned() } else { None };

        Ok(LocationPage { items, next_cursor })
    }

    async fn health_check(&self) -> LocationResult<()> {
        let mut conn = self.conn.clone();
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .inspect_err(|e| warn!("Redis health check failed: {}", e))?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(LocationError::StorageUnavailable(format!(
                "unexpected PING response: {}",
                response
            )))
        }
    }
}
