//! Redis-backed cache store.

use crate::{CacheClient, CacheResult, CacheStore};
use async_trait::async_trait;
use deadpool_redis::Connection;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache store on top of a [`CacheClient`].
///
/// When the client is disabled every read misses and every write or delete
/// is a no-op.
#[derive(Debug, Clone)]
pub struct RedisCacheStore {
    client: Arc<CacheClient>,
}

impl RedisCacheStore {
    /// Creates a store using the given client.
    #[must_use]
    pub fn new(client: Arc<CacheClient>) -> Self {
        Self { client }
    }

    /// Creates a store that never connects.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(CacheClient::disabled()))
    }

    /// Returns the underlying client.
    #[must_use]
    pub fn client(&self) -> &Arc<CacheClient> {
        &self.client
    }

    /// Gets a pooled connection, or `None` when caching is disabled.
    async fn connection(&self) -> CacheResult<Option<Connection>> {
        match self.client.acquire().await {
            Some(pool) => Ok(Some(pool.get().await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let Some(mut conn) = self.connection().await? else {
            return Ok(None);
        };

        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let Some(mut conn) = self.connection().await? else {
            return Ok(());
        };

        let ttl_secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let Some(mut conn) = self.connection().await? else {
            return Ok(false);
        };

        let deleted: i64 = conn.del(key).await?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let Some(mut conn) = self.connection().await? else {
            return Ok(0);
        };

        // KEYS walks the whole keyspace; acceptable for the key counts a
        // content site produces.
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut *conn)
            .await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: i64 = conn.del(&keys).await?;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(u64::try_from(deleted).unwrap_or(0))
    }

    async fn is_enabled(&self) -> bool {
        self.client.acquire().await.is_some()
    }
}
