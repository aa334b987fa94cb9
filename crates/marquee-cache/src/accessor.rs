//! Cache-aside accessor.
//!
//! [`CacheExt`] is the typed layer every query uses. It never fails: a
//! disabled cache, a transport error or an undecodable payload all read as
//! a miss, and failed writes are dropped after being logged. Only errors
//! from the origin loader in [`CacheExt::get_or_load`] reach the caller.

use crate::codec;
use crate::metrics::CacheMetrics;
use crate::value::{from_value, to_value};
use crate::{CacheError, CacheStore};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Shortest TTL a value is stored with.
pub const MIN_TTL: Duration = Duration::from_secs(1);

/// Outcome of a cache lookup.
#[derive(Debug)]
pub enum CacheLookup<T> {
    /// The key was present and decoded.
    Hit(T),
    /// The key was absent, expired, or caching is disabled.
    Miss,
    /// The store failed or the payload could not be decoded.
    Unavailable(CacheError),
}

impl<T> CacheLookup<T> {
    /// Returns the hit value, discarding the reason for a miss.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Unavailable(_) => None,
        }
    }

    /// Returns true for a hit.
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Typed, failure-tolerant operations over any [`CacheStore`].
#[async_trait]
pub trait CacheExt: CacheStore {
    /// Looks a key up and reports exactly what happened.
    async fn lookup<T>(&self, key: &str) -> CacheLookup<T>
    where
        T: DeserializeOwned + Send,
    {
        let raw = match self.get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => return CacheLookup::Unavailable(e),
        };

        match codec::decode(&raw).and_then(from_value) {
            Ok(value) => CacheLookup::Hit(value),
            Err(e) => CacheLookup::Unavailable(e),
        }
    }

    /// Reads a cached value. Any failure is logged and reads as a miss.
    async fn read<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        if !self.is_enabled().await {
            return None;
        }

        match self.lookup(key).await {
            CacheLookup::Hit(value) => {
                debug!("Cache hit for key '{}'", key);
                CacheMetrics::hit();
                Some(value)
            }
            CacheLookup::Miss => {
                debug!("Cache miss for key '{}'", key);
                CacheMetrics::miss();
                None
            }
            CacheLookup::Unavailable(e) => {
                warn!(key, error = %e, "Cache read failed; falling back to origin");
                CacheMetrics::error("read");
                None
            }
        }
    }

    /// Writes a value with an expiry. Failures are logged and dropped.
    ///
    /// TTLs shorter than [`MIN_TTL`] are raised to it.
    async fn write<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        T: Serialize + Sync + ?Sized,
    {
        if !self.is_enabled().await {
            return;
        }

        let encoded = match to_value(value).and_then(|v| codec::encode(&v)) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode value for cache");
                CacheMetrics::error("encode");
                return;
            }
        };

        match self.set_raw(key, &encoded, ttl.max(MIN_TTL)).await {
            Ok(()) => CacheMetrics::write(),
            Err(e) => {
                warn!(key, error = %e, "Cache write failed");
                CacheMetrics::error("write");
            }
        }
    }

    /// Deletes one key. Failures are logged only.
    async fn remove(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            warn!(key, error = %e, "Cache delete failed");
            CacheMetrics::error("delete");
        }
    }

    /// Deletes every key matching a glob pattern. Failures are logged only.
    async fn invalidate_by_pattern(&self, pattern: &str) {
        match self.delete_pattern(pattern).await {
            Ok(deleted) => {
                debug!("Invalidated {} keys matching '{}'", deleted, pattern);
                CacheMetrics::invalidated(deleted);
            }
            Err(e) => {
                warn!(pattern, error = %e, "Cache invalidation failed");
                CacheMetrics::error("invalidate");
            }
        }
    }

    /// Returns the cached value for `key`, or runs `loader`, caches its
    /// result for `ttl` and returns it.
    ///
    /// Loader errors propagate unchanged and nothing is cached.
    async fn get_or_load<T, E, F, Fut>(&self, key: &str, ttl: Duration, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        E: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        if let Some(cached) = self.read::<T>(key).await {
            return Ok(cached);
        }

        let value = loader().await?;
        self.write(key, &value, ttl).await;
        Ok(value)
    }
}

impl<S: CacheStore + ?Sized> CacheExt for S {}
