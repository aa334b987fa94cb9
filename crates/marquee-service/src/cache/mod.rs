//! Cache keys, TTL policy and the read-through helper used by every query.

pub mod cache_keys;
pub mod policy;

use marquee_cache::{CacheExt, CacheStore};
use marquee_core::MarqueeResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Runs `loader` through the cache when `ttl` is set, or directly when not.
///
/// The key is only built for cached queries.
pub(crate) async fn read_through<T, K, F, Fut>(
    cache: &dyn CacheStore,
    ttl: Option<Duration>,
    key: K,
    loader: F,
) -> MarqueeResult<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    K: FnOnce() -> String + Send,
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = MarqueeResult<T>> + Send,
{
    match ttl {
        Some(ttl) => cache.get_or_load(&key(), ttl, loader).await,
        None => loader().await,
    }
}

/// Like [`read_through`] for lookups that may find nothing.
///
/// A `None` from the loader is returned without being cached, so a record
/// created later is visible on the next call.
pub(crate) async fn read_through_found<T, K, F, Fut>(
    cache: &dyn CacheStore,
    ttl: Option<Duration>,
    key: K,
    loader: F,
) -> MarqueeResult<Option<T>>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    K: FnOnce() -> String + Send,
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = MarqueeResult<Option<T>>> + Send,
{
    let Some(ttl) = ttl else {
        return loader().await;
    };

    let key = key();
    if let Some(cached) = cache.read::<T>(&key).await {
        return Ok(Some(cached));
    }

    let found = loader().await?;
    if let Some(value) = &found {
        cache.write(&key, value, ttl).await;
    }
    Ok(found)
}
