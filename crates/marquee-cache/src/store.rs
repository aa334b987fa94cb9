//! Raw cache store interface.

use crate::CacheResult;
use async_trait::async_trait;
use marquee_core::Interface;
use std::time::Duration;

/// Storage backend for cached text values.
///
/// Operations are fallible; the typed [`crate::CacheExt`] layer on top is
/// where failures are absorbed. Values are opaque strings so the trait
/// stays dyn-compatible.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Get a raw value.
    ///
    /// Returns `None` if the key doesn't exist, has expired, or the store is
    /// disabled.
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a raw value with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Delete a value.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Delete every key matching a glob pattern.
    ///
    /// Returns the number of keys deleted.
    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64>;

    /// Check if caching is enabled.
    async fn is_enabled(&self) -> bool;
}
