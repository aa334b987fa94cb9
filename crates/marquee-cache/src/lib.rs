//! # Marquee Cache
//!
//! Read-through caching in front of the origin database.
//!
//! - [`CacheClient`] owns the lazily created Redis pool, or decides that
//!   caching is disabled.
//! - [`codec`] and [`value`] turn query results into JSON text and back
//!   without losing timestamps.
//! - [`CacheStore`] is the raw store interface with Redis and in-memory
//!   implementations.
//! - [`CacheExt`] is the failure-tolerant, typed accessor used by queries.

mod accessor;
mod client;
pub mod codec;
mod error;
mod memory;
pub mod metrics;
mod redis_store;
mod store;
pub mod value;

pub use accessor::{CacheExt, CacheLookup, MIN_TTL};
pub use client::{
    resolve_endpoint, CacheClient, Endpoint, EndpointSource, REDIS_PRIVATE_URL_VAR, REDIS_URL_VAR,
};
pub use error::{CacheError, CacheResult};
pub use marquee_config::{CacheConfig, ExecutionContext};
pub use memory::{glob_match, MemoryCacheStore};
pub use redis_store::RedisCacheStore;
pub use store::CacheStore;
pub use value::{from_value, to_value, CacheValue};
