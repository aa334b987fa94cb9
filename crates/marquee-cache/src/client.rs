//! Cache client lifecycle.
//!
//! A [`CacheClient`] owns at most one Redis connection pool for its whole
//! lifetime. The pool is created on first use and memoized, including the
//! decision to run without a cache when no endpoint is configured.

use deadpool_redis::{Config, Pool, Runtime};
use marquee_config::{CacheConfig, ExecutionContext};
use std::fmt;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

/// Primary environment variable holding the cache endpoint.
pub const REDIS_URL_VAR: &str = "REDIS_URL";

/// Fallback environment variable holding the cache endpoint.
pub const REDIS_PRIVATE_URL_VAR: &str = "REDIS_PRIVATE_URL";

/// Upper bound for opening a connection or waiting for a free one.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a cache endpoint was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    /// `cache.url` in the application configuration.
    Config,
    /// The `REDIS_URL` environment variable.
    RedisUrl,
    /// The `REDIS_PRIVATE_URL` environment variable.
    RedisPrivateUrl,
}

impl fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "cache.url"),
            Self::RedisUrl => write!(f, "{REDIS_URL_VAR}"),
            Self::RedisPrivateUrl => write!(f, "{REDIS_PRIVATE_URL_VAR}"),
        }
    }
}

/// A resolved cache endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub source: EndpointSource,
}

impl fmt::Debug for Endpoint {
    // The URL may carry credentials.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Resolves the cache endpoint.
///
/// The configured URL wins, then `REDIS_URL`, then `REDIS_PRIVATE_URL`.
/// Empty values count as unset.
pub fn resolve_endpoint<F>(configured: Option<&str>, env: F) -> Option<Endpoint>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(configured.map(str::to_owned)) {
        return Some(Endpoint {
            url,
            source: EndpointSource::Config,
        });
    }
    if let Some(url) = non_empty(env(REDIS_URL_VAR)) {
        return Some(Endpoint {
            url,
            source: EndpointSource::RedisUrl,
        });
    }
    non_empty(env(REDIS_PRIVATE_URL_VAR)).map(|url| Endpoint {
        url,
        source: EndpointSource::RedisPrivateUrl,
    })
}

/// Lazily connected, memoized handle to the cache service.
///
/// `acquire` returns `None` when caching is disabled. Disabled is a normal
/// operating mode: it happens when no endpoint is configured, when the pool
/// cannot be built, and always in an ephemeral execution context.
pub struct CacheClient {
    config: CacheConfig,
    pool: OnceCell<Option<Pool>>,
    #[cfg(test)]
    connects: std::sync::atomic::AtomicUsize,
}

impl CacheClient {
    /// Creates a client. Nothing is resolved or connected until the first
    /// call to [`CacheClient::acquire`].
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
            #[cfg(test)]
            connects: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Creates a client that never connects.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            config: CacheConfig::default(),
            pool: OnceCell::new_with(Some(None)),
            #[cfg(test)]
            connects: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Returns the execution context the client was built for.
    #[must_use]
    pub fn context(&self) -> ExecutionContext {
        self.config.context
    }

    /// Returns true once the first `acquire` has settled.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Returns the connection pool, or `None` when caching is disabled.
    ///
    /// The first call resolves the endpoint and builds the pool; concurrent
    /// first callers wait on the same initialisation. Every later call
    /// returns the memoized outcome.
    pub async fn acquire(&self) -> Option<Pool> {
        if self.config.context == ExecutionContext::Ephemeral {
            return None;
        }

        self.pool.get_or_init(|| self.connect()).await.clone()
    }

    async fn connect(&self) -> Option<Pool> {
        #[cfg(test)]
        self.connects.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let endpoint = resolve_endpoint(self.config.url.as_deref(), |name| {
            std::env::var(name).ok()
        });

        let Some(endpoint) = endpoint else {
            warn!(
                "No cache endpoint configured (cache.url, {}, {}); caching disabled",
                REDIS_URL_VAR, REDIS_PRIVATE_URL_VAR
            );
            return None;
        };

        debug!(source = %endpoint.source, "Creating Redis connection pool");

        let pool = match build_pool(&endpoint.url, self.config.pool_size) {
            Ok(pool) => pool,
            Err(message) => {
                error!(source = %endpoint.source, "{}; caching disabled", message);
                return None;
            }
        };

        // A failed ping keeps the pool: connections are retried per
        // operation and failures there degrade to cache misses.
        match ping(&pool).await {
            Ok(()) => info!(source = %endpoint.source, "Connected to Redis"),
            Err(e) => error!(source = %endpoint.source, error = %e, "Redis connection error"),
        }

        Some(pool)
    }
}

impl Default for CacheClient {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheClient")
            .field("context", &self.config.context)
            .field("initialized", &self.pool.initialized())
            .field(
                "enabled",
                &self.pool.get().map(Option::is_some),
            )
            .finish()
    }
}

fn build_pool(url: &str, pool_size: u32) -> Result<Pool, String> {
    let max_size = usize::try_from(pool_size).unwrap_or(usize::MAX).max(1);

    Config::from_url(url)
        .builder()
        .map_err(|e| format!("Invalid Redis config: {}", e))?
        .max_size(max_size)
        .runtime(Runtime::Tokio1)
        .create_timeout(Some(CONNECT_TIMEOUT))
        .wait_timeout(Some(CONNECT_TIMEOUT))
        .build()
        .map_err(|e| format!("Failed to create Redis pool: {}", e))
}

async fn ping(pool: &Pool) -> crate::CacheResult<()> {
    let mut conn = pool.get().await?;
    redis::cmd("PING").query_async::<String>(&mut *conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_configured_url_wins() {
        let endpoint = resolve_endpoint(
            Some("redis://configured:6379"),
            env_of(&[(REDIS_URL_VAR, "redis://env:6379")]),
        )
        .unwrap();
        assert_eq!(endpoint.url, "redis://configured:6379");
        assert_eq!(endpoint.source, EndpointSource::Config);
    }

    #[test]
    fn test_falls_back_to_private_url() {
        let endpoint = resolve_endpoint(
            None,
            env_of(&[(REDIS_PRIVATE_URL_VAR, "redis://private:6379")]),
        )
        .unwrap();
        assert_eq!(endpoint.source, EndpointSource::RedisPrivateUrl);
        assert_eq!(endpoint.url, "redis://private:6379");
    }

    #[test]
    fn test_primary_env_wins_over_private() {
        let endpoint = resolve_endpoint(
            None,
            env_of(&[
                (REDIS_URL_VAR, "redis://public:6379"),
                (REDIS_PRIVATE_URL_VAR, "redis://private:6379"),
            ]),
        )
        .unwrap();
        assert_eq!(endpoint.source, EndpointSource::RedisUrl);
    }

    #[test]
    fn test_empty_values_are_unset() {
        assert!(resolve_endpoint(Some(""), env_of(&[(REDIS_URL_VAR, "  ")])).is_none());
    }

    #[test]
    fn test_endpoint_debug_hides_url() {
        let endpoint = Endpoint {
            url: "redis://:secret@cache:6379".into(),
            source: EndpointSource::Config,
        };
        assert!(!format!("{endpoint:?}").contains("secret"));
    }

    #[tokio::test]
    async fn test_disabled_client_never_connects() {
        let client = CacheClient::disabled();
        assert!(client.is_initialized());
        assert!(client.acquire().await.is_none());
    }

    #[tokio::test]
    async fn test_ephemeral_context_short_circuits() {
        let client = CacheClient::new(CacheConfig {
            url: Some("redis://127.0.0.1:6379".into()),
            context: ExecutionContext::Ephemeral,
            ..CacheConfig::default()
        });

        assert!(client.acquire().await.is_none());
        assert!(!client.is_initialized());
    }

    #[tokio::test]
    async fn test_malformed_url_is_memoized_as_disabled() {
        let client = CacheClient::new(CacheConfig {
            url: Some("not-a-redis-url".into()),
            ..CacheConfig::default()
        });

        assert!(client.acquire().await.is_none());
        assert!(client.is_initialized());
        assert!(client.acquire().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_callers_share_one_initialisation() {
        let client = Arc::new(CacheClient::new(CacheConfig {
            url: Some("not-a-redis-url".into()),
            ..CacheConfig::default()
        }));

        let mut callers = JoinSet::new();
        for _ in 0..16 {
            let client = client.clone();
            callers.spawn(async move { client.acquire().await.is_none() });
        }

        while let Some(disabled) = callers.join_next().await {
            assert!(disabled.unwrap());
        }
        assert!(client.is_initialized());
        assert_eq!(client.connects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_is_disabled() {
        let client = CacheClient::default();
        assert_eq!(client.context(), ExecutionContext::LongLived);
        assert!(client.is_initialized());
    }
}
