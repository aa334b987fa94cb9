//! Cache error types.

use marquee_core::MarqueeError;
use std::fmt::Display;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors raised by cache stores and the value codec.
///
/// None of these reach callers of the query layer: the accessor logs them
/// and degrades to a cache miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Redis pool error.
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// Redis transport or command error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A value could not be converted to or from its cached form.
    #[error("Codec error: {0}")]
    Codec(String),

    /// The cached text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CacheError {
    /// Creates a codec error.
    pub fn codec<T: Into<String>>(message: T) -> Self {
        Self::Codec(message.into())
    }

    /// Returns true if the error came from the cache service rather than
    /// from the cached data.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Pool(_) | Self::Redis(_))
    }
}

impl serde::ser::Error for CacheError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Codec(msg.to_string())
    }
}

impl serde::de::Error for CacheError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Codec(msg.to_string())
    }
}

impl From<CacheError> for MarqueeError {
    fn from(err: CacheError) -> Self {
        MarqueeError::Cache(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_is_not_transport() {
        let err = CacheError::codec("bad shape");
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "Codec error: bad shape");
    }

    #[test]
    fn test_into_marquee_error() {
        let err: MarqueeError = CacheError::codec("bad shape").into();
        assert!(matches!(err, MarqueeError::Cache(_)));
        assert!(err.is_retriable());
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CacheError::from(json_err);
        assert!(matches!(err, CacheError::Json(_)));
    }
}
