//! Cache metrics.
//!
//! Counters are recorded through the `metrics` facade. Installing an
//! exporter is left to the host process.

use metrics::{counter, describe_counter};

/// Metric names for the cache layer.
pub mod names {
    /// Reads served from the cache.
    pub const CACHE_HITS_TOTAL: &str = "marquee_cache_hits_total";
    /// Reads that fell through to the origin.
    pub const CACHE_MISSES_TOTAL: &str = "marquee_cache_misses_total";
    /// Cache operations that failed and were absorbed.
    pub const CACHE_ERRORS_TOTAL: &str = "marquee_cache_errors_total";
    /// Values written to the cache.
    pub const CACHE_WRITES_TOTAL: &str = "marquee_cache_writes_total";
    /// Keys removed by pattern invalidation.
    pub const CACHE_INVALIDATED_KEYS_TOTAL: &str = "marquee_cache_invalidated_keys_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of cache misses"
    );
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of cache operations that failed, by operation"
    );
    describe_counter!(names::CACHE_WRITES_TOTAL, "Total number of values written to the cache");
    describe_counter!(
        names::CACHE_INVALIDATED_KEYS_TOTAL,
        "Total number of keys deleted by pattern invalidation"
    );
}

/// Cache metrics recorder.
#[derive(Clone, Copy)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache hit.
    pub fn hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    /// Record a cache miss.
    pub fn miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record an absorbed failure.
    pub fn error(operation: &'static str) {
        counter!(names::CACHE_ERRORS_TOTAL, "operation" => operation).increment(1);
    }

    /// Record a successful write.
    pub fn write() {
        counter!(names::CACHE_WRITES_TOTAL).increment(1);
    }

    /// Record keys removed by an invalidation.
    pub fn invalidated(keys: u64) {
        counter!(names::CACHE_INVALIDATED_KEYS_TOTAL).increment(keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_a_no_op() {
        register_metrics();
        CacheMetrics::hit();
        CacheMetrics::miss();
        CacheMetrics::error("read");
        CacheMetrics::write();
        CacheMetrics::invalidated(3);
    }

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [
            names::CACHE_HITS_TOTAL,
            names::CACHE_MISSES_TOTAL,
            names::CACHE_ERRORS_TOTAL,
            names::CACHE_WRITES_TOTAL,
            names::CACHE_INVALIDATED_KEYS_TOTAL,
        ] {
            assert!(name.starts_with("marquee_cache_"));
            assert!(name.ends_with("_total"));
        }
    }
}
