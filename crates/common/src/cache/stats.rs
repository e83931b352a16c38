//! Cache statistics tracking
//!
//! Atomic hit/miss counters kept alongside the cache. Cheap enough to stay
//! always-on; tests and debug logging read snapshots through
//! [`super::ResponseCache::stats`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time statistics for a response cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,

    /// Total number of fresh get operations
    pub hits: u64,

    /// Total number of failed get operations (key absent or expired)
    pub misses: u64,

    /// Total number of set operations
    pub inserts: u64,

    /// Total number of entries dropped by expiry
    pub expirations: u64,

    /// Total number of entries dropped by invalidation
    pub invalidations: u64,
}

impl CacheStats {
    /// Hit rate over all accesses, 0.0 when no accesses happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of access operations (hits + misses).
    pub fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Thread-safe metrics collector shared by cache clones.
#[derive(Debug)]
pub(crate) struct MetricsCollector {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    inserts: Arc<AtomicU64>,
    expirations: Arc<AtomicU64>,
    invalidations: Arc<AtomicU64>,
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
            inserts: Arc::clone(&self.inserts),
            expirations: Arc::clone(&self.expirations),
            invalidations: Arc::clone(&self.invalidations),
        }
    }
}

impl MetricsCollector {
    pub(crate) fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            inserts: Arc::new(AtomicU64::new(0)),
            expirations: Arc::new(AtomicU64::new(0)),
            invalidations: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invalidations(&self, count: u64) {
        self.invalidations.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, size: usize) -> CacheStats {
        CacheStats {
            size,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::stats.
    use super::*;

    /// Validates `CacheStats::hit_rate` behavior for the empty stats scenario.
    ///
    /// Assertions:
    /// - Confirms `stats.hit_rate()` equals `0.0`.
    #[test]
    fn test_hit_rate_no_accesses() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    /// Validates `MetricsCollector::snapshot` behavior for the counter
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms counters accumulate across a collector clone.
    #[test]
    fn test_collector_clone_shares_counters() {
        let collector = MetricsCollector::new();
        let clone = collector.clone();

        collector.record_hit();
        clone.record_hit();
        clone.record_miss();
        collector.record_invalidations(3);

        let stats = collector.snapshot(5);
        assert_eq!(stats.size, 5);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.invalidations, 3);
        assert_eq!(stats.total_accesses(), 3);
    }
}
