//! Core response cache implementation
//!
//! A thread-safe map from cache key to a parsed JSON response plus the
//! instant it was stored. Freshness is decided at read time against the
//! caller's max-age, so one cache serves entries with different TTL classes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;

use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Entry stored in the cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<Value>,
    stored_at: Instant,
}

/// Thread-safe TTL cache for parsed JSON responses.
///
/// Values are `Arc<Value>` so a hit hands out a cheap clone of the pointer,
/// never a deep copy of the body. Entries do not carry their own TTL; each
/// `get` supplies the max-age the caller will accept, and anything at or past
/// that age is evicted and reported as a miss.
///
/// # Type Parameters
/// - `C`: Clock used for freshness math (defaults to [`SystemClock`];
///   tests substitute [`crate::time::MockClock`])
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use fleetline_common::cache::ResponseCache;
///
/// let cache = ResponseCache::new();
/// cache.set("GET:/api/v1/schools", Arc::new(serde_json::json!({"ok": true})));
/// let hit = cache.get("GET:/api/v1/schools", Duration::from_secs(300));
/// assert!(hit.is_some());
/// ```
pub struct ResponseCache<C = SystemClock>
where
    C: Clock,
{
    storage: Arc<RwLock<HashMap<String, CacheEntry>>>,
    metrics: MetricsCollector,
    clock: C,
}

impl ResponseCache<SystemClock> {
    /// Create a cache backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ResponseCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ResponseCache<C>
where
    C: Clock + Clone,
{
    /// Create a cache with a custom clock (useful for testing).
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            metrics: MetricsCollector::new(),
            clock,
        }
    }

    /// Look up a key, accepting entries younger than `max_age`.
    ///
    /// Returns `None` for missing keys and for entries at or past the
    /// max-age boundary; expired entries are removed as a side effect so
    /// stale data cannot be resurrected by a later, more lenient read.
    pub fn get(&self, key: &str, max_age: Duration) -> Option<Arc<Value>> {
        let mut storage = self.storage.write();

        let Some(entry) = storage.get(key) else {
            self.metrics.record_miss();
            return None;
        };

        let age = self.clock.now().duration_since(entry.stored_at);
        if age >= max_age {
            storage.remove(key);
            self.metrics.record_miss();
            self.metrics.record_expiration();
            return None;
        }

        self.metrics.record_hit();
        Some(Arc::clone(&entry.value))
    }

    /// Store a value under a key, overwriting any prior entry and resetting
    /// its age.
    pub fn set(&self, key: impl Into<String>, value: Arc<Value>) {
        let entry = CacheEntry { value, stored_at: self.clock.now() };
        let mut storage = self.storage.write();
        storage.insert(key.into(), entry);
        self.metrics.record_insert();
    }

    /// Drop entries matching a pattern.
    ///
    /// `Some(pattern)` removes every key containing the substring, which is
    /// how mutations flush related read keys without knowing their params.
    /// `None` clears the whole cache. Returns the number of entries removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut storage = self.storage.write();
        let before = storage.len();
        match pattern {
            Some(pattern) => storage.retain(|key, _| !key.contains(pattern)),
            None => storage.clear(),
        }
        let removed = before - storage.len();
        self.metrics.record_invalidations(removed as u64);
        removed
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.invalidate(None);
    }

    /// Current number of entries, fresh or not.
    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry older than `max_age`. Returns the number removed.
    pub fn cleanup_expired(&self, max_age: Duration) -> usize {
        let now = self.clock.now();
        let mut storage = self.storage.write();
        let before = storage.len();
        storage.retain(|_, entry| now.duration_since(entry.stored_at) < max_age);
        let removed = before - storage.len();
        for _ in 0..removed {
            self.metrics.record_expiration();
        }
        removed
    }

    /// Snapshot of hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }
}

impl<C> Clone for ResponseCache<C>
where
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::core.
    use serde_json::json;

    use super::*;
    use crate::time::MockClock;

    fn body(tag: &str) -> Arc<Value> {
        Arc::new(json!({ "tag": tag }))
    }

    /// Validates `ResponseCache::new` behavior for the empty cache scenario.
    ///
    /// Assertions:
    /// - Confirms `cache.len()` equals `0`.
    /// - Ensures `cache.is_empty()` evaluates to true.
    #[test]
    fn test_cache_starts_empty() {
        let cache = ResponseCache::new();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    /// Validates `ResponseCache::new` behavior for the set and get scenario.
    ///
    /// Assertions:
    /// - Confirms the stored value comes back for a fresh read.
    /// - Confirms an unknown key reports a miss.
    #[test]
    fn test_cache_set_and_get() {
        let cache = ResponseCache::new();
        cache.set("GET:/drivers", body("drivers"));

        let hit = cache.get("GET:/drivers", Duration::from_secs(60));
        assert_eq!(hit.unwrap()["tag"], "drivers");
        assert!(cache.get("GET:/routes", Duration::from_secs(60)).is_none());
    }

    /// Validates `ResponseCache::with_clock` behavior for the TTL expiry
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms a read within max-age hits.
    /// - Confirms a read past max-age misses and evicts the entry.
    #[test]
    fn test_cache_expires_at_max_age() {
        let clock = MockClock::new();
        let cache = ResponseCache::with_clock(clock.clone());
        cache.set("GET:/trips", body("trips"));

        clock.advance(Duration::from_secs(59));
        assert!(cache.get("GET:/trips", Duration::from_secs(60)).is_some());

        clock.advance(Duration::from_secs(2));
        assert!(cache.get("GET:/trips", Duration::from_secs(60)).is_none());
        assert_eq!(cache.len(), 0, "expired entry is evicted on read");
    }

    /// Validates `ResponseCache::with_clock` behavior at the exact max-age
    /// boundary scenario.
    ///
    /// Assertions:
    /// - Confirms an entry at exactly max-age is treated as a miss.
    #[test]
    fn test_cache_boundary_is_a_miss() {
        let clock = MockClock::new();
        let cache = ResponseCache::with_clock(clock.clone());
        cache.set("GET:/trips", body("trips"));

        clock.advance(Duration::from_secs(60));
        assert!(cache.get("GET:/trips", Duration::from_secs(60)).is_none());
    }

    /// Validates `ResponseCache::with_clock` behavior for the per-read
    /// max-age scenario.
    ///
    /// Assertions:
    /// - Confirms one entry can hit for a lenient reader and miss for a
    ///   strict one.
    #[test]
    fn test_cache_max_age_is_per_read() {
        let clock = MockClock::new();
        let cache = ResponseCache::with_clock(clock.clone());
        cache.set("GET:/settings", body("settings"));

        clock.advance(Duration::from_secs(120));
        assert!(cache.get("GET:/settings", Duration::from_secs(900)).is_some());
        // The strict read evicts; entry is gone for everyone afterwards.
        assert!(cache.get("GET:/settings", Duration::from_secs(60)).is_none());
        assert!(cache.get("GET:/settings", Duration::from_secs(900)).is_none());
    }

    /// Validates `ResponseCache::new` behavior for the overwrite scenario.
    ///
    /// Assertions:
    /// - Confirms a second `set` replaces the value.
    /// - Confirms `cache.len()` equals `1`.
    #[test]
    fn test_cache_set_overwrites() {
        let cache = ResponseCache::new();
        cache.set("GET:/drivers", body("v1"));
        cache.set("GET:/drivers", body("v2"));

        let hit = cache.get("GET:/drivers", Duration::from_secs(60)).unwrap();
        assert_eq!(hit["tag"], "v2");
        assert_eq!(cache.len(), 1);
    }

    /// Validates overwrite resets the entry's age.
    ///
    /// Assertions:
    /// - Confirms a re-set entry is fresh again after the original would
    ///   have expired.
    #[test]
    fn test_cache_overwrite_resets_age() {
        let clock = MockClock::new();
        let cache = ResponseCache::with_clock(clock.clone());
        cache.set("GET:/drivers", body("v1"));

        clock.advance(Duration::from_secs(50));
        cache.set("GET:/drivers", body("v2"));

        clock.advance(Duration::from_secs(30));
        // 80s after v1, but only 30s after v2.
        assert!(cache.get("GET:/drivers", Duration::from_secs(60)).is_some());
    }

    /// Validates `ResponseCache::invalidate` behavior for the substring
    /// pattern scenario.
    ///
    /// Assertions:
    /// - Confirms keys containing the pattern are removed.
    /// - Confirms unrelated keys survive.
    #[test]
    fn test_cache_invalidate_by_pattern() {
        let cache = ResponseCache::new();
        cache.set("GET:/api/v1/drivers", body("list"));
        cache.set("GET:/api/v1/drivers/42", body("one"));
        cache.set("GET:/api/v1/routes", body("routes"));

        let removed = cache.invalidate(Some("/drivers"));
        assert_eq!(removed, 2);
        assert!(cache.get("GET:/api/v1/drivers", Duration::from_secs(60)).is_none());
        assert!(cache.get("GET:/api/v1/routes", Duration::from_secs(60)).is_some());
    }

    /// Validates `ResponseCache::invalidate` behavior for the clear-all
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `invalidate(None)` empties the cache.
    #[test]
    fn test_cache_invalidate_all() {
        let cache = ResponseCache::new();
        cache.set("GET:/a", body("a"));
        cache.set("GET:/b", body("b"));

        let removed = cache.invalidate(None);
        assert_eq!(removed, 2);
        assert!(cache.is_empty());
    }

    /// Validates `ResponseCache::cleanup_expired` behavior for the sweep
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms only entries older than the sweep age are removed.
    #[test]
    fn test_cache_cleanup_expired() {
        let clock = MockClock::new();
        let cache = ResponseCache::with_clock(clock.clone());
        cache.set("GET:/old", body("old"));

        clock.advance(Duration::from_secs(120));
        cache.set("GET:/new", body("new"));

        let removed = cache.cleanup_expired(Duration::from_secs(60));
        assert_eq!(removed, 1);
        assert!(cache.get("GET:/new", Duration::from_secs(60)).is_some());
    }

    /// Validates `ResponseCache::clone` behavior for the shared storage
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms entries written through one handle are visible through
    ///   the other.
    #[test]
    fn test_cache_clone_shares_storage() {
        let cache1 = ResponseCache::new();
        cache1.set("GET:/a", body("a"));

        let cache2 = cache1.clone();
        assert!(cache2.get("GET:/a", Duration::from_secs(60)).is_some());

        cache2.set("GET:/b", body("b"));
        assert!(cache1.get("GET:/b", Duration::from_secs(60)).is_some());
    }

    /// Validates `ResponseCache::stats` behavior for the counter scenario.
    ///
    /// Assertions:
    /// - Confirms hits, misses, and inserts are tracked.
    #[test]
    fn test_cache_stats_tracking() {
        let cache = ResponseCache::new();
        cache.set("GET:/a", body("a"));

        let _ = cache.get("GET:/a", Duration::from_secs(60)); // Hit
        let _ = cache.get("GET:/a", Duration::from_secs(60)); // Hit
        let _ = cache.get("GET:/missing", Duration::from_secs(60)); // Miss

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.hit_rate(), 2.0 / 3.0);
    }

    /// Validates `Arc::new` behavior for the concurrent writers scenario.
    ///
    /// Assertions:
    /// - Confirms `cache.len()` equals `100` after 10 threads write 10 keys.
    #[test]
    fn test_cache_thread_safety() {
        use std::thread;

        let cache = Arc::new(ResponseCache::new());
        let mut handles = vec![];

        for i in 0..10 {
            let cache_clone = Arc::clone(&cache);
            let handle = thread::spawn(move || {
                for j in 0..10 {
                    cache_clone.set(format!("GET:/k-{i}-{j}"), Arc::new(json!(i * 10 + j)));
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 100);
    }
}
