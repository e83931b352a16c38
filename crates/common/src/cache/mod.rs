//! Response caching for read requests
//!
//! This module provides the time-bounded key/value cache sitting in front of
//! the HTTP layer, plus the canonical cache-key builder that makes logically
//! identical requests hash to the same entry.
//!
//! # Design
//!
//! - **Thread-safe**: `Arc<RwLock<..>>` storage, shareable by clone
//! - **Freshness at read time**: every `get` carries the caller's max-age;
//!   entries older than that are evicted on the spot and reported as misses
//! - **Substring invalidation**: mutations drop every key containing a path
//!   fragment, without the caller enumerating exact keys
//! - **Testable**: generic over [`crate::time::Clock`] so TTL behavior is
//!   deterministic under [`crate::time::MockClock`]
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use fleetline_common::cache::ResponseCache;
//!
//! let cache = ResponseCache::new();
//! cache.set("GET:/api/v1/drivers", Arc::new(serde_json::json!([])));
//! assert!(cache.get("GET:/api/v1/drivers", Duration::from_secs(60)).is_some());
//!
//! cache.invalidate(Some("/drivers"));
//! assert!(cache.get("GET:/api/v1/drivers", Duration::from_secs(60)).is_none());
//! ```

mod core;
mod key;
mod stats;

// Re-export public API
pub use core::ResponseCache;
pub use key::CacheKey;
pub use stats::CacheStats;
