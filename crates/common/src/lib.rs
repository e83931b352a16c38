//! Shared runtime utilities for Fleetline crates.
//!
//! This crate holds the cross-cutting machinery the client layer is built
//! on: the TTL response cache and its canonical cache keys, the retry
//! policy, the clock abstraction used to make time-dependent code
//! deterministic under test, and the durable key/value storage used for
//! session and preference persistence.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod retry;
pub mod storage;
pub mod time;

// Re-export commonly used types and traits for convenience
pub use cache::{CacheKey, CacheStats, ResponseCache};
pub use retry::RetryPolicy;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use time::{Clock, MockClock, SystemClock};
