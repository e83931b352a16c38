//! Time abstraction for testability
//!
//! Cache freshness and staleness tracking are all "how long ago" questions.
//! Reading time through a trait lets production code use the real clock
//! while tests advance a mock without sleeping.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use fleetline_common::time::{Clock, MockClock, SystemClock};
//!
//! let clock = SystemClock;
//! let now = clock.now();
//!
//! let mock = MockClock::new();
//! let start = mock.now();
//! mock.advance(Duration::from_secs(5));
//! assert_eq!(mock.now().duration_since(start), Duration::from_secs(5));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use parking_lot::Mutex;

/// Trait for time operations to enable testing
pub trait Clock: Send + Sync {
    /// Current instant (monotonic time), suitable for measuring durations.
    fn now(&self) -> Instant;

    /// Current wall clock time.
    fn system_time(&self) -> SystemTime;
}

/// Real system clock implementation
///
/// Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Mock clock for deterministic testing
///
/// Starts at the current real time; `advance` simulates time passing without
/// waiting. Clones share the same elapsed offset, so a clone handed to the
/// component under test stays steerable from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
    base_system_time: SystemTime,
}

impl MockClock {
    /// Create a new mock clock anchored at the current real time.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            base_system_time: SystemTime::now(),
        }
    }

    /// Advance the mock clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock();
        *elapsed += duration;
    }

    /// Advance the mock clock by a number of milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Set the simulated elapsed time to an absolute value.
    pub fn set_elapsed(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock();
        *elapsed = duration;
    }

    /// How much time has been simulated since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }

    fn system_time(&self) -> SystemTime {
        self.base_system_time + *self.elapsed.lock()
    }
}
