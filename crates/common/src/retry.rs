//! Linear-backoff retry policy
//!
//! The wire protocol retries a failed request at most a configured number of
//! times, waiting `base_delay × attempt` before each retry (ascending).
//! Whether an error is worth retrying is the caller's call; this type only
//! owns the budget and the delay schedule.

use std::time::Duration;

/// Retry budget and delay schedule for one request.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use fleetline_common::retry::RetryPolicy;
///
/// let policy = RetryPolicy::new(2, Duration::from_millis(300));
/// assert!(policy.allows(1));
/// assert!(policy.allows(2));
/// assert!(!policy.allows(3));
/// assert_eq!(policy.delay_for(2), Duration::from_millis(600));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// A policy allowing up to `max_retries` retries with the given base
    /// delay.
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// A policy that never retries. The default for mutating requests,
    /// which lack idempotency keys.
    pub const fn none() -> Self {
        Self { max_retries: 0, base_delay: Duration::ZERO }
    }

    /// Maximum number of retries (not counting the initial attempt).
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether retry number `attempt` (1-based) is within budget.
    pub const fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }

    /// Delay before retry number `attempt` (1-based): `base_delay × attempt`,
    /// so successive retries back off linearly.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the retry module.
    use super::*;

    /// Validates `RetryPolicy::new` behavior for the budget scenario.
    ///
    /// Assertions:
    /// - Confirms attempts inside the budget are allowed.
    /// - Confirms the attempt past the budget is rejected.
    #[test]
    fn test_policy_budget() {
        let policy = RetryPolicy::new(1, Duration::from_millis(100));
        assert!(policy.allows(1));
        assert!(!policy.allows(2));
    }

    /// Validates `RetryPolicy::delay_for` behavior for the linear schedule
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms delays ascend as `base × attempt`.
    #[test]
    fn test_policy_linear_delays() {
        let policy = RetryPolicy::new(3, Duration::from_millis(300));
        assert_eq!(policy.delay_for(1), Duration::from_millis(300));
        assert_eq!(policy.delay_for(2), Duration::from_millis(600));
        assert_eq!(policy.delay_for(3), Duration::from_millis(900));
    }

    /// Validates `RetryPolicy::none` behavior for the no-retry scenario.
    ///
    /// Assertions:
    /// - Confirms the first retry is already out of budget.
    #[test]
    fn test_policy_none_never_allows() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_retries(), 0);
        assert!(!policy.allows(1));
    }
}
