//! Backoff schedule for the summarizer's quota retries.

use std::time::Duration;

/// Exponential backoff with no jitter: the delay before attempt `k`
/// (zero-based) is `unit * 2^k`, so a three-attempt policy waits 2 then 4
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub unit: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub fn new(unit: Duration) -> Self {
        Self { max_attempts: Self::DEFAULT_MAX_ATTEMPTS, unit }
    }

    /// Delay to wait before `attempt`, or `None` once the attempts are spent.
    /// The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        Some(self.unit.saturating_mul(1u32 << attempt.min(31)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
