//! Retry policy for the link-local follow-up timer.

use std::time::Duration;

/// Policy for re-checking an interface that only holds a link-local address.
///
/// After a link-local address shows up, a routable address usually follows
/// shortly, but its native notification is not always delivered. The monitor
/// re-resolves every [`interval`](Self::interval) until a routable address
/// appears, the interface goes idle, or [`max_retries`](Self::max_retries)
/// timer firings have elapsed.
///
/// A `max_retries` of zero or one never re-resolves: the single armed timer
/// gives up as soon as it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
    max_retries: u32,
}

impl RetryPolicy {
    /// Default delay between re-checks.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    /// Default number of timer firings before giving up.
    pub const DEFAULT_MAX_RETRIES: u32 = 20;

    /// Creates a policy with the given interval and retry budget.
    #[must_use]
    pub const fn new(interval: Duration, max_retries: u32) -> Self {
        Self {
            interval,
            max_retries,
        }
    }

    /// Returns the delay between re-checks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the maximum number of timer firings per retry cycle.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns a copy with a different interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns a copy with a different retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for RetryPolicy {
    /// 500 ms between re-checks, 20 firings (about ten seconds of polling).
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_RETRIES)
    }
}
