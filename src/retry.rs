//! Exponential backoff for managed delivery

use crate::Error;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

/// Retry policy of the managed relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause after the first failed attempt, doubled after every further one
    ///
    /// Kept in whole milliseconds, rounded down to an even number.
    pub initial_interval: Duration,

    /// Attempts made before giving up, the first one included
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Fixed managed delivery policy: 10ms doubling, 10 attempts
    pub const EXPONENTIAL: Self = Self {
        initial_interval: Duration::from_millis(10),
        max_attempts: 10,
    };

    /// Pauses between consecutive attempts
    pub fn strategy(&self) -> impl Iterator<Item = Duration> {
        let millis = u64::try_from(self.initial_interval.as_millis()).unwrap_or(u64::MAX);
        let retries = usize::try_from(self.max_attempts.saturating_sub(1)).unwrap_or(usize::MAX);

        // base 2 doubles, factor scales the first step to the initial interval
        ExponentialBackoff::from_millis(2)
            .factor(millis / 2)
            .take(retries)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::EXPONENTIAL
    }
}

/// Statuses worth another attempt
pub fn is_retryable_status(status_code: u16) -> bool {
    matches!(status_code, 404 | 413 | 425 | 429 | 502 | 503 | 504)
}

/// Failures worth another attempt: transport errors and transient statuses
pub fn is_retryable(error: &Error) -> bool {
    match error {
        Error::Http(_) => true,
        Error::Rejected { status_code } => is_retryable_status(*status_code),
        _ => false,
    }
}
