// src/utils/retry.rs

//! Bounded retry with exponential backoff.
//!
//! Only the two narrow external calls go through this: establishing the
//! browsing session at startup and fetching the discovery document. Event
//! pages are never retried within a cycle; the next cycle picks them up.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Attempt budget and backoff bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first failure; doubles after each further failure
    pub base_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .saturating_mul(factor)
            .clamp(self.base_delay.min(self.max_delay), self.max_delay)
    }
}

/// Run `op` until it succeeds or the attempt budget is spent.
///
/// Returns the last error on exhaustion.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts => {
                log::error!("{} failed after {} attempts: {}", what, attempt, e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                log::warn!(
                    "{} attempt {}/{} failed: {}. Retrying in {:?}",
                    what,
                    attempt,
                    policy.max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::AppError;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1), Duration::from_millis(2))
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1), Duration::from_secs(10));
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
        assert_eq!(policy.delay_after(4), Duration::from_secs(8));
        assert_eq!(policy.delay_after(5), Duration::from_secs(10));
        assert_eq!(policy.delay_after(40), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry(&fast(4), "flaky", || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::discovery("503"))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_at_budget() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<()> = retry(&fast(3), "down", || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::discovery("unreachable"))
        })
        .await;

        assert!(matches!(result, Err(AppError::Discovery(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
