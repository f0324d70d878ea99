//! Retrying fallible manifest reads

use std::fmt::Display;
use std::thread;
use std::time::Duration;

/// How often, and how patiently, to retry a failed operation.
///
/// Passed explicitly to whoever needs it; there is no global retry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        RetryPolicy { max_retries, delay }
    }

    /// A single attempt
    pub fn none() -> Self {
        RetryPolicy::new(0, Duration::ZERO)
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(2, Duration::from_millis(50))
    }
}

/// Run `f` until it succeeds or the policy is exhausted.
///
/// Errors `retryable` rejects are returned at once. Otherwise the last error
/// is returned after `max_retries + 1` attempts.
pub fn with_retries_if<T, E, R, F>(operation: &str, policy: &RetryPolicy, retryable: R, mut f: F) -> Result<T, E>
where
    E: Display,
    R: Fn(&E) -> bool,
    F: FnMut() -> Result<T, E>,
{
    let total = policy.total_attempts();
    let mut failures = 0;

    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(err) => {
                failures += 1;
                if !retryable(&err) {
                    log::debug!("{} failed permanently: {}", operation, err);
                    return Err(err);
                }
                if failures >= total {
                    log::error!("{} failed after {} attempts: {}", operation, total, err);
                    return Err(err);
                }
                log::warn!(
                    "{} failed (attempt {} of {}), retrying in {:?}: {}",
                    operation,
                    failures,
                    total,
                    policy.delay,
                    err
                );
                if !policy.delay.is_zero() {
                    thread::sleep(policy.delay);
                }
            }
        }
    }
}
