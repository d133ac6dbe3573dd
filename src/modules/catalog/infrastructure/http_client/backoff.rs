//! Bounded retry with exponential backoff for catalog API calls
//!
//! Every failure is retried the same way: there is no jitter and no split
//! between retryable and permanent errors.

use crate::shared::errors::AppResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total attempts including the first one (0 behaves like 1)
    pub max_attempts: u32,
    /// Delay after the first failure; doubled after each further failure
    pub initial_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Delays slept between consecutive attempts, in order
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let retries = self.max_attempts.max(1) - 1;
        std::iter::successors(Some(self.initial_delay), |delay| Some(delay.saturating_mul(2)))
            .take(retries as usize)
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// The error of the last attempt is returned unchanged.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut delays = self.delays();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            "{} succeeded on attempt {} after {} retries",
                            operation_name,
                            attempt,
                            attempt - 1
                        );
                    }
                    return Ok(result);
                }
                Err(error) => match delays.next() {
                    Some(delay) => {
                        warn!(
                            "{} failed on attempt {}/{} ({}), retrying in {:?}",
                            operation_name, attempt, max_attempts, error, delay
                        );
                        sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        warn!(
                            "{} failed on final attempt {}/{} ({}), giving up",
                            operation_name, attempt, max_attempts, error
                        );
                        return Err(error);
                    }
                },
            }
        }
    }
}
