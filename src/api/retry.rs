//! Bounded-retry execution policy for remote operations.
//!
//! Every network-facing call made by the roll-call workflow goes through
//! [`ResilientClient::execute`]. The policy knows nothing about attendance
//! semantics; it only classifies failures as transient or final and accounts
//! for attempts.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::ApiError;

/// Maximum attempts per operation, including the first.
/// 3 attempts usually rides out a transient outage without making the
/// operator wait through a long failure.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay between attempts in milliseconds.
/// 1 second is polite to the server while keeping the console responsive.
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Executes a single remote operation under a bounded-retry policy.
///
/// Client-class failures (4xx) propagate immediately. Connection failures and
/// server errors (>= 500) are retried after a fixed delay until the attempt
/// budget is exhausted, at which point the last failure propagates. The
/// operation is invoked at most `max_attempts` times and attempts are strictly
/// sequential. Once a sequence starts it runs to completion; callers wanting
/// abandonment semantics discard the result instead of cancelling.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    max_attempts: u32,
    retry_delay: Duration,
}

impl Default for ResilientClient {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl ResilientClient {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            // A zero budget would never invoke the operation
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// The operation must be safe to invoke more than once: a transient
    /// failure whose first attempt actually landed server-side will be
    /// re-issued.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = self.retry_delay.as_millis() as u64,
                        error = %err,
                        "Transient failure, backing off before retry"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
