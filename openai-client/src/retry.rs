//! Bounded retry with fixed backoff for fallible API calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry policy for fallible operations.
///
/// Wraps an operation closure and re-runs it on failure, sleeping a fixed
/// delay between attempts. After `max_attempts` failures the last error is
/// propagated unchanged to the caller.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a new policy. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds or `max_attempts` is exhausted.
    ///
    /// The closure is called once per attempt and must produce a fresh
    /// future each time. Any error type with a `Display` impl works.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        eprintln!("All {} attempts failed.", self.max_attempts);
                        return Err(err);
                    }
                    eprintln!(
                        "Attempt {} failed: {}. Retrying in {} seconds...",
                        attempt,
                        err,
                        self.delay.as_secs()
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
