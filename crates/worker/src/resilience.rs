//! Retry/backoff for calls to flaky generation backends.
//!
//! Two nested loops: a transient-I/O retry (read timeouts, dropped
//! connections) wrapping a congestion backoff (rate-limit responses).
//! Unlike a bare attempt counter, the whole call carries an elapsed-time
//! budget, and congestion delays grow exponentially -- sixty fixed sleeps
//! against a saturated backend is how retry storms start.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// How a provider error should be treated by the retry loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Read timeout / read error: retry immediately.
    Transient,
    /// Rate-limit response (HTTP 429 class): back off, then retry.
    RateLimited,
    /// Anything else: surface immediately.
    Permanent,
}

/// Implemented by provider error types so the retry loops can route them.
pub trait ClassifyError {
    fn classify(&self) -> ErrorClass;
}

/// Tunable parameters for [`call_with_resilience`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts for the outer transient-I/O loop.
    pub read_attempts: u32,
    /// Attempts for the inner congestion loop.
    pub congestion_attempts: u32,
    /// First congestion delay.
    pub initial_backoff: Duration,
    /// Upper bound on a single congestion delay.
    pub max_backoff: Duration,
    /// Factor by which the congestion delay grows.
    pub backoff_multiplier: f64,
    /// Budget for the whole call, sleeps included. Once spent, the last
    /// error surfaces regardless of remaining attempts.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            read_attempts: 5,
            congestion_attempts: 60,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            max_elapsed: Duration::from_secs(600),
        }
    }
}

/// Grow `current` by the policy's multiplier, clamped to its maximum.
fn next_backoff(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.backoff_multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_backoff)
}

/// Call `op`, retrying per `policy`, until success, a permanent error,
/// attempt exhaustion, or the elapsed-time budget runs out.
pub async fn call_with_resilience<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: ClassifyError + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let deadline = Instant::now() + policy.max_elapsed;
    let mut read_attempt = 0;

    loop {
        read_attempt += 1;
        match with_congestion_backoff(policy, &mut op, deadline).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let out_of_budget =
                    read_attempt >= policy.read_attempts || Instant::now() >= deadline;
                if error.classify() != ErrorClass::Transient || out_of_budget {
                    return Err(error);
                }
                tracing::info!(
                    attempt = read_attempt,
                    max = policy.read_attempts,
                    error = %error,
                    "Read error, retrying",
                );
            }
        }
    }
}

/// Inner loop: retry rate-limited calls with exponential backoff.
async fn with_congestion_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    op: &mut F,
    deadline: Instant,
) -> Result<T, E>
where
    E: ClassifyError + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = policy.initial_backoff;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if error.classify() != ErrorClass::RateLimited
                    || attempt >= policy.congestion_attempts
                {
                    return Err(error);
                }
                if Instant::now() + delay >= deadline {
                    tracing::warn!(attempt, error = %error, "Retry budget exhausted");
                    return Err(error);
                }
                tracing::info!(
                    attempt,
                    max = policy.congestion_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, backing off",
                );
                tokio::time::sleep(delay).await;
                delay = next_backoff(delay, policy);
            }
        }
    }
}
