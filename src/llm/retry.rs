//! Exponential Backoff Retry
//!
//! Transient endpoint failures (rate limits, timeouts, dropped connections,
//! 5xx) are retried with exponential backoff before the driver gives up on
//! a turn. Everything else fails immediately.
//!
//! - Delay doubles each attempt: `base_delay * 2^attempt`, capped at `max_delay`
//! - Jitter stretches the delay by up to `jitter_factor`
//! - A Retry-After hint replaces the computed delay

use crate::llm::LlmError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries)
    pub max_retries: usize,
    /// Initial delay before first retry
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Random jitter factor (0.0 - 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// Create a retry config; `jitter_factor` is clamped to `0.0..=1.0`
    pub fn new(
        max_retries: usize,
        base_delay: Duration,
        max_delay: Duration,
        jitter_factor: f64,
    ) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
            jitter_factor: jitter_factor.clamp(0.0, 1.0),
        }
    }

    /// Never retry
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO, 0.0)
    }

    /// Backoff before retry number `attempt` (0-indexed), without jitter
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31) as u32);
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Backoff with jitter applied, or the server's Retry-After hint
    pub fn delay_for(&self, attempt: usize, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after {
            return hint;
        }
        let backoff = self.backoff(attempt);
        if self.jitter_factor <= 0.0 {
            return backoff;
        }
        let stretch = rand::thread_rng().gen_range(0.0..=self.jitter_factor);
        Duration::try_from_secs_f64(backoff.as_secs_f64() * (1.0 + stretch))
            .unwrap_or(self.max_delay)
    }
}

/// Run `operation` until it succeeds, fails permanently, or retries run out
pub async fn call_with_retry<F, Fut, T>(mut operation: F, config: &RetryConfig) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0;

    loop {
        let err = match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => err,
        };

        if !err.is_retryable() || attempt >= config.max_retries {
            return Err(err);
        }

        let retry_after = match &err {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => None,
        };
        let delay = config.delay_for(attempt, retry_after);
        warn!(
            attempt = attempt + 1,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Endpoint call failed, retrying"
        );
        sleep(delay).await;

        attempt += 1;
    }
}
