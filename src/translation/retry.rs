/*!
 * Bounded retry with exponential backoff for provider calls.
 *
 * Only transient failures are retried. Every other class is returned to the
 * caller on first occurrence.
 */

use std::future::Future;
use std::time::Duration;

use log::warn;
use rand::Rng;

use crate::app_config::TranslationCommonConfig;
use crate::errors::ProviderError;

/// Retry settings for one provider call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the first retry, doubled on each later retry
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

    /// Policy that never waits, used in tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self::new(
            common.retry_count.saturating_add(1),
            Duration::from_millis(common.retry_backoff_ms),
            Duration::from_millis(common.max_backoff_ms),
        )
    }

    /// Backoff before retry number `attempt` (1-based), without jitter
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails non-transiently or runs out of attempts
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 1;

        loop {
            let error = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_retryable() || attempt >= self.max_attempts {
                return Err(error);
            }

            let delay = self.with_jitter(self.delay_for_attempt(attempt));
            warn!(
                "{} failed ({}), attempt {}/{}, retrying in {}ms",
                label,
                error,
                attempt,
                self.max_attempts,
                delay.as_millis()
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }

    fn with_jitter(&self, delay: Duration) -> Duration {
        let millis = delay.as_millis() as u64;
        if millis == 0 {
            return delay;
        }
        let jitter = rand::rng().random_range(0..=millis / 4);
        Duration::from_millis(millis + jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&TranslationCommonConfig::default())
    }
}
