use std::time::Duration;
use tracing::debug;

/// What to do after the provider rejected a call for quota reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
    /// Wait this long, then retry the same request.
    RetryAfter(Duration),
    /// The retry ceiling was already reached.
    Exhausted { attempts: u64 },
}

/// Counts consecutive rate-limit rejections since the last success and
/// scales the wait linearly with that count.
#[derive(Debug, Clone)]
pub struct RateLimitBudget {
    max_retries: u64,
    base_delay: Duration,
    retry_count: u64,
}

impl Default for RateLimitBudget {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RateLimitBudget {
    pub fn new(max_retries: u64, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            retry_count: 0,
        }
    }

    pub fn record_rate_limit(&mut self) -> RetryDisposition {
        if self.retry_count >= self.max_retries {
            debug!(attempts = self.retry_count, "Rate limit retries exhausted.");
            return RetryDisposition::Exhausted {
                attempts: self.retry_count,
            };
        }

        self.retry_count += 1;
        let delay = self.delay_for(self.retry_count);
        debug!(
            attempt = self.retry_count,
            max_retries = self.max_retries,
            delay = ?delay,
            "Rate limited, backing off."
        );
        RetryDisposition::RetryAfter(delay)
    }

    pub fn record_success(&mut self) {
        self.retry_count = 0;
    }

    pub fn retry_count(&self) -> u64 {
        self.retry_count
    }

    pub fn max_retries(&self) -> u64 {
        self.max_retries
    }

    fn delay_for(&self, count: u64) -> Duration {
        let factor = u32::try_from(count).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}
