use std::time::Duration;

use rand::Rng;

/// Bounded retry schedule with exponential backoff and random jitter.
///
/// The wait after failed attempt `n` (0-based) is `base_delay * 2^n` plus a
/// uniform jitter in `[0, max_jitter)`. No wait follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Wait before retrying after the failed attempt `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.saturating_mul(2_u32.saturating_pow(attempt));
        exponential.saturating_add(self.jitter())
    }

    /// Worst-case total waiting time across all attempts.
    pub fn max_total_wait(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| {
                self.base_delay
                    .saturating_mul(2_u32.saturating_pow(attempt))
                    .saturating_add(self.max_jitter)
            })
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    fn jitter(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        let millis = rand::rng().random_range(0..self.max_jitter.as_millis() as u64);
        Duration::from_millis(millis)
    }
}
