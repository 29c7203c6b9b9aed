//! Bounded exponential-backoff policy for transient request failures.

use std::time::Duration;

/// Tunable parameters for the retry strategy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first (default: 3).
    pub max_attempts: u32,
    /// Base delay; attempt `n` waits `base * 2^n` (default: 1s).
    pub base_delay: Duration,
    /// Upper bound on the delay between attempts (default: 30s).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Delay before re-issuing attempt `attempt + 1`.
    ///
    /// Doubles per failed attempt (`base * 2^attempt`), clamped to
    /// [`RetryConfig::max_delay`].
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let config = RetryConfig::default();
        let secs: Vec<u64> = (0..4).map(|a| config.backoff_delay(a).as_secs()).collect();
        assert_eq!(secs, vec![1, 2, 4, 8]);
    }

    #[test]
    fn backoff_clamps_at_max() {
        let config = RetryConfig {
            max_delay: Duration::from_secs(10),
            ..Default::default()
        };
        assert_eq!(config.backoff_delay(3), Duration::from_secs(8));
        assert_eq!(config.backoff_delay(4), Duration::from_secs(10));
        assert_eq!(config.backoff_delay(30), Duration::from_secs(10));
    }

    #[test]
    fn huge_attempt_numbers_do_not_overflow() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_delay(u32::MAX), config.max_delay);
    }
}
