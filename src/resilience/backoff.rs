//! Advisory exponential backoff with jitter.
//!
//! The guard never re-sends a call. The delay computed here is only reported
//! alongside the "would retry" log line so operators can see how a client
//! should pace itself.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Exponential backoff policy.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self { base_ms, max_ms }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.base_delay_ms, config.max_delay_ms)
    }

    /// Delay before the given 1-based attempt, without jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u64.saturating_pow(attempt - 1);
        Duration::from_millis(self.base_ms.saturating_mul(factor).min(self.max_ms))
    }

    /// Delay before the given attempt, plus up to 10% jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        let capped = self.base_delay(attempt).as_millis() as u64;
        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };
        Duration::from_millis(capped + jitter)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_delay_doubles_and_caps() {
        let backoff = Backoff::new(100, 1000);
        assert_eq!(backoff.base_delay(0), Duration::ZERO);
        assert_eq!(backoff.base_delay(1), Duration::from_millis(100));
        assert_eq!(backoff.base_delay(2), Duration::from_millis(200));
        assert_eq!(backoff.base_delay(3), Duration::from_millis(400));
        assert_eq!(backoff.base_delay(10), Duration::from_millis(1000));
        assert_eq!(backoff.base_delay(u32::MAX), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let backoff = Backoff::new(100, 2000);
        for _ in 0..50 {
            let d = backoff.delay(2).as_millis();
            assert!((200..220).contains(&d), "delay {d} out of range");
        }
    }
}
