use std::time::Duration;

use crate::constants::{LIVE_PRICE_MAX_BACKOFF, LIVE_PRICE_REFRESH};

/// Rate-limit-aware delay between live price ticks.
///
/// Stays at the base interval while providers answer; doubles on every
/// rate-limited tick up to the cap and snaps back to base on any other
/// outcome.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    current: Duration,
}

impl BackoffPolicy {
    pub fn new() -> Self {
        BackoffPolicy {
            current: LIVE_PRICE_REFRESH,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn on_rate_limited(&mut self) -> Duration {
        self.current = (self.current * 2).min(LIVE_PRICE_MAX_BACKOFF);
        self.current
    }

    pub fn reset(&mut self) -> Duration {
        self.current = LIVE_PRICE_REFRESH;
        self.current
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut backoff = BackoffPolicy::new();
        assert_eq!(backoff.current(), Duration::from_secs(60));
        assert_eq!(backoff.on_rate_limited(), Duration::from_secs(120));
        assert_eq!(backoff.on_rate_limited(), Duration::from_secs(240));
        assert_eq!(backoff.on_rate_limited(), Duration::from_secs(300));
        assert_eq!(backoff.on_rate_limited(), Duration::from_secs(300));
    }

    #[test]
    fn test_backoff_resets_on_any_other_outcome() {
        let mut backoff = BackoffPolicy::new();
        backoff.on_rate_limited();
        backoff.on_rate_limited();
        assert_eq!(backoff.reset(), Duration::from_secs(60));
    }
}
