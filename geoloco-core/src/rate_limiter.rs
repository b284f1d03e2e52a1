use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant, TryFromFloatSecsError};

/// Default limit for providers that throttle per second
pub const DEFAULT_QPS_LIMIT: f64 = 5.0;

/// Elapsed time assumed when no call has been made yet
const NO_PRIOR_CALL: Duration = Duration::from_secs(2);

/// Source of time for the rate limiter
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock that really blocks the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Spaces outbound calls so they stay under a queries-per-second limit
pub struct RateLimiter<C: Clock = SystemClock> {
    clock: C,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for RateLimiter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last_call: Mutex::new(None),
        }
    }

    /// Block until a call is allowed under `qps_limit`, then record it
    ///
    /// A limit of zero (or below) disables limiting entirely. Returns how
    /// long the caller was put to sleep, or an error when the interval
    /// implied by `qps_limit` does not fit in a `Duration`; the call is not
    /// recorded in that case.
    pub fn wait(&self, qps_limit: f64) -> Result<Duration, TryFromFloatSecsError> {
        if qps_limit <= 0.0 {
            return Ok(Duration::ZERO);
        }

        let mut last_call = self
            .last_call
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let elapsed = last_call
            .map(|last| self.clock.now().saturating_duration_since(last))
            .unwrap_or(NO_PRIOR_CALL);

        let wait = 1.0 / qps_limit - elapsed.as_secs_f64();
        let slept = if wait > 0.0 {
            let duration = Duration::try_from_secs_f64(wait)?;
            log::debug!("Rate limiting: sleeping {:?} (limit {} qps)", duration, qps_limit);
            self.clock.sleep(duration);
            duration
        } else {
            Duration::ZERO
        };

        *last_call = Some(self.clock.now());
        Ok(slept)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FrozenClock;
    use super::*;
    use anyhow::Result;

    fn assert_secs(actual: Duration, expected: f64) {
        assert!(
            (actual.as_secs_f64() - expected).abs() < 1e-9,
            "expected {}s, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_first_call_never_waits() -> Result<()> {
        let clock = FrozenClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());

        assert_eq!(limiter.wait(5.0)?, Duration::ZERO);
        assert!(clock.sleeps().is_empty());

        Ok(())
    }

    #[test]
    fn test_back_to_back_calls_wait_full_interval() -> Result<()> {
        let clock = FrozenClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());

        limiter.wait(5.0)?;
        assert_secs(limiter.wait(5.0)?, 0.2);
        assert_secs(limiter.wait(2.0)?, 0.5);

        let sleeps = clock.sleeps();
        assert_eq!(sleeps.len(), 2);
        assert_secs(sleeps[0], 0.2);
        assert_secs(sleeps[1], 0.5);

        Ok(())
    }

    #[test]
    fn test_waits_only_for_the_remainder() -> Result<()> {
        let clock = FrozenClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());

        limiter.wait(5.0)?;
        clock.advance(Duration::from_millis(150));
        assert_secs(limiter.wait(5.0)?, 0.05);

        Ok(())
    }

    #[test]
    fn test_no_wait_once_interval_has_passed() -> Result<()> {
        let clock = FrozenClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());

        limiter.wait(5.0)?;
        clock.advance(Duration::from_millis(250));
        assert_eq!(limiter.wait(5.0)?, Duration::ZERO);
        assert!(clock.sleeps().is_empty());

        Ok(())
    }

    #[test]
    fn test_zero_limit_disables() -> Result<()> {
        let clock = FrozenClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());

        limiter.wait(5.0)?;
        assert_eq!(limiter.wait(0.0)?, Duration::ZERO);
        assert_eq!(limiter.wait(0.0)?, Duration::ZERO);
        assert!(clock.sleeps().is_empty());

        Ok(())
    }

    #[test]
    fn test_tiny_limit_is_an_error_not_a_panic() -> Result<()> {
        let clock = FrozenClock::new();
        let limiter = RateLimiter::with_clock(clock.clone());

        // 1e20 seconds is past Duration::MAX
        assert!(limiter.wait(1e-20).is_err());
        assert!(limiter.wait(1e-20).is_err());
        assert!(clock.sleeps().is_empty());

        // Failed calls are not recorded, so the next one goes straight through
        assert_eq!(limiter.wait(5.0)?, Duration::ZERO);

        Ok(())
    }
}
