//! Bounded-time polling retry
//!
//! [`RetryPolicy::retry_until`] calls a producer until it yields a truthy
//! value, waiting a constant interval between calls. Errors from the producer
//! are never retried; they end the loop at once. The total wait is bounded by
//! the policy timeout: the last wait is shortened so the loop never sleeps
//! past it.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::clock::{Clock, SystemClock};
use super::truthy::Truthy;

/// Wait between attempts when none is given
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<T, E> {
    /// The timeout elapsed while the producer kept returning falsy values
    #[error("Retry timeout exceeded after {elapsed:?} ({attempts} attempts)")]
    TimeoutExceeded { elapsed: Duration, attempts: u32, last_output: T },

    /// The producer itself failed
    #[error(transparent)]
    Operation(E),
}

impl<T, E> RetryError<T, E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutExceeded { .. })
    }

    /// The last falsy value seen before giving up
    pub fn last_output(&self) -> Option<&T> {
        match self {
            Self::TimeoutExceeded { last_output, .. } => Some(last_output),
            Self::Operation(_) => None,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<T, E>>;

/// Constant-interval polling policy with a wall-clock budget
#[derive(Clone)]
pub struct RetryPolicy<C: Clock = SystemClock> {
    timeout: Duration,
    interval: Duration,
    clock: C,
}

impl RetryPolicy<SystemClock> {
    /// Policy with the given timeout and the default 5 second interval
    pub fn new(timeout: Duration) -> Self {
        Self::with_clock(timeout, DEFAULT_RETRY_INTERVAL, SystemClock)
    }
}

impl<C: Clock> RetryPolicy<C> {
    pub fn with_clock(timeout: Duration, interval: Duration, clock: C) -> Self {
        Self { timeout, interval, clock }
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn wait_interval(&self) -> Duration {
        self.interval
    }

    /// Call `producer` until it returns a truthy value
    ///
    /// # Errors
    /// `TimeoutExceeded` with the last falsy value once `timeout` has elapsed
    /// since the first attempt, or `Operation` as soon as the producer fails.
    #[instrument(
        skip_all,
        fields(timeout_secs = self.timeout.as_secs(), interval_secs = self.interval.as_secs())
    )]
    pub fn retry_until<T, E, F>(&self, mut producer: F) -> RetryResult<T, E>
    where
        T: Truthy,
        F: FnMut() -> Result<T, E>,
    {
        let start = self.clock.now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let output = producer().map_err(RetryError::Operation)?;
            if output.is_truthy() {
                debug!(attempts, "producer returned a result");
                return Ok(output);
            }

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= self.timeout {
                warn!(attempts, elapsed_ms = elapsed.as_millis() as u64, "retry timeout exceeded");
                return Err(RetryError::TimeoutExceeded { elapsed, attempts, last_output: output });
            }

            let wait = self.interval.min(self.timeout - elapsed);
            debug!(attempts, wait_ms = wait.as_millis() as u64, "no result yet, waiting");
            self.clock.sleep(wait);
        }
    }
}

impl<C: Clock> fmt::Debug for RetryPolicy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("timeout", &self.timeout)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Poll `producer` on the system clock
///
/// Shorthand for `RetryPolicy::new(timeout).interval(interval).retry_until(producer)`.
///
/// # Errors
/// See [`RetryPolicy::retry_until`].
pub fn retry_until<T, E, F>(timeout: Duration, producer: F, interval: Duration) -> RetryResult<T, E>
where
    T: Truthy,
    F: FnMut() -> Result<T, E>,
{
    RetryPolicy::new(timeout).interval(interval).retry_until(producer)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::resilience::MockClock;

    fn policy(timeout_secs: u64, interval_secs: u64, clock: &MockClock) -> RetryPolicy<MockClock> {
        RetryPolicy::with_clock(
            Duration::from_secs(timeout_secs),
            Duration::from_secs(interval_secs),
            clock.clone(),
        )
    }

    #[test]
    fn test_immediate_success_never_sleeps() {
        let clock = MockClock::new();
        let result = policy(30, 5, &clock).retry_until(|| Ok::<_, Infallible>("ready".to_string()));

        assert_eq!(result.unwrap(), "ready");
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_two_empty_results_then_value() {
        let clock = MockClock::new();
        let mut outputs = vec![String::new(), String::new(), "report".to_string()].into_iter();

        let result = policy(12, 5, &clock)
            .retry_until(|| Ok::<_, Infallible>(outputs.next().unwrap_or_default()));

        assert_eq!(result.unwrap(), "report");
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 2]);
        assert!(clock.elapsed() >= Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_never_sleeps_past_budget() {
        let clock = MockClock::new();

        let err = policy(3, 5, &clock).retry_until(|| Ok::<_, Infallible>(0_u32)).unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.last_output(), Some(&0));
        assert!(clock.total_slept() <= Duration::from_secs(3));
        match err {
            RetryError::TimeoutExceeded { attempts, elapsed, .. } => {
                assert_eq!(attempts, 2);
                assert_eq!(elapsed, Duration::from_secs(3));
            }
            RetryError::Operation(never) => match never {},
        }
    }

    #[test]
    fn test_zero_timeout_tries_once() {
        let clock = MockClock::new();
        let mut calls = 0;

        let err = policy(0, 5, &clock)
            .retry_until(|| {
                calls += 1;
                Ok::<_, Infallible>(false)
            })
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(calls, 1);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_producer_error_stops_immediately() {
        let clock = MockClock::new();
        let mut calls = 0;

        let err = policy(30, 5, &clock)
            .retry_until(|| {
                calls += 1;
                if calls == 2 {
                    Err("boom")
                } else {
                    Ok(Vec::<u8>::new())
                }
            })
            .unwrap_err();

        assert!(matches!(err, RetryError::Operation("boom")));
        assert!(err.last_output().is_none());
        assert_eq!(calls, 2);
        assert_eq!(clock.sleeps().len(), 1);
    }
}
