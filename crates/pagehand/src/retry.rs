//! Stale-Retry Wrapper
//!
//! Re-runs a whole single-element operation, lookup included, when the
//! element reference goes stale between resolution and use. The budget and
//! delay are fixed: no backoff, no jitter.
//!
//! The wrapped closure must resolve its element itself on every attempt, so
//! each retry performs a fresh wait-then-locate instead of reusing a handle.

use crate::clock::SharedClock;
use crate::result::{PagehandError, PagehandResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};

/// Default attempt budget
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts (500ms)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Attempt budget and inter-attempt delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, first one included
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy with the given budget and delay (a zero budget still runs once)
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Budget actually used
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Retries operations whose element went stale
#[derive(Debug, Clone)]
pub struct StaleRetry {
    policy: RetryPolicy,
    clock: SharedClock,
}

impl StaleRetry {
    /// Wrapper with a fixed policy
    #[must_use]
    pub fn new(policy: RetryPolicy, clock: SharedClock) -> Self {
        Self { policy, clock }
    }

    /// The policy
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run `op` until it returns anything other than a stale-element error
    ///
    /// `op` receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns the first non-stale error from `op`, or
    /// [`PagehandError::StaleRetryExhausted`] when every attempt went stale.
    pub fn run<T, F>(&self, operation: &str, mut op: F) -> PagehandResult<T>
    where
        F: FnMut(u32) -> PagehandResult<T>,
    {
        let attempts = self.policy.attempts();
        for attempt in 1..=attempts {
            match op(attempt) {
                Err(err) if err.is_stale() => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = attempts,
                        error = %err,
                        "stale element, retrying"
                    );
                    if attempt < attempts {
                        self.clock.sleep(self.policy.delay);
                    }
                }
                other => return other,
            }
        }
        error!(operation, attempts, "stale element retries exhausted");
        Err(PagehandError::StaleRetryExhausted {
            operation: operation.to_string(),
            attempts,
        })
    }

    /// Wrap `op` into a closure that applies this retry policy on every call
    pub fn wrap<'a, T, F>(
        &'a self,
        operation: &'a str,
        op: F,
    ) -> impl FnMut() -> PagehandResult<T> + 'a
    where
        T: 'a,
        F: FnMut(u32) -> PagehandResult<T> + 'a,
    {
        let mut op = op;
        move || self.run(operation, &mut op)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FakeClock};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn stale() -> PagehandError {
        PagehandError::StaleElement {
            element: "e-1".to_string(),
        }
    }

    fn retry() -> (StaleRetry, Arc<FakeClock>) {
        let clock = FakeClock::shared();
        (StaleRetry::new(RetryPolicy::default(), clock.clone()), clock)
    }

    mod budget_tests {
        use super::*;

        #[test]
        fn test_first_attempt_success_does_not_sleep() {
            let (retry, clock) = retry();
            let value = retry.run("read", |_| Ok(42)).unwrap();
            assert_eq!(value, 42);
            assert_eq!(clock.sleep_count(), 0);
        }

        #[test]
        fn test_two_stale_then_success() {
            let (retry, clock) = retry();
            let mut calls = 0;
            let value = retry
                .run("click", |attempt| {
                    calls += 1;
                    if attempt < 3 {
                        Err(stale())
                    } else {
                        Ok("clicked")
                    }
                })
                .unwrap();
            assert_eq!(value, "clicked");
            assert_eq!(calls, 3);
            assert_eq!(clock.total_slept(), Duration::from_millis(1_000));
        }

        #[test]
        fn test_always_stale_exhausts_with_attempt_count() {
            let (retry, clock) = retry();
            let err = retry.run::<(), _>("type", |_| Err(stale())).unwrap_err();
            match err {
                PagehandError::StaleRetryExhausted {
                    operation,
                    attempts,
                } => {
                    assert_eq!(operation, "type");
                    assert_eq!(attempts, 3);
                }
                other => panic!("unexpected {other:?}"),
            }
            assert_eq!(clock.sleep_count(), 2);
            assert_eq!(clock.now(), Duration::from_millis(1_000));
        }

        #[test]
        fn test_other_errors_are_not_retried() {
            let (retry, _clock) = retry();
            let mut calls = 0;
            let err = retry
                .run::<(), _>("click", |_| {
                    calls += 1;
                    Err(PagehandError::NoSuchAlert)
                })
                .unwrap_err();
            assert!(matches!(err, PagehandError::NoSuchAlert));
            assert_eq!(calls, 1);
        }

        #[test]
        fn test_zero_budget_runs_once() {
            let clock = FakeClock::shared();
            let retry = StaleRetry::new(RetryPolicy::new(0, Duration::ZERO), clock);
            let err = retry.run::<(), _>("x", |_| Err(stale())).unwrap_err();
            assert!(matches!(
                err,
                PagehandError::StaleRetryExhausted { attempts: 1, .. }
            ));
        }

        #[test]
        fn test_wrap_reapplies_policy_per_call() {
            let (retry, _clock) = retry();
            let mut stale_left = 4;
            let mut wrapped = retry.wrap("toggle", |_| {
                if stale_left > 0 {
                    stale_left -= 1;
                    Err(stale())
                } else {
                    Ok(())
                }
            });
            assert!(matches!(
                wrapped(),
                Err(PagehandError::StaleRetryExhausted { attempts: 3, .. })
            ));
            assert!(wrapped().is_ok());
        }
    }

    proptest! {
        #[test]
        fn prop_budget_boundary(budget in 1u32..6, invalidations in 0u32..8) {
            let clock = FakeClock::shared();
            let retry = StaleRetry::new(RetryPolicy::new(budget, Duration::from_millis(500)), clock);
            let mut left = invalidations;
            let result = retry.run("op", |_| {
                if left > 0 {
                    left -= 1;
                    Err(stale())
                } else {
                    Ok(())
                }
            });
            if invalidations < budget {
                prop_assert!(result.is_ok());
            } else {
                let exhausted = matches!(
                    result,
                    Err(PagehandError::StaleRetryExhausted { attempts, .. }) if attempts == budget
                );
                prop_assert!(exhausted);
            }
        }
    }
}
