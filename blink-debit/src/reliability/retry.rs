//! Bounded retry with exponential or fixed backoff.
//!
//! Only [`BlinkError::Network`] and [`BlinkError::Http`] with status 429 or
//! 5xx are retried. Everything else, including validation and token errors,
//! is returned after the first attempt.

use std::{collections::HashSet, time::Duration};

use crate::{
    error::{BlinkError, Result},
    executor::Operation,
};

/// Delay growth between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// `initial_delay * multiplier ^ retry`, capped at `max_delay`.
    Exponential {
        /// Growth factor per retry.
        multiplier: f64,
    },
    /// Always `initial_delay`, capped at `max_delay`.
    Fixed,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential { multiplier: 2.0 }
    }
}

/// Configuration for retry behavior.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use blink_debit::{Operation, reliability::{Backoff, RetryPolicy}};
///
/// // Default policy: 3 attempts, 100ms initial delay, 5s max delay, every operation
/// let policy = RetryPolicy::default();
/// assert!(policy.applies_to(Operation::CreateRefund));
///
/// // Only retry lookups, at a fixed 250ms pace
/// let lookups = RetryPolicy {
///     backoff: Backoff::Fixed,
///     initial_delay: Duration::from_millis(250),
///     ..RetryPolicy::default()
/// }
/// .only(&[Operation::GetConsent, Operation::GetRefund]);
/// assert!(!lookups.applies_to(Operation::CreateRefund));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, first one included (default: 3).
    pub max_attempts: u32,
    /// Delay before the first retry (default: 100ms).
    pub initial_delay: Duration,
    /// Upper bound for any single delay (default: 5s).
    pub max_delay: Duration,
    /// Delay growth (default: exponential, multiplier 2.0).
    pub backoff: Backoff,
    /// Time budget of one attempt; exceeding it counts as a network error.
    pub attempt_timeout: Option<Duration>,
    /// Operations the policy applies to (default: all, creates included).
    pub operations: HashSet<Operation>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff: Backoff::default(),
            attempt_timeout: None,
            operations: Operation::ALL.into_iter().collect(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with custom maximum attempts.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts, ..Self::default() }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self { max_attempts: 1, operations: HashSet::new(), ..Self::default() }
    }

    /// Restricts the policy to `operations`.
    #[must_use]
    pub fn only(mut self, operations: &[Operation]) -> Self {
        self.operations = operations.iter().copied().collect();
        self
    }

    /// Returns `true` if calls of `operation` go through the retry loop.
    #[must_use]
    pub fn applies_to(&self, operation: Operation) -> bool {
        self.max_attempts > 1 && self.operations.contains(&operation)
    }

    /// Delay before retry number `retry` (zero-based).
    pub(crate) fn delay_for_attempt(&self, retry: u32) -> Duration {
        let factor = match self.backoff {
            Backoff::Exponential { multiplier } => {
                multiplier.powi(i32::try_from(retry).unwrap_or(i32::MAX))
            }
            Backoff::Fixed => 1.0,
        };
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the attempts run out.
///
/// Each attempt is bounded by [`RetryPolicy::attempt_timeout`] when set.
/// Dropping the returned future cancels the running attempt and any pending
/// backoff sleep.
///
/// # Errors
///
/// Returns the error of the last attempt.
pub async fn retry_with_backoff<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let outcome = match policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, operation()).await.unwrap_or_else(|_| {
                Err(BlinkError::Network(format!("attempt timed out after {}ms", limit.as_millis())))
            }),
            None => operation().await,
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if attempt < max_attempts && is_retryable(&error) => {
                tracing::warn!(attempt, max_attempts, error = %error, "attempt failed, retrying");
                let delay = policy.delay_for_attempt(attempt - 1);
                tracing::debug!(delay_ms = delay.as_millis(), "sleeping before retry");
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                if attempt > 1 {
                    tracing::warn!(attempt, error = %error, "giving up after retries");
                }
                return Err(error);
            }
        }
    }
}

/// Determines if an error is worth another attempt.
///
/// # Examples
///
/// ```
/// use blink_debit::{BlinkError, reliability::is_retryable};
///
/// assert!(is_retryable(&BlinkError::Network("connection reset".to_owned())));
/// assert!(is_retryable(&BlinkError::Http { status: 503, message: String::new() }));
/// assert!(!is_retryable(&BlinkError::Http { status: 422, message: String::new() }));
/// assert!(!is_retryable(&BlinkError::ExpiredToken));
/// ```
#[must_use]
pub const fn is_retryable(error: &BlinkError) -> bool {
    match error {
        BlinkError::Network(_) => true,
        BlinkError::Http { status, .. } => *status == 429 || *status >= 500,
        BlinkError::Validation(_)
        | BlinkError::ExpiredToken
        | BlinkError::InvalidToken(_)
        | BlinkError::Decode(_)
        | BlinkError::Transport(_)
        | BlinkError::Config(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use super::*;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(1),
            ..RetryPolicy::default()
        }
    }

    async fn count_calls<T>(policy: &RetryPolicy, results: Vec<Result<T>>) -> (Result<T>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let results = Arc::new(std::sync::Mutex::new(results.into_iter()));
        let outcome = retry_with_backoff(policy, || {
            let calls = Arc::clone(&calls);
            let results = Arc::clone(&results);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                results.lock().unwrap().next().unwrap()
            }
        })
        .await;
        (outcome, calls.load(Ordering::SeqCst))
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(100));
        assert_eq!(policy.max_delay, Duration::from_secs(5));
        assert_eq!(policy.backoff, Backoff::Exponential { multiplier: 2.0 });
        assert_eq!(policy.operations.len(), Operation::ALL.len());
    }

    #[test]
    fn test_delay_for_attempt_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(100), Duration::from_secs(5));
    }

    #[test]
    fn test_delay_for_attempt_fixed() {
        let policy = RetryPolicy { backoff: Backoff::Fixed, ..RetryPolicy::default() };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(7), Duration::from_millis(100));
    }

    #[test]
    fn test_applies_to() {
        let policy = RetryPolicy::default().only(&[Operation::GetRefund]);
        assert!(policy.applies_to(Operation::GetRefund));
        assert!(!policy.applies_to(Operation::CreateRefund));
        assert!(!RetryPolicy::disabled().applies_to(Operation::GetRefund));
        assert!(!RetryPolicy::with_max_attempts(1).applies_to(Operation::GetRefund));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_errors_retried_until_success() {
        let results = vec![
            Err(BlinkError::Network("reset".to_owned())),
            Err(BlinkError::Network("reset".to_owned())),
            Ok(42),
        ];
        let (outcome, calls) = count_calls(&fast_policy(3), results).await;
        assert_eq!(outcome.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_error_returned_when_attempts_exhausted() {
        let results = vec![
            Err(BlinkError::Http { status: 500, message: "first".to_owned() }),
            Err(BlinkError::Http { status: 502, message: "second".to_owned() }),
            Err(BlinkError::Http { status: 503, message: "third".to_owned() }),
        ];
        let (outcome, calls) = count_calls::<i32>(&fast_policy(3), results).await;
        assert_eq!(outcome.unwrap_err().status(), Some(503));
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_not_retried() {
        let results = vec![Err(BlinkError::Http { status: 422, message: String::new() })];
        let (outcome, calls) = count_calls::<i32>(&fast_policy(3), results).await;
        assert_eq!(outcome.unwrap_err().status(), Some(422));
        assert_eq!(calls, 1);

        let results = vec![Err(BlinkError::Decode("eof".to_owned()))];
        let (_, calls) = count_calls::<i32>(&fast_policy(3), results).await;
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let start = tokio::time::Instant::now();
        let results = vec![
            Err(BlinkError::Network("a".to_owned())),
            Err(BlinkError::Network("b".to_owned())),
            Err(BlinkError::Network("c".to_owned())),
        ];
        let _ = count_calls::<i32>(&fast_policy(3), results).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_is_network_error() {
        let policy = RetryPolicy {
            attempt_timeout: Some(Duration::from_millis(50)),
            ..fast_policy(2)
        };
        let calls = Arc::new(AtomicU32::new(0));
        let outcome: Result<()> = retry_with_backoff(&policy, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            }
        })
        .await;

        assert!(matches!(outcome, Err(BlinkError::Network(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_call_cancels_pending_retry() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(60),
            ..fast_policy(3)
        };
        let calls = Arc::new(AtomicU32::new(0));
        let call = retry_with_backoff(&policy, || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(BlinkError::Network("reset".to_owned()))
            }
        });

        let outcome = tokio::time::timeout(Duration::from_secs(1), call).await;
        assert!(outcome.is_err());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let (outcome, calls) = count_calls(&fast_policy(0), vec![Ok(1)]).await;
        assert_eq!(outcome.unwrap(), 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retryable(&BlinkError::Http { status, message: String::new() }));
        }
        for status in [400, 401, 403, 404, 409, 422] {
            assert!(!is_retryable(&BlinkError::Http { status, message: String::new() }));
        }
    }
}
