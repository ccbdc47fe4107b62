//! Retry policy for calls to the completion API.
//!
//! The policy owns the attempt loop: how many times to try, how long to wait
//! between attempts and how long a single attempt may run. Callers hand it an
//! async operation and get back either the first success or the last error.

use crate::config::Config;
use crate::error::GenerationError;
use crate::providers::Sleeper;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Delay inserted after a failed attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// `base ^ attempt_index` seconds, never more than `cap`.
    Exponential { base: f64, cap: Duration },
    Fixed(Duration),
    None,
}

impl Backoff {
    /// Delay after the failure of attempt `attempt_index` (0-based).
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        match self {
            Backoff::Exponential { base, cap } => {
                let exponent = i32::try_from(attempt_index).unwrap_or(i32::MAX);
                let secs = base.powi(exponent);
                if !secs.is_finite() || secs < 0.0 || secs >= cap.as_secs_f64() {
                    *cap
                } else {
                    Duration::from_secs_f64(secs)
                }
            }
            Backoff::Fixed(delay) => *delay,
            Backoff::None => Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// Upper bound on a single attempt. `None` leaves it to the transport.
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
            attempt_timeout: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Retries without waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Backoff::None)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_retries,
            Backoff::Exponential {
                base: config.retry_delay,
                cap: Duration::from_secs(config.max_retry_delay_secs),
            },
        )
        .with_attempt_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    /// Runs `operation` until it succeeds or the attempts are used up.
    ///
    /// `operation` receives the 0-based attempt index. A policy with
    /// `max_attempts == 0` still makes one attempt.
    pub async fn run<F, Fut, T>(
        &self,
        sleeper: &dyn Sleeper,
        label: &str,
        mut operation: F,
    ) -> Result<T, GenerationError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let outcome = match self.attempt_timeout {
                Some(limit) => match tokio::time::timeout(limit, operation(attempt)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(GenerationError::Timeout(limit)),
                },
                None => operation(attempt).await,
            };

            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        info!("{} succeeded on attempt {}/{}", label, attempt + 1, attempts);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    warn!("{} attempt {}/{} failed: {}", label, attempt + 1, attempts, err);

                    if attempt + 1 >= attempts {
                        error!("All {} attempts failed for {}", attempts, label);
                        return Err(err);
                    }

                    let delay = self.backoff.delay_for(attempt);
                    debug!("Waiting {:?} before retrying {}", delay, label);
                    sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::RecordingSleeper;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn exponential(base: f64, cap_secs: u64) -> Backoff {
        Backoff::Exponential {
            base,
            cap: Duration::from_secs(cap_secs),
        }
    }

    // =========================================================================
    // Backoff
    // =========================================================================

    #[test]
    fn test_exponential_backoff_starts_at_one_second() {
        let backoff = exponential(2.0, 60);
        assert_eq!(backoff.delay_for(0), Duration::from_secs(1));
        assert_eq!(backoff.delay_for(1), Duration::from_secs(2));
        assert_eq!(backoff.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = exponential(10.0, 30);
        assert_eq!(backoff.delay_for(1), Duration::from_secs(10));
        assert_eq!(backoff.delay_for(2), Duration::from_secs(30));
        assert_eq!(backoff.delay_for(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_fixed_and_none_backoff() {
        assert_eq!(
            Backoff::Fixed(Duration::from_millis(250)).delay_for(7),
            Duration::from_millis(250)
        );
        assert_eq!(Backoff::None.delay_for(3), Duration::ZERO);
    }

    #[test]
    fn test_default_policy_matches_config_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, exponential(2.0, 60));
        assert_eq!(policy.attempt_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_mock_mode_keeps_configured_backoff() {
        let config = Config {
            use_mock: true,
            retry_delay: 3.0,
            ..Config::default()
        };
        assert_eq!(RetryPolicy::from_config(&config).backoff, exponential(3.0, 60));
    }

    #[tokio::test]
    async fn test_immediate_policy_never_waits() {
        let sleeper = RecordingSleeper::default();

        let result = RetryPolicy::immediate(3)
            .run(&sleeper, "test", |_| async {
                Err::<(), _>(GenerationError::Transport("down".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(sleeper.recorded(), vec![Duration::ZERO, Duration::ZERO]);
    }

    // =========================================================================
    // run
    // =========================================================================

    #[tokio::test]
    async fn test_run_returns_first_success_without_sleeping() {
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);

        let result = RetryPolicy::new(3, exponential(2.0, 60))
            .run(&sleeper, "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, GenerationError>("done") }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sleeper.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_run_exhausts_attempts_and_returns_last_error() {
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::new(3, exponential(2.0, 60))
            .run(&sleeper, "test", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(GenerationError::Transport(format!("failure {attempt}"))) }
            })
            .await;

        assert_eq!(result, Err(GenerationError::Transport("failure 2".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            sleeper.recorded(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_run_with_zero_attempts_still_tries_once() {
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);

        let _: Result<(), _> = RetryPolicy::immediate(0)
            .run(&sleeper, "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(GenerationError::MalformedResponse("empty".to_string())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_times_out_slow_attempts() {
        let sleeper = RecordingSleeper::default();
        let limit = Duration::from_millis(20);
        let policy = RetryPolicy::immediate(2).with_attempt_timeout(limit);

        let result = policy
            .run(&sleeper, "test", |attempt| async move {
                if attempt == 0 {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                Ok::<_, GenerationError>(attempt)
            })
            .await;

        assert_eq!(result, Ok(1));
        assert_eq!(sleeper.recorded(), vec![Duration::ZERO]);
    }

    #[tokio::test]
    async fn test_run_reports_timeout_when_every_attempt_hangs() {
        let sleeper = RecordingSleeper::default();
        let limit = Duration::from_millis(10);
        let policy = RetryPolicy::immediate(2).with_attempt_timeout(limit);

        let result: Result<(), _> = policy
            .run(&sleeper, "test", |_| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert_eq!(result, Err(GenerationError::Timeout(limit)));
    }
}
