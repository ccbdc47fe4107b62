//! Shared provider traits for dependency injection.
//!
//! Waiting between retries goes through [`Sleeper`] so tests can observe and
//! skip backoff delays without touching the real clock.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the current task for a duration.
///
/// # Example
///
/// ```ignore
/// use copysmith::providers::{Sleeper, TokioSleeper};
/// use std::time::Duration;
///
/// // Production code waits on the tokio timer
/// TokioSleeper.sleep(Duration::from_secs(1)).await;
/// ```
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Returns immediately and remembers every requested delay.
    #[derive(Clone, Default)]
    pub struct RecordingSleeper {
        pub sleeps: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingSleeper {
        pub fn recorded(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSleeper;
    use super::*;

    #[tokio::test]
    async fn test_recording_sleeper_records_without_waiting() {
        let sleeper = RecordingSleeper::default();
        sleeper.sleep(Duration::from_secs(3600)).await;
        sleeper.sleep(Duration::from_secs(2)).await;
        assert_eq!(
            sleeper.recorded(),
            vec![Duration::from_secs(3600), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_tokio_sleeper_waits() {
        let start = std::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(10)).await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
