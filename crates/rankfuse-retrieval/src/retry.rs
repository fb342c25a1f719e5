//! Retry wrapper for ranked sources.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use std::time::Duration;

use rankfuse_core::{Candidate, Error, Result};

use crate::source::RankedSource;

/// Wraps a ranked source with retry logic.
///
/// Only transient failures are retried; configuration errors surface
/// immediately. The wrapper is transparent to the executor, which sees
/// one `RankedSource` either way.
pub struct RetrySource {
    inner: Arc<dyn RankedSource>,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetrySource {
    /// Creates a new retry wrapper with default settings.
    ///
    /// Default settings:
    /// - Max attempts: 3
    /// - Initial delay: 200 milliseconds
    /// - Max delay: 2 seconds
    /// - Multiplier: 2.0 (exponential backoff)
    pub fn new(source: Arc<dyn RankedSource>) -> Self {
        Self {
            inner: source,
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }

    /// Sets the maximum number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the initial delay between retries.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Determines if an error should be retried.
    fn should_retry(error: &Error) -> bool {
        error.is_retryable()
    }
}

#[async_trait]
impl RankedSource for RetrySource {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<Candidate>> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts as usize);

        let source = self.inner.clone();

        (|| async { source.retrieve(query, limit).await })
            .retry(backoff)
            .when(Self::should_retry)
            .notify(|err, dur| {
                log::warn!(
                    "retrying source '{}' after {:?}: {err}",
                    source.name(),
                    dur
                );
            })
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then succeeds with one candidate.
    struct FlakySource {
        failures: u32,
        calls: AtomicU32,
        error_is_retryable: bool,
    }

    impl FlakySource {
        fn new(failures: u32, error_is_retryable: bool) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                error_is_retryable,
            }
        }
    }

    #[async_trait]
    impl RankedSource for FlakySource {
        async fn retrieve(&self, _query: &str, _limit: usize) -> Result<Vec<Candidate>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                if self.error_is_retryable {
                    Err(Error::retrieval("flaky", "transient"))
                } else {
                    Err(Error::config("permanent"))
                }
            } else {
                Ok(vec![Candidate::new("doc", 0)])
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let flaky = Arc::new(FlakySource::new(2, true));
        let retry = RetrySource::new(flaky.clone())
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5));

        let candidates = retry.retrieve("q", 10).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_config_errors_are_not_retried() {
        let flaky = Arc::new(FlakySource::new(1, false));
        let retry = RetrySource::new(flaky.clone()).with_initial_delay(Duration::from_millis(1));

        let err = retry.retrieve("q", 10).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_error() {
        let flaky = Arc::new(FlakySource::new(u32::MAX, true));
        let retry = RetrySource::new(flaky.clone())
            .with_max_attempts(2)
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2));

        let err = retry.retrieve("q", 10).await.unwrap_err();
        assert_eq!(err.source_name(), Some("flaky"));
        // 1 initial call + 2 retries.
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retry_source_builder() {
        let flaky = Arc::new(FlakySource::new(0, true));
        let retry = RetrySource::new(flaky)
            .with_max_attempts(5)
            .with_initial_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(30));

        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_delay, Duration::from_millis(500));
        assert_eq!(retry.max_delay, Duration::from_secs(30));
        assert_eq!(retry.name(), "flaky");
    }
}
