//! Retry configuration, delay calculation, and the service decorator.
//!
//! Provides [`RetryConfig`] for controlling transport-level retries and
//! [`RetryingTrainingService`], which wraps any [`TrainingService`] with
//! automatic retry on transient errors.
//!
//! Managers are built with retries off ([`RetryConfig::disabled()`]).
//! Classifier creation is never retried, even when enabled: a timed-out
//! upload may already have created the classifier remotely. The not-found
//! race during polling is handled by the poller, not here, because `404` is
//! permanent as far as this decorator is concerned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::traits::TrainingService;
use crate::telemetry;
use crate::types::{Classifier, TrainingRequest};
use crate::{MimirError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff:
///
/// ```rust
/// # use mimir::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// assert_eq!(config.delay_for_attempt(1), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 30s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no retry.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Delay before retrying after attempt `attempt` (0-indexed):
    /// `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Like [`delay_for_attempt`](Self::delay_for_attempt), but a
    /// `Retry-After` hint from the service wins.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Execute an async operation, retrying transient errors.
///
/// Permanent errors are returned immediately.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    service_name: &str,
    operation: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts.max(1) {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && attempt + 1 < config.max_attempts => {
                metrics::counter!(telemetry::RETRIES_TOTAL,
                    "service" => service_name.to_owned(),
                    "operation" => operation.to_owned(),
                )
                .increment(1);
                let delay = config.effective_delay(attempt, e.retry_after());
                warn!(
                    service = service_name,
                    operation,
                    attempt = attempt + 1,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or(MimirError::EmptyResponse))
}

/// Decorator that wraps a [`TrainingService`] with retry logic.
///
/// Status queries, listing and deletion retry transient errors (network,
/// 429, 5xx) with exponential backoff up to `config.max_attempts`;
/// everything else, including the not-found race, passes straight through.
/// `create_classifier` is always a single attempt.
pub struct RetryingTrainingService {
    inner: Arc<dyn TrainingService>,
    config: RetryConfig,
}

impl RetryingTrainingService {
    pub fn new(inner: Arc<dyn TrainingService>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl TrainingService for RetryingTrainingService {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn create_classifier(&self, request: &TrainingRequest) -> Result<Classifier> {
        self.inner.create_classifier(request).await
    }

    async fn get_classifier(&self, classifier_id: &str) -> Result<Classifier> {
        with_retry(&self.config, self.inner.name(), "get_classifier", || {
            self.inner.get_classifier(classifier_id)
        })
        .await
    }

    async fn list_classifiers(&self) -> Result<Vec<Classifier>> {
        with_retry(&self.config, self.inner.name(), "list_classifiers", || {
            self.inner.list_classifiers()
        })
        .await
    }

    async fn delete_classifier(&self, classifier_id: &str) -> Result<()> {
        with_retry(&self.config, self.inner.name(), "delete_classifier", || {
            self.inner.delete_classifier(classifier_id)
        })
        .await
    }
}
