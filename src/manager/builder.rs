//! Builder for configuring classifier managers

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::ClassifierManager;
use crate::cache::{ClassifierCache, DEFAULT_CACHE_FILE};
use crate::config::{Config, DEFAULT_BASE_DIR};
use crate::pipeline::combinations::DEFAULT_MIN_TAGS;
use crate::pipeline::poller::DEFAULT_POLL_INTERVAL;
use crate::pipeline::{
    CompletionPoller, FailurePolicy, JobSubmitter, Orchestrator, OrchestratorConfig,
};
use crate::service::visual_recognition::{DEFAULT_BASE_URL, DEFAULT_VERSION_DATE};
use crate::service::{
    RetryConfig, RetryingTrainingService, TrainingService, VisualRecognitionClient,
};
use crate::types::DEFAULT_NEGATIVE_TOKENS;
use crate::{MimirError, Result};

/// Builder for [`ClassifierManager`].
///
/// Either supply a ready [`TrainingService`] with
/// [`service()`](Self::service), or an API key from which a
/// [`VisualRecognitionClient`] is built.
pub struct ClassifierManagerBuilder {
    service: Option<Arc<dyn TrainingService>>,
    api_key: Option<String>,
    base_url: String,
    version_date: String,
    timeout: Duration,
    retry: RetryConfig,
    base_dir: PathBuf,
    min_tags: usize,
    negative_tokens: Vec<String>,
    poll_interval: Duration,
    orchestrator: OrchestratorConfig,
    cache_path: PathBuf,
}

impl ClassifierManagerBuilder {
    pub fn new() -> Self {
        Self {
            service: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            version_date: DEFAULT_VERSION_DATE.to_string(),
            timeout: Duration::from_secs(300),
            retry: RetryConfig::disabled(),
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            min_tags: DEFAULT_MIN_TAGS,
            negative_tokens: DEFAULT_NEGATIVE_TOKENS.iter().map(|t| t.to_string()).collect(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            orchestrator: OrchestratorConfig::default(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
        }
    }

    /// Seed every setting from a loaded [`Config`].
    ///
    /// The API key still has to be supplied separately.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .base_url(&config.service.url)
            .version_date(&config.service.version_date)
            .timeout(Duration::from_secs(config.service.timeout_secs))
            .retry((&config.retry).into())
            .base_dir(&config.samples.base_dir)
            .min_tags(config.samples.min_tags)
            .negative_tokens(config.samples.negative_tokens.clone())
            .poll_interval(config.training.poll_interval())
            .orchestrator(config.training.orchestrator())
            .cache_path(&config.cache.path)
    }

    /// Use an existing service (takes precedence over the API key).
    pub fn service(mut self, service: Arc<dyn TrainingService>) -> Self {
        self.service = Some(service);
        self
    }

    /// API key for the Visual Recognition client.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn version_date(mut self, date: impl Into<String>) -> Self {
        self.version_date = date.into();
        self
    }

    /// Per-request timeout for the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Transport retry for service calls (disabled by default).
    ///
    /// Applied to both built and supplied services.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Directory containing one folder of archives per category.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Labels per classifier.
    pub fn min_tags(mut self, n: usize) -> Self {
        self.min_tags = n;
        self
    }

    pub fn negative_tokens(mut self, tokens: Vec<String>) -> Self {
        self.negative_tokens = tokens;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn orchestrator(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator = config;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.orchestrator.concurrency = n;
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.orchestrator.cooldown = cooldown;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.orchestrator.failure_policy = policy;
        self
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Build the manager.
    pub fn build(self) -> Result<ClassifierManager> {
        if self.min_tags == 0 {
            return Err(MimirError::Configuration(
                "min_tags must be at least 1".to_string(),
            ));
        }

        let service: Arc<dyn TrainingService> = match (self.service, self.api_key) {
            (Some(service), _) => service,
            (None, Some(api_key)) => Arc::new(VisualRecognitionClient::with_options(
                api_key,
                self.base_url,
                self.version_date,
                self.timeout,
            )?),
            (None, None) => {
                return Err(MimirError::Configuration(
                    "no training service or API key configured".to_string(),
                ));
            }
        };

        let service: Arc<dyn TrainingService> = if self.retry.is_enabled() {
            Arc::new(RetryingTrainingService::new(service, self.retry))
        } else {
            service
        };

        let submitter =
            JobSubmitter::new(service.clone(), self.base_dir.clone(), self.negative_tokens);
        let poller = CompletionPoller::new(service.clone(), self.poll_interval);

        Ok(ClassifierManager {
            service,
            base_dir: self.base_dir,
            min_tags: self.min_tags,
            orchestrator: Orchestrator::new(submitter, poller, self.orchestrator),
            cache: ClassifierCache::new(self.cache_path),
        })
    }
}

impl Default for ClassifierManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
