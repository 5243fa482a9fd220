//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//! 4. Built-in defaults
//!
//! Every key is optional. The API key is not part of the config file; see
//! [`Secrets`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::DEFAULT_CACHE_FILE;
use crate::pipeline::combinations::DEFAULT_MIN_TAGS;
use crate::pipeline::orchestrator::{DEFAULT_CONCURRENCY, DEFAULT_COOLDOWN};
use crate::pipeline::poller::DEFAULT_POLL_INTERVAL;
use crate::pipeline::{FailurePolicy, OrchestratorConfig};
use crate::service::RetryConfig;
use crate::service::visual_recognition::{DEFAULT_BASE_URL, DEFAULT_VERSION_DATE};
use crate::types::DEFAULT_NEGATIVE_TOKENS;
use crate::{MimirError, Result};

/// Placeholder used when no API key is configured anywhere.
pub const PLACEHOLDER_API_KEY: &str = "<api-key>";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["VISUAL_RECOGNITION_API_KEY", "API_KEY"];

/// Default directory holding one folder of `.zip` archives per category.
pub const DEFAULT_BASE_DIR: &str = "public/images/bundles";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub samples: SamplesConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Training service endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// API behaviour version date.
    #[serde(default = "default_version_date")]
    pub version_date: String,
    /// Per-request timeout in seconds, uploads included (default: 300).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            version_date: default_version_date(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_version_date() -> String {
    DEFAULT_VERSION_DATE.to_string()
}

fn default_timeout() -> u64 {
    300
}

/// Where sample archives live and how they are combined.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplesConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Labels per classifier (default: 3).
    #[serde(default = "default_min_tags")]
    pub min_tags: usize,
    /// Label substrings that mark negative-example archives.
    #[serde(default = "default_negative_tokens")]
    pub negative_tokens: Vec<String>,
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            min_tags: default_min_tags(),
            negative_tokens: default_negative_tokens(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DIR)
}

fn default_min_tags() -> usize {
    DEFAULT_MIN_TAGS
}

fn default_negative_tokens() -> Vec<String> {
    DEFAULT_NEGATIVE_TOKENS.iter().map(|t| t.to_string()).collect()
}

/// Pacing of the training run.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Delay between status queries in milliseconds (default: 2000).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pause after each job finishes, in seconds (default: 5).
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Jobs in flight at once (default: 1).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub on_job_failure: FailurePolicy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            cooldown_secs: default_cooldown_secs(),
            concurrency: default_concurrency(),
            on_job_failure: FailurePolicy::default(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_cooldown_secs() -> u64 {
    DEFAULT_COOLDOWN.as_secs()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl TrainingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            concurrency: self.concurrency,
            cooldown: Duration::from_secs(self.cooldown_secs),
            failure_policy: self.on_job_failure,
        }
    }
}

/// Result cache location.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

/// Transport-level retry settings. Disabled (one attempt) by default.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        RetryConfig::new()
            .max_attempts(settings.max_attempts)
            .initial_delay(Duration::from_millis(settings.initial_delay_ms))
            .max_delay(Duration::from_millis(settings.max_delay_ms))
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Falls back to defaults when no file is found, except that an
    /// explicit path must exist.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mimir").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/mimir/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

/// Secrets file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Secrets {
    /// Load `~/.mimir/secrets.toml`, which must not be group/world readable.
    ///
    /// Returns empty secrets if the file does not exist (the key may come
    /// from the environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".mimir").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }
        Ok(Secrets::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Reject secrets files with group or other permission bits set.
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(MimirError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key from the secrets file, then the environment, then the placeholder.
    pub fn api_key(&self) -> String {
        resolve_api_key(self.api_key.clone(), |var| std::env::var(var).ok())
    }
}

fn resolve_api_key(from_file: Option<String>, env: impl Fn(&str) -> Option<String>) -> String {
    from_file
        .filter(|k| !k.is_empty())
        .or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .find_map(|var| env(var).filter(|k| !k.is_empty()))
        })
        .unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string())
}
