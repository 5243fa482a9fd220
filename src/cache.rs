//! Cache gateway for trained classifier results.
//!
//! The cache is a single pretty-printed JSON array of
//! [`TrainingResult`](crate::TrainingResult) records. Presence of the file
//! is the only freshness signal: an existing file is always returned as-is
//! and never refreshed. Delete it (or run `mimir train`) to retrain.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::telemetry;
use crate::types::ResultSet;
use crate::{MimirError, Result};

/// Default cache file name, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "classifiers.json";

/// File-backed store for a [`ResultSet`].
#[derive(Debug, Clone)]
pub struct ClassifierCache {
    path: PathBuf,
}

impl ClassifierCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached result set.
    ///
    /// Returns `Ok(None)` when the file does not exist. An unreadable or
    /// unparsable file is an error, not a miss.
    pub fn load(&self) -> Result<Option<ResultSet>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MimirError::io(&self.path, e)),
        };
        let results = serde_json::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!(
                "corrupt cache file {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(Some(results))
    }

    /// Persist `results` (atomic write via tmp + rename).
    pub fn save(&self, results: &ResultSet) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| MimirError::io(parent, e))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&tmp_path, json).map_err(|e| MimirError::io(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| MimirError::io(&self.path, e))?;
        Ok(())
    }

    /// Return the cached results, or run `create` and persist its output.
    ///
    /// `create` is not invoked on a hit. Its error is returned without
    /// touching the cache file.
    pub async fn get_or_create<F, Fut>(&self, create: F) -> Result<ResultSet>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResultSet>>,
    {
        if let Some(results) = self.load()? {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            info!(path = %self.path.display(), count = results.len(), "loaded cached classifiers");
            return Ok(results);
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        info!(path = %self.path.display(), "no cached classifiers, training");
        let results = create().await?;
        self.save(&results)?;
        info!(path = %self.path.display(), count = results.len(), "saved classifiers to cache");
        Ok(results)
    }
}
