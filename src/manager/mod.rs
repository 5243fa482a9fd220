//! The classifier manager: scanning, training and caching in one place.

mod builder;

pub use builder::ClassifierManagerBuilder;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::Result;
use crate::cache::ClassifierCache;
use crate::pipeline::{Orchestrator, combinations};
use crate::service::TrainingService;
use crate::types::{Combination, ResultSet, SampleCategory, scan_categories};

/// Entry point tying the pipeline to a sample directory and a cache file.
///
/// ```rust,no_run
/// use mimir::ClassifierManager;
///
/// #[tokio::main]
/// async fn main() -> mimir::Result<()> {
///     let manager = ClassifierManager::builder()
///         .api_key("your-api-key")
///         .base_dir("public/images/bundles")
///         .build()?;
///
///     let classifiers = manager.get_classifiers().await?;
///     println!("{} classifiers", classifiers.len());
///     Ok(())
/// }
/// ```
pub struct ClassifierManager {
    service: Arc<dyn TrainingService>,
    base_dir: PathBuf,
    min_tags: usize,
    orchestrator: Orchestrator,
    cache: ClassifierCache,
}

impl ClassifierManager {
    pub fn builder() -> ClassifierManagerBuilder {
        ClassifierManagerBuilder::new()
    }

    pub fn service(&self) -> &Arc<dyn TrainingService> {
        &self.service
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn cache(&self) -> &ClassifierCache {
        &self.cache
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Categories found under the base directory.
    pub fn categories(&self) -> Result<Vec<SampleCategory>> {
        scan_categories(&self.base_dir)
    }

    /// Every combination the sample directory yields.
    pub fn combinations(&self) -> Result<Vec<Combination>> {
        let categories = self.categories()?;
        let combinations = combinations::generate(&categories, self.min_tags);
        info!(
            categories = categories.len(),
            combinations = combinations.len(),
            min_tags = self.min_tags,
            "computed label combinations"
        );
        Ok(combinations)
    }

    /// Train the given combinations. Does not touch the cache.
    pub async fn create_classifiers(&self, combinations: Vec<Combination>) -> Result<ResultSet> {
        self.orchestrator.run(combinations).await
    }

    /// Train every combination in the sample directory. Does not touch the cache.
    pub async fn create_all(&self) -> Result<ResultSet> {
        let combinations = self.combinations()?;
        self.create_classifiers(combinations).await
    }

    /// Cached results if present, otherwise train everything and cache it.
    pub async fn get_classifiers(&self) -> Result<ResultSet> {
        self.cache.get_or_create(|| self.create_all()).await
    }

    /// Train everything and overwrite the cache with the results.
    pub async fn train_and_persist(&self) -> Result<ResultSet> {
        let results = self.create_all().await?;
        self.cache.save(&results)?;
        Ok(results)
    }
}
