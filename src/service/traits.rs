//! The training service seam.
//!
//! Everything that talks to the remote service goes through
//! [`TrainingService`], so the pipeline can run against the HTTP client,
//! a retrying decorator, or an in-process fake in tests.

use async_trait::async_trait;

use crate::Result;
use crate::types::{Classifier, TrainingRequest};

/// Remote classifier-training operations.
///
/// Implementations map HTTP 404 on [`get_classifier`](Self::get_classifier)
/// to [`MimirError::ClassifierNotFound`](crate::MimirError::ClassifierNotFound);
/// the poller relies on that to recognise the post-creation race.
#[async_trait]
pub trait TrainingService: Send + Sync {
    /// Service name for logging/metrics.
    fn name(&self) -> &str;

    /// Upload the request's archives and start training.
    ///
    /// Returns the new classifier with its initial status.
    async fn create_classifier(&self, request: &TrainingRequest) -> Result<Classifier>;

    /// Fetch the current state of a classifier.
    async fn get_classifier(&self, classifier_id: &str) -> Result<Classifier>;

    /// List classifiers owned by the caller.
    async fn list_classifiers(&self) -> Result<Vec<Classifier>>;

    /// Delete a classifier.
    async fn delete_classifier(&self, classifier_id: &str) -> Result<()>;
}
