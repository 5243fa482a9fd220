//! Job submission: one combination in, one classifier handle out.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::Result;
use crate::service::TrainingService;
use crate::telemetry;
use crate::types::{Classifier, Combination, TrainingRequest};

/// Builds training requests and hands them to the service.
///
/// Errors are returned as-is; retrying a submission is the caller's call.
#[derive(Clone)]
pub struct JobSubmitter {
    service: Arc<dyn TrainingService>,
    base_dir: PathBuf,
    negative_tokens: Vec<String>,
}

impl JobSubmitter {
    pub fn new(
        service: Arc<dyn TrainingService>,
        base_dir: impl Into<PathBuf>,
        negative_tokens: Vec<String>,
    ) -> Self {
        Self {
            service,
            base_dir: base_dir.into(),
            negative_tokens,
        }
    }

    /// The request `submit` would send for `combination`.
    pub fn request_for(&self, combination: &Combination) -> Result<TrainingRequest> {
        TrainingRequest::from_combination(combination, &self.base_dir, &self.negative_tokens)
    }

    /// Submit `combination` for training and return the new classifier.
    pub async fn submit(&self, combination: &Combination) -> Result<Classifier> {
        let request = self.request_for(combination)?;
        let classifier = self.service.create_classifier(&request).await?;

        metrics::counter!(telemetry::JOBS_SUBMITTED_TOTAL,
            "category" => combination.category.clone(),
        )
        .increment(1);
        info!(
            name = %request.name,
            classifier_id = %classifier.classifier_id,
            status = %classifier.status,
            "classifier submitted"
        );
        Ok(classifier)
    }
}
