//! Terminal job outcomes and the persisted result set.

use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, ClassifierStatus};
use super::combination::Combination;

/// How a training job ended.
///
/// A failed job is an outcome, not an error: the service's details stay
/// inspectable on the carried [`Classifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Ready(Classifier),
    Failed(Classifier),
}

impl JobOutcome {
    pub fn classifier(&self) -> &Classifier {
        match self {
            JobOutcome::Ready(c) | JobOutcome::Failed(c) => c,
        }
    }

    pub fn into_classifier(self) -> Classifier {
        match self {
            JobOutcome::Ready(c) | JobOutcome::Failed(c) => c,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, JobOutcome::Ready(_))
    }

    /// Failure reason reported by the service, for failed jobs that have one.
    pub fn explanation(&self) -> Option<&str> {
        match self {
            JobOutcome::Failed(c) => c.explanation.as_deref(),
            JobOutcome::Ready(_) => None,
        }
    }

    /// Metric label for the outcome.
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Ready(_) => "ready",
            JobOutcome::Failed(_) => "failed",
        }
    }
}

/// One entry of the result set: the combination and its terminal classifier.
///
/// Serialised flat, so each cache entry reads as a classifier record with
/// `category` and `labels` alongside `classifier_id`, `name` and `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub category: String,
    pub labels: Vec<String>,
    #[serde(flatten)]
    pub classifier: Classifier,
}

impl TrainingResult {
    pub fn new(combination: Combination, outcome: JobOutcome) -> Self {
        Self {
            category: combination.category,
            labels: combination.labels,
            classifier: outcome.into_classifier(),
        }
    }

    pub fn combination(&self) -> Combination {
        Combination::new(self.category.clone(), self.labels.iter().cloned())
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.status == ClassifierStatus::Ready
    }

    pub fn is_failed(&self) -> bool {
        self.classifier.status == ClassifierStatus::Failed
    }
}

/// Ordered results of a run, in combination order.
pub type ResultSet = Vec<TrainingResult>;
