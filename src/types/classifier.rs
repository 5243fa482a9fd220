//! Classifier records as reported by the training service.

use serde::{Deserialize, Serialize};

/// Training status of a remote classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierStatus {
    /// Training in progress.
    Training,
    /// Retraining after an update.
    Retraining,
    /// Trained and usable.
    Ready,
    /// Training failed; see the classifier's `explanation`.
    Failed,
    /// Any status this crate does not recognise. Treated as non-terminal.
    #[serde(other)]
    Unknown,
}

impl ClassifierStatus {
    /// `ready` and `failed` end polling.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Retraining => "retraining",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ClassifierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One class a classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierClass {
    #[serde(rename = "class")]
    pub name: String,
}

/// A classifier (training job) handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    pub classifier_id: String,
    pub name: String,
    pub status: ClassifierStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Service-provided reason, populated when training failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassifierClass>,
}

impl Classifier {
    /// Minimal handle with only id, name and status set.
    pub fn new(
        classifier_id: impl Into<String>,
        name: impl Into<String>,
        status: ClassifierStatus,
    ) -> Self {
        Self {
            classifier_id: classifier_id.into(),
            name: name.into(),
            status,
            owner: None,
            created: None,
            explanation: None,
            classes: Vec::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}
