//! Training requests derived from combinations.

use std::path::{Path, PathBuf};

use super::combination::Combination;
use super::sample::archive_path;
use crate::{MimirError, Result};

/// Label tokens that mark an archive as negative examples by default.
pub const DEFAULT_NEGATIVE_TOKENS: &[&str] = &["negative", "non-fruit"];

/// Form field for the shared negative-examples archive.
pub const NEGATIVE_EXAMPLES_FIELD: &str = "negative_examples";

/// Whether `label` contains any of the negative-indicator `tokens`.
pub fn is_negative_label(label: &str, tokens: &[String]) -> bool {
    tokens
        .iter()
        .any(|token| !token.is_empty() && label.contains(token.as_str()))
}

/// Role an archive plays in a training request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    /// Positive examples for the named class.
    Positive,
    /// Counter-examples shared by every class of the classifier.
    Negative,
}

/// One uploaded archive in a training request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleSlot {
    pub kind: SlotKind,
    pub label: String,
    pub archive: PathBuf,
}

impl ExampleSlot {
    /// Multipart field name: `<label>_positive_examples` or `negative_examples`.
    pub fn field_name(&self) -> String {
        match self.kind {
            SlotKind::Positive => format!("{}_positive_examples", self.label),
            SlotKind::Negative => NEGATIVE_EXAMPLES_FIELD.to_string(),
        }
    }

    /// File name reported for the upload.
    pub fn file_name(&self) -> String {
        self.archive
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{}.zip", self.label))
    }
}

/// A named classifier-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRequest {
    pub name: String,
    pub slots: Vec<ExampleSlot>,
}

impl TrainingRequest {
    /// Build the request for `combination`, resolving archives under `base_dir`.
    ///
    /// Labels matching a negative token go to the single negative slot. A
    /// combination with more than one such label is rejected, since the
    /// service accepts only one negative archive per classifier.
    pub fn from_combination(
        combination: &Combination,
        base_dir: &Path,
        negative_tokens: &[String],
    ) -> Result<Self> {
        let mut slots = Vec::with_capacity(combination.labels.len());
        let mut negative: Option<&str> = None;

        for label in &combination.labels {
            let kind = if is_negative_label(label, negative_tokens) {
                if let Some(previous) = negative {
                    return Err(MimirError::InvalidInput(format!(
                        "combination {combination} has more than one negative label \
                         ({previous}, {label})"
                    )));
                }
                negative = Some(label);
                SlotKind::Negative
            } else {
                SlotKind::Positive
            };
            slots.push(ExampleSlot {
                kind,
                label: label.clone(),
                archive: archive_path(base_dir, &combination.category, label),
            });
        }

        Ok(Self {
            name: combination.name(),
            slots,
        })
    }

    /// The negative-examples slot, if any.
    pub fn negative_slot(&self) -> Option<&ExampleSlot> {
        self.slots.iter().find(|s| s.kind == SlotKind::Negative)
    }

    /// Positive-example slots, in label order.
    pub fn positive_slots(&self) -> impl Iterator<Item = &ExampleSlot> {
        self.slots.iter().filter(|s| s.kind == SlotKind::Positive)
    }
}
