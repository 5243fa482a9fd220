//! Label combinations: the unit of training.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between category and labels in classifier names.
const NAME_SEPARATOR: &str = "_";

/// A category plus one fixed-size subset of its labels.
///
/// Each combination becomes exactly one classifier. Labels keep the order in
/// which they were generated, which makes [`name()`](Self::name) stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
    pub category: String,
    pub labels: Vec<String>,
}

impl Combination {
    pub fn new<I, S>(category: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: category.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Classifier name: category and labels joined with `_`.
    ///
    /// `fruit` + `[apple, banana, pear]` → `fruit_apple_banana_pear`.
    pub fn name(&self) -> String {
        std::iter::once(self.category.as_str())
            .chain(self.labels.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(NAME_SEPARATOR)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
