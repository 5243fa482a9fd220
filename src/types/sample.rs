//! Sample categories discovered on disk.
//!
//! The layout is one subdirectory per category under a base directory, each
//! holding `<label>.zip` archives:
//!
//! ```text
//! bundles/
//!   fruit/
//!     apple.zip
//!     banana.zip
//!     non-fruit.zip
//!   dogs/
//!     ...
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{MimirError, Result};

/// File extension of sample archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// A category name plus the labels whose archives it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCategory {
    /// Directory name of the category.
    pub name: String,
    /// Archive file stems, sorted.
    pub labels: Vec<String>,
}

impl SampleCategory {
    /// Create a category from a name and a list of labels.
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

/// Path of the archive for `label` within `category`.
pub fn archive_path(base_dir: &Path, category: &str, label: &str) -> PathBuf {
    base_dir
        .join(category)
        .join(format!("{label}.{ARCHIVE_EXTENSION}"))
}

/// Scan `base_dir` for categories and their sample archives.
///
/// Categories and labels are sorted by name so that combination order and
/// job names do not depend on the platform's directory iteration order.
/// Non-directory entries at the top level and non-`.zip` files inside a
/// category are ignored. A category without archives is still returned
/// (with no labels).
pub fn scan_categories(base_dir: &Path) -> Result<Vec<SampleCategory>> {
    let mut categories = Vec::new();
    for dir in sorted_entries(base_dir)? {
        if !dir.is_dir() {
            continue;
        }
        let Some(name) = file_name(&dir) else {
            continue;
        };

        let labels = sorted_entries(&dir)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ARCHIVE_EXTENSION))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
            .collect();

        categories.push(SampleCategory { name, labels });
    }
    Ok(categories)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let read = std::fs::read_dir(dir).map_err(|e| MimirError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| MimirError::io(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
}
