//! Class label table.
//!
//! A fixed, ordered sequence of label strings indexed by class id. The table
//! is loaded once at startup (usually from text embedded in the binary) and
//! is immutable afterwards.

use crate::core::ClassifyError;
use std::path::Path;

/// Immutable mapping from class ids to human-readable labels.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Parses a label table from text, one label per line.
    ///
    /// Surrounding whitespace is trimmed; blank lines are skipped so that a
    /// trailing newline does not produce a phantom class.
    pub fn parse(content: &str) -> Self {
        let labels = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { labels }
    }

    /// Reads a label table from a file, one label per line.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidInput` if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, ClassifyError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::invalid_input(format!(
                "Failed to read label table from '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::parse(&content))
    }

    /// Builds a table from an already-ordered list of labels.
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Returns the label for a class id, if the id is in range.
    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.labels.get(class_id).map(String::as_str)
    }

    /// Returns the label for a class id, or an `Unknown(id)` placeholder for
    /// ids outside the table.
    pub fn name_or_unknown(&self, class_id: usize) -> String {
        self.get(class_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown({})", class_id))
    }

    /// Number of classes in the table.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
