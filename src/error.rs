//! Error types for loading the vehicle dataset.

use thiserror::Error;

/// Failures that abort derivation for the current dataset.
///
/// Per-field parse failures are not represented here: an unparseable price or
/// performance value becomes `None` and the row is filtered out.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be located or opened.
    #[error("dataset file '{path}' not found")]
    MissingSourceFile { path: String },

    /// A column needed for derivation is absent from the header row.
    #[error("missing required column '{column}'; available columns: {available:?}")]
    MissingRequiredColumn {
        column: &'static str,
        available: Vec<String>,
    },

    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    /// Returns `true` for the two conditions the caller recovers from by
    /// falling back to an empty dataset.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DatasetError::MissingSourceFile { .. } | DatasetError::MissingRequiredColumn { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message_lists_available() {
        let err = DatasetError::MissingRequiredColumn {
            column: "HorsePower",
            available: vec!["Cars Names".to_string(), "Cars Prices".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'HorsePower'"));
        assert!(msg.contains("Cars Names"));
        assert!(msg.contains("Cars Prices"));
    }

    #[test]
    fn test_recoverable_kinds() {
        let missing = DatasetError::MissingSourceFile {
            path: "nope.csv".to_string(),
        };
        assert!(missing.is_recoverable());

        let io = DatasetError::Io(std::io::Error::other("disk"));
        assert!(!io.is_recoverable());
    }
}
