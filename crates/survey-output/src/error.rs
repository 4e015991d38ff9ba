//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::fmt;
use std::path::PathBuf;

use survey_model::ColumnType;
use survey_transform::CleanError;
use thiserror::Error;

/// Which half of a persisted table a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Data,
    Schema,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Data => "data file",
            Self::Schema => "schema file",
        })
    }
}

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The cleaned table or its schema has not been written yet.
    #[error("{artifact} not found: {path} (data must be cleaned first)")]
    MissingPersistedArtifact { artifact: Artifact, path: PathBuf },

    /// The data header and the schema name different columns.
    #[error("{path} does not match its schema: {message}")]
    SchemaMismatch { path: PathBuf, message: String },

    /// A cell could not be decoded as its declared type.
    #[error("cannot decode '{value}' as {expected} in column '{column}', row {row} of {path}")]
    Decode {
        path: PathBuf,
        column: String,
        row: usize,
        value: String,
        expected: ColumnType,
    },

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete write of {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited data.
    #[error("CSV error in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed or unwritable schema file.
    #[error("invalid schema file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The decoded columns could not be assembled into a table.
    #[error(transparent)]
    Frame(#[from] CleanError),
}

impl PersistError {
    /// True for the "clean first" condition.
    pub fn is_missing_artifact(&self) -> bool {
        matches!(self, Self::MissingPersistedArtifact { .. })
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingPersistedArtifact { artifact, path } => format!(
                "The cleaned {} at {} does not exist. The data must be cleaned first.",
                artifact,
                path.display()
            ),
            Self::SchemaMismatch { path, message } => format!(
                "The cleaned table at {} does not agree with its schema: {}",
                path.display(),
                message
            ),
            Self::Decode {
                column,
                row,
                value,
                expected,
                ..
            } => format!(
                "Value '{}' in column '{}' (row {}) is not a valid {}.",
                value, column, row, expected
            ),
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Csv { path, source } => {
                format!("The file at {} is not valid CSV: {}", path.display(), source)
            }
            Self::Json { path, source } => {
                format!("The schema at {} is not valid: {}", path.display(), source)
            }
            Self::Frame(err) => format!("The cleaned table could not be rebuilt: {err}"),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingPersistedArtifact { .. } => {
                Some("Run `survey-clean clean` before reporting.".into())
            }
            Self::SchemaMismatch { .. } | Self::Decode { .. } | Self::Json { .. } => Some(
                "The cleaned files were edited or written by another tool; run `survey-clean clean` again."
                    .into(),
            ),
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try writing to a different location.".into())
            }
            Self::Csv { .. } | Self::Frame(_) => None,
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_mentions_cleaning() {
        let err = PersistError::MissingPersistedArtifact {
            artifact: Artifact::Schema,
            path: PathBuf::from("data/clean/demographics.json"),
        };
        assert!(err.is_missing_artifact());
        assert!(err.to_string().contains("must be cleaned first"));
        assert!(err.user_message().contains("schema file"));
        assert!(err.suggestion().unwrap().contains("survey-clean clean"));
    }

    #[test]
    fn io_suggestion_depends_on_operation() {
        let read = PersistError::Io {
            operation: "read",
            path: PathBuf::from("x"),
            source: std::io::Error::other("denied"),
        };
        assert!(read.suggestion().unwrap().contains("read"));
        assert!(!read.is_missing_artifact());
    }
}
