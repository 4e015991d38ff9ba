//! Error types for report generation.

use survey_model::ColumnType;
use survey_transform::CleanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A column used for grouping or plotting has the wrong type.
    #[error("column '{column}' is {actual}, expected {expected}")]
    WrongType {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    /// The requested group does not occur in the table.
    #[error("group '{group}' not found; available groups: {}", available.join(", "))]
    UnknownGroup {
        group: String,
        available: Vec<String>,
    },

    /// Reading cells from the table failed (including missing columns).
    #[error(transparent)]
    Frame(#[from] CleanError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
