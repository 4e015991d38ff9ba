//! Error types for cleaning operations.

use polars::prelude::PolarsError;
use survey_model::ColumnType;
use thiserror::Error;

/// Errors raised while cleaning a survey table.
///
/// Every variant except [`CleanError::TypeInferenceInconsistent`] aborts the
/// dataset being cleaned. The inconsistency variant is normally carried as a
/// note in the clean report and only becomes fatal under strict inference.
#[derive(Debug, Error)]
pub enum CleanError {
    /// An operation referenced a column the table does not have.
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// A number column has rows but no value to average.
    #[error("mean of number column '{column}' is undefined: every value is missing")]
    UndefinedMean { column: String },

    /// A value matched a type pattern but could not be converted.
    #[error("cannot convert '{value}' in column '{column}' to {target}")]
    TypeConversion {
        column: String,
        value: String,
        target: ColumnType,
    },

    /// A numeric-only operation was pointed at a non-number column.
    #[error("column '{column}' is {actual}, expected number")]
    NotNumeric { column: String, actual: ColumnType },

    /// Only part of a column matched a type pattern; it was kept as text.
    #[error(
        "column '{column}' kept as text: {matched} of {candidates} values look like {candidate}"
    )]
    TypeInferenceInconsistent {
        column: String,
        candidate: ColumnType,
        matched: usize,
        candidates: usize,
    },

    /// A configured NA marker is not a valid regular expression.
    #[error("invalid NA marker pattern '{pattern}': {source}")]
    InvalidMarker {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The type schema and the table columns disagree.
    #[error("schema of table '{table}' does not match its columns: {message}")]
    SchemaMismatch { table: String, message: String },

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, CleanError>;
