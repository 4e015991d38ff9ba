//! Survey table data model.
//!
//! Types shared by every stage of the cleaning workspace:
//!
//! - [`ColumnType`] and [`TypeSchema`]: resolved per-column types and the
//!   sidecar schema persisted next to each cleaned table
//! - [`CellValue`]: a single typed cell, including the `-1` sentinel helpers
//! - [`CleanConfig`], [`SourceConfig`], [`DatasetKind`]: which raw sources are
//!   cleaned, where they live, and which dataset-specific step applies

pub mod column;
pub mod error;
pub mod options;
pub mod value;

pub use column::{ColumnType, TypeSchema};
pub use error::{ConfigError, Result};
pub use options::{
    CleanConfig, DatasetKind, SourceConfig, default_na_markers, default_null_values,
};
pub use value::{
    CellValue, SENTINEL_DATE_DAYS, SENTINEL_NUMBER, SENTINEL_TEXT, date_to_epoch_days,
    epoch_days_to_date, sentinel_date,
};
