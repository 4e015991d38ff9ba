//! Survey table cleaning.
//!
//! This crate turns untyped survey tables into typed, gap-free, deduplicated
//! tables:
//!
//! - **frame**: [`SurveyFrame`], a DataFrame paired with its type schema
//! - **inference**: raw column classification as date, number or text
//! - **normalization**: NA marker mapping and text trimming
//! - **sanitize**: deduplication, row filters, divider rows, percent repair
//! - **impute**: mean imputation and sentinel fill
//! - **dataset**: per-source cleaning strategies
//! - **pipeline**: the ordered stage machine tying it all together

pub mod data_utils;
pub mod dataset;
pub mod error;
pub mod frame;
pub mod frame_builder;
pub mod impute;
pub mod inference;
pub mod normalization;
pub mod pipeline;
pub mod sanitize;

// Re-export common items for external use
pub use dataset::{
    CensusExtractCleaner, DatasetCleanSummary, DatasetCleaner, SymptomSurveyCleaner, cleaner_for,
};
pub use error::{CleanError, Result};
pub use frame::SurveyFrame;
pub use impute::{count_missing, fill_missing, impute_numeric_means};
pub use inference::{Inference, InferenceNote, infer_column_type, resolve_column_types};
pub use normalization::{NaMarkers, replace_na_markers, trim_text_columns};
pub use pipeline::{CleanOutcome, CleanReport, CleanStage, CleaningPipeline};
pub use sanitize::{
    count_duplicate_rows, count_invalid_percents, deduplicate, drop_column, drop_divider_rows,
    drop_rows_equal, filter_rows_equal, percent_columns, repair_percent_column,
    repair_percent_columns,
};
