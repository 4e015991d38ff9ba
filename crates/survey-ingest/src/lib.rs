//! Raw survey data ingestion.
//!
//! This crate loads the raw CSV extracts into Polars DataFrames whose columns
//! are all untyped text. Typing happens later, during cleaning.
//!
//! # Features
//!
//! - **CSV Loading**: header normalization, BOM handling, configurable null tokens
//! - **Shape checks**: empty, duplicate and ragged headers/rows are rejected
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use survey_ingest::{IngestOptions, read_raw_csv};
//!
//! let df = read_raw_csv(Path::new("data/raw/dp05.csv"), &IngestOptions::default())?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use crate::csv::{IngestOptions, normalize_header, read_raw_csv, validate_encoding};
