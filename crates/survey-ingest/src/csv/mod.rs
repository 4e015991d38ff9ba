//! CSV reading utilities.

mod header;
mod reader;

pub use header::normalize_header;
pub use reader::{IngestOptions, read_raw_csv, validate_encoding};
