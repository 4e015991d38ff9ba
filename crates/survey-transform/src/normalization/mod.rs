//! Cell normalization for survey tables.
//!
//! This module provides the two cell-level cleanups:
//! - **markers**: source-specific "not applicable" markers mapped to missing
//! - **text**: whitespace and quote trimming of text columns

pub mod markers;
pub mod text;

// Re-export commonly used items
pub use markers::{NaMarkers, replace_na_markers};
pub use text::trim_text_columns;
