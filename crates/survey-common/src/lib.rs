//! Shared utilities for survey cleaning crates.
//!
//! Small helpers for Polars frames and for number text, used by the
//! transform, output and CLI crates.

pub mod numeric;
pub mod polars;

pub use crate::numeric::{format_numeric, parse_f64};
pub use crate::polars::column_names;
