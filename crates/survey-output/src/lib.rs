//! Typed persistence for cleaned survey tables.
//!
//! A table is stored as two files sharing a base name: the CSV data, which
//! carries no type information, and a JSON schema sidecar mapping each column
//! to its type tag:
//!
//! ```text
//! data/clean/anxiety_trends.csv   Group,Phase,Time Period Start Date,Value
//! data/clean/anxiety_trends.json  {"Group": "text", "Value": "number", ...}
//! ```
//!
//! Reading requires both files and applies the schema instead of inferring
//! types, so `read_table(write_table(t))` reproduces `t` exactly.

pub mod error;
pub mod format;
pub mod io;

pub use error::{Artifact, PersistError, Result};
pub use io::{read_table, schema_path_for, write_table};
