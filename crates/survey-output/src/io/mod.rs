//! Reading and writing persisted tables.

mod read;
mod write;

use std::path::{Path, PathBuf};

pub use read::read_table;
pub use write::write_table;

/// Schema sidecar location for a data file: same path, `json` extension.
pub fn schema_path_for(data_path: &Path) -> PathBuf {
    data_path.with_extension("json")
}
