use std::path::PathBuf;

use survey_transform::CleanReport;

/// Outcome of `clean` across all selected sources.
#[derive(Debug, Default)]
pub struct CleanRunResult {
    pub clean_dir: PathBuf,
    pub reports: Vec<CleanReport>,
    /// One message per source that failed.
    pub errors: Vec<String>,
}

impl CleanRunResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
