//! Missing-value imputation.
//!
//! Number columns are filled with their own mean first; whatever is still
//! missing afterwards gets the `-1` sentinel of its column type.

use survey_model::{CellValue, ColumnType};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::frame::SurveyFrame;

/// Mean of the non-missing values, or `None` when there are none.
fn mean_of(cells: &[CellValue]) -> Option<f64> {
    let (sum, count) = cells
        .iter()
        .filter_map(CellValue::as_f64)
        .fold((0.0f64, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Replace missing cells of every number column with that column's mean.
///
/// Returns the new frame and the number of cells filled. A number column that
/// has rows but no values fails with [`CleanError::UndefinedMean`].
pub fn impute_numeric_means(frame: &SurveyFrame) -> Result<(SurveyFrame, usize)> {
    let mut result = frame.clone();
    let mut filled = 0usize;
    for column in frame.schema.columns_of(ColumnType::Number) {
        let mut cells = frame.cells(column)?;
        let gaps = cells.iter().filter(|cell| cell.is_missing()).count();
        if gaps == 0 {
            continue;
        }
        let mean = mean_of(&cells).ok_or_else(|| CleanError::UndefinedMean {
            column: column.to_string(),
        })?;
        for cell in &mut cells {
            if cell.is_missing() {
                *cell = CellValue::Number(mean);
            }
        }
        debug!(column, gaps, mean, "imputed column mean");
        result.replace_column(column, ColumnType::Number, &cells)?;
        filled += gaps;
    }
    Ok((result, filled))
}

/// Replace every remaining missing cell with the sentinel of its column type.
///
/// Non-missing cells are never altered. Returns the new frame and the number
/// of cells filled.
pub fn fill_missing(frame: &SurveyFrame) -> Result<(SurveyFrame, usize)> {
    let mut result = frame.clone();
    let mut filled = 0usize;
    for (column, column_type) in frame.typed_columns() {
        if frame.data.column(&column)?.null_count() == 0 {
            continue;
        }
        let sentinel = CellValue::sentinel_for(column_type);
        let mut cells = frame.cells(&column)?;
        for cell in &mut cells {
            if cell.is_missing() {
                *cell = sentinel.clone();
                filled += 1;
            }
        }
        result.replace_column(&column, column_type, &cells)?;
    }
    Ok((result, filled))
}

/// Number of missing cells in the whole table.
pub fn count_missing(frame: &SurveyFrame) -> usize {
    frame.missing_count()
}
