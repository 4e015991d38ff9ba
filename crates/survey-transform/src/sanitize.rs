//! Row and value sanitization.
//!
//! Every function here is pure: it reads the given frame and returns a new
//! one together with whatever count the caller needs for reporting.

use std::collections::BTreeSet;

use survey_model::{CellValue, ColumnType, date_to_epoch_days};
use tracing::{debug, warn};

use crate::data_utils::is_divider_label;
use crate::error::{CleanError, Result};
use crate::frame::SurveyFrame;

/// Suffix marking a percentage column.
pub const PERCENT_SUFFIX: &str = "Percent";

/// Lower and upper bound of a valid percentage, inclusive.
pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Totally ordered form of a cell for row identity. Numbers compare bitwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyCell {
    Missing,
    Text(String),
    Number(u64),
    Date(i32),
}

impl From<&CellValue> for KeyCell {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Missing => Self::Missing,
            CellValue::Text(value) => Self::Text(value.clone()),
            CellValue::Number(value) => Self::Number(value.to_bits()),
            CellValue::Date(date) => Self::Date(date_to_epoch_days(*date)),
        }
    }
}

fn all_columns(frame: &SurveyFrame) -> Result<Vec<Vec<CellValue>>> {
    frame
        .column_names()
        .iter()
        .map(|column| frame.cells(column))
        .collect()
}

/// Keep flags marking the first occurrence of every distinct row.
fn first_occurrences(frame: &SurveyFrame) -> Result<Vec<bool>> {
    let columns = all_columns(frame)?;
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(frame.height());
    for idx in 0..frame.height() {
        let key: Vec<KeyCell> = columns.iter().map(|cells| KeyCell::from(&cells[idx])).collect();
        keep.push(seen.insert(key));
    }
    Ok(keep)
}

/// Remove rows identical to an earlier row, keeping the first occurrence.
///
/// Returns the new frame and the number of rows removed.
pub fn deduplicate(frame: &SurveyFrame) -> Result<(SurveyFrame, usize)> {
    let keep = first_occurrences(frame)?;
    let removed = keep.iter().filter(|flag| !**flag).count();
    if removed == 0 {
        return Ok((frame.clone(), 0));
    }
    debug!(table = %frame.name, removed, "duplicate rows removed");
    Ok((frame.retain_rows(&keep)?, removed))
}

/// Number of rows identical to an earlier row.
pub fn count_duplicate_rows(frame: &SurveyFrame) -> Result<usize> {
    Ok(first_occurrences(frame)?
        .iter()
        .filter(|flag| !**flag)
        .count())
}

fn equality_mask(frame: &SurveyFrame, column: &str, target: &CellValue) -> Result<Vec<bool>> {
    Ok(frame
        .cells(column)?
        .iter()
        .map(|cell| cell == target)
        .collect())
}

/// Keep only rows whose `column` equals `target`.
///
/// Equality is type-sensitive: the text `"1"` never equals the number `1`.
pub fn filter_rows_equal(
    frame: &SurveyFrame,
    column: &str,
    target: &CellValue,
) -> Result<SurveyFrame> {
    let keep = equality_mask(frame, column, target)?;
    frame.retain_rows(&keep)
}

/// Drop rows whose `column` equals `target`. Returns the frame and rows dropped.
pub fn drop_rows_equal(
    frame: &SurveyFrame,
    column: &str,
    target: &CellValue,
) -> Result<(SurveyFrame, usize)> {
    let keep: Vec<bool> = equality_mask(frame, column, target)?
        .into_iter()
        .map(|matched| !matched)
        .collect();
    let dropped = keep.iter().filter(|flag| !**flag).count();
    Ok((frame.retain_rows(&keep)?, dropped))
}

/// Remove a column.
pub fn drop_column(frame: &SurveyFrame, column: &str) -> Result<SurveyFrame> {
    frame.without_column(column)
}

/// Drop section divider rows: rows whose label is entirely upper case.
///
/// Missing labels and non-text labels are kept.
pub fn drop_divider_rows(frame: &SurveyFrame, label_column: &str) -> Result<(SurveyFrame, usize)> {
    let keep: Vec<bool> = frame
        .cells(label_column)?
        .iter()
        .map(|cell| !cell.as_str().is_some_and(is_divider_label))
        .collect();
    let dropped = keep.iter().filter(|flag| !**flag).count();
    debug!(table = %frame.name, column = label_column, dropped, "divider rows dropped");
    Ok((frame.retain_rows(&keep)?, dropped))
}

/// Whether a column name designates a percentage.
pub fn is_percent_column(name: &str) -> bool {
    name.ends_with(PERCENT_SUFFIX)
}

/// Names of the number columns holding percentages, in table order.
pub fn percent_columns(frame: &SurveyFrame) -> Vec<String> {
    frame
        .typed_columns()
        .into_iter()
        .filter(|(name, ty)| *ty == ColumnType::Number && is_percent_column(name))
        .map(|(name, _)| name)
        .collect()
}

fn out_of_range(value: f64) -> bool {
    !(PERCENT_RANGE.0..=PERCENT_RANGE.1).contains(&value)
}

/// Number of percent cells outside `[0, 100]`.
pub fn count_invalid_percents(frame: &SurveyFrame) -> Result<usize> {
    let mut invalid = 0;
    for column in percent_columns(frame) {
        invalid += frame
            .cells(&column)?
            .iter()
            .filter(|cell| cell.as_f64().is_some_and(out_of_range))
            .count();
    }
    Ok(invalid)
}

/// Replace out-of-range values in one percent column.
///
/// Fails with [`CleanError::NotNumeric`] when the column is not a number column.
pub fn repair_percent_column(
    frame: &SurveyFrame,
    column: &str,
    replacement: f64,
) -> Result<(SurveyFrame, usize)> {
    let column_type = frame.require_column(column)?;
    if column_type != ColumnType::Number {
        return Err(CleanError::NotNumeric {
            column: column.to_string(),
            actual: column_type,
        });
    }
    let mut cells = frame.cells(column)?;
    let mut repaired = 0usize;
    for cell in &mut cells {
        if cell.as_f64().is_some_and(out_of_range) {
            *cell = CellValue::Number(replacement);
            repaired += 1;
        }
    }
    let mut result = frame.clone();
    if repaired > 0 {
        result.replace_column(column, ColumnType::Number, &cells)?;
    }
    Ok((result, repaired))
}

/// Replace out-of-range values in every percent column in one pass.
///
/// Returns the repaired frame and the number of cells replaced. Percent
/// columns that did not resolve to numbers are skipped with a warning.
pub fn repair_percent_columns(frame: &SurveyFrame, replacement: f64) -> Result<(SurveyFrame, usize)> {
    for (name, ty) in frame.typed_columns() {
        if is_percent_column(&name) && ty != ColumnType::Number {
            warn!(table = %frame.name, column = %name, column_type = %ty, "percent column is not numeric; skipped");
        }
    }
    let mut result = frame.clone();
    let mut repaired = 0usize;
    for column in percent_columns(frame) {
        let (next, count) = repair_percent_column(&result, &column, replacement)?;
        result = next;
        repaired += count;
    }
    Ok((result, repaired))
}
