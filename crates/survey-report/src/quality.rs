//! Data-quality profile of a cleaned table.

use chrono::NaiveDate;
use survey_model::{CellValue, ColumnType};
use survey_transform::{SurveyFrame, count_duplicate_rows};
use tracing::debug;

use crate::error::Result;
use crate::stats::{NumericSummary, summarize};

/// Earliest and latest real date of a date column.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
    /// Cells holding the sentinel date, left out of the range.
    pub sentinels: usize,
}

/// Per-column profile, chosen by the column's resolved type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnProfile {
    Number(Option<NumericSummary>),
    Date(DateRange),
    /// Distinct values in first-appearance order.
    Text(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnQuality {
    pub name: String,
    pub column_type: ColumnType,
    pub missing: usize,
    pub profile: ColumnProfile,
}

/// Summary of one table: size, gaps, duplicates and a profile per column.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub dataset: String,
    pub rows: usize,
    pub missing_cells: usize,
    pub duplicate_rows: usize,
    pub columns: Vec<ColumnQuality>,
}

impl QualityReport {
    pub fn column(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Profile every column of `frame`.
pub fn quality_report(frame: &SurveyFrame) -> Result<QualityReport> {
    let mut columns = Vec::with_capacity(frame.width());
    for (name, column_type) in frame.typed_columns() {
        let cells = frame.cells(&name)?;
        let missing = cells.iter().filter(|cell| cell.is_missing()).count();
        let profile = match column_type {
            ColumnType::Number => ColumnProfile::Number(number_profile(&cells)),
            ColumnType::Date => ColumnProfile::Date(date_profile(&cells)),
            ColumnType::Text | ColumnType::RawString => ColumnProfile::Text(distinct_text(&cells)),
        };
        columns.push(ColumnQuality {
            name,
            column_type,
            missing,
            profile,
        });
    }

    let report = QualityReport {
        dataset: frame.name.clone(),
        rows: frame.height(),
        missing_cells: frame.missing_count(),
        duplicate_rows: count_duplicate_rows(frame)?,
        columns,
    };
    debug!(
        dataset = %report.dataset,
        rows = report.rows,
        missing = report.missing_cells,
        duplicates = report.duplicate_rows,
        "Built quality report"
    );
    Ok(report)
}

fn number_profile(cells: &[CellValue]) -> Option<NumericSummary> {
    let values: Vec<f64> = cells.iter().filter_map(CellValue::as_f64).collect();
    summarize(&values)
}

fn date_profile(cells: &[CellValue]) -> DateRange {
    let mut range = DateRange {
        earliest: None,
        latest: None,
        sentinels: 0,
    };
    for cell in cells {
        if cell.is_sentinel() {
            range.sentinels += 1;
            continue;
        }
        if let Some(date) = cell.as_date() {
            range.earliest = Some(range.earliest.map_or(date, |d| d.min(date)));
            range.latest = Some(range.latest.map_or(date, |d| d.max(date)));
        }
    }
    range
}

fn distinct_text(cells: &[CellValue]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    cells
        .iter()
        .filter_map(CellValue::as_str)
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
