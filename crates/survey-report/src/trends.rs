//! Time series of one group's subgroups, ready for plotting.

use chrono::NaiveDate;
use survey_model::ColumnType;
use survey_transform::SurveyFrame;

use crate::describe::{
    DEFAULT_GROUP_COLUMN, DEFAULT_SUBGROUP_COLUMN, label_column, ordered_labels,
};
use crate::error::{ReportError, Result};

pub const DEFAULT_DATE_COLUMN: &str = "Time Period Start Date";
pub const DEFAULT_VALUE_COLUMN: &str = "Value";
pub const DEFAULT_TREND_GROUP: &str = "By Age";

#[derive(Debug, Clone)]
pub struct TrendOptions {
    pub group_column: String,
    pub subgroup_column: String,
    pub date_column: String,
    pub value_column: String,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
            subgroup_column: DEFAULT_SUBGROUP_COLUMN.to_string(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub subgroup: String,
    /// Ordered by date; rows with equal dates keep table order.
    pub points: Vec<TrendPoint>,
}

fn require_type(frame: &SurveyFrame, column: &str, expected: ColumnType) -> Result<()> {
    let actual = frame.require_column(column)?;
    if actual != expected {
        return Err(ReportError::WrongType {
            column: column.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// One series per subgroup of `group`.
///
/// Rows with the sentinel date or without a value are skipped.
pub fn trend_series(
    frame: &SurveyFrame,
    options: &TrendOptions,
    group: &str,
) -> Result<Vec<TrendSeries>> {
    require_type(frame, &options.date_column, ColumnType::Date)?;
    require_type(frame, &options.value_column, ColumnType::Number)?;
    let groups = label_column(frame, &options.group_column)?;
    let subgroups = label_column(frame, &options.subgroup_column)?;
    let dates = frame.cells(&options.date_column)?;
    let values = frame.cells(&options.value_column)?;

    let rows: Vec<usize> = (0..frame.height())
        .filter(|&row| groups[row].as_deref() == Some(group))
        .collect();
    if rows.is_empty() {
        return Err(ReportError::UnknownGroup {
            group: group.to_string(),
            available: ordered_labels(groups.iter()),
        });
    }

    let series = ordered_labels(rows.iter().map(|&row| &subgroups[row]))
        .into_iter()
        .map(|subgroup| {
            let mut points: Vec<TrendPoint> = rows
                .iter()
                .filter(|&&row| subgroups[row].as_deref() == Some(subgroup.as_str()))
                .filter_map(|&row| {
                    let date = dates[row].as_date().filter(|_| !dates[row].is_sentinel())?;
                    let value = values[row].as_f64()?;
                    Some(TrendPoint { date, value })
                })
                .collect();
            points.sort_by_key(|point| point.date);
            TrendSeries { subgroup, points }
        })
        .collect();
    Ok(series)
}

