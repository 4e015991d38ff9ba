//! Grouped descriptive statistics.
//!
//! Rows are partitioned by a group column and then by a subgroup column, and
//! every number column is summarized within each partition.

use std::collections::BTreeSet;

use survey_model::{CellValue, ColumnType};
use survey_transform::SurveyFrame;

use crate::error::{ReportError, Result};
use crate::stats::{NumericSummary, summarize};

pub const DEFAULT_GROUP_COLUMN: &str = "Group";
pub const DEFAULT_SUBGROUP_COLUMN: &str = "Subgroup";
pub const DEFAULT_EXCLUDED_GROUP: &str = "By State";

/// Which columns partition the rows, and which groups to leave out.
#[derive(Debug, Clone)]
pub struct DescribeOptions {
    pub group_column: String,
    pub subgroup_column: String,
    pub excluded_groups: BTreeSet<String>,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
            subgroup_column: DEFAULT_SUBGROUP_COLUMN.to_string(),
            excluded_groups: BTreeSet::from([DEFAULT_EXCLUDED_GROUP.to_string()]),
        }
    }
}

impl DescribeOptions {
    pub fn excluding<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubgroupDescription {
    pub subgroup: String,
    pub rows: usize,
    /// Number column name to its summary, in table order. Columns with no
    /// values in this subgroup are absent.
    pub columns: Vec<(String, NumericSummary)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDescription {
    pub group: String,
    pub subgroups: Vec<SubgroupDescription>,
}

/// Text value of every row of a grouping column.
pub(crate) fn label_column(frame: &SurveyFrame, column: &str) -> Result<Vec<Option<String>>> {
    let column_type = frame.require_column(column)?;
    if !column_type.is_textual() {
        return Err(ReportError::WrongType {
            column: column.to_string(),
            expected: ColumnType::Text,
            actual: column_type,
        });
    }
    Ok(frame
        .cells(column)?
        .into_iter()
        .map(|cell| match cell {
            CellValue::Text(value) => Some(value),
            _ => None,
        })
        .collect())
}

/// Distinct labels in first-appearance order.
pub(crate) fn ordered_labels<'a>(labels: impl Iterator<Item = &'a Option<String>>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    labels
        .flatten()
        .filter(|label| seen.insert(label.as_str()))
        .cloned()
        .collect()
}

/// Summarize number columns per (group, subgroup), groups and subgroups in
/// first-appearance order.
pub fn describe_groups(
    frame: &SurveyFrame,
    options: &DescribeOptions,
) -> Result<Vec<GroupDescription>> {
    let groups = label_column(frame, &options.group_column)?;
    let subgroups = label_column(frame, &options.subgroup_column)?;

    let mut number_columns = Vec::new();
    for (name, column_type) in frame.typed_columns() {
        if column_type == ColumnType::Number {
            let values: Vec<Option<f64>> =
                frame.cells(&name)?.iter().map(CellValue::as_f64).collect();
            number_columns.push((name, values));
        }
    }

    let mut descriptions = Vec::new();
    for group in ordered_labels(groups.iter()) {
        if options.excluded_groups.contains(&group) {
            continue;
        }
        let in_group: Vec<usize> = (0..frame.height())
            .filter(|&row| groups[row].as_deref() == Some(group.as_str()))
            .collect();

        let mut described = Vec::new();
        for subgroup in ordered_labels(in_group.iter().map(|&row| &subgroups[row])) {
            let rows: Vec<usize> = in_group
                .iter()
                .copied()
                .filter(|&row| subgroups[row].as_deref() == Some(subgroup.as_str()))
                .collect();
            let columns = number_columns
                .iter()
                .filter_map(|(name, values)| {
                    let picked: Vec<f64> = rows.iter().filter_map(|&row| values[row]).collect();
                    summarize(&picked).map(|summary| (name.clone(), summary))
                })
                .collect();
            described.push(SubgroupDescription {
                subgroup,
                rows: rows.len(),
                columns,
            });
        }
        descriptions.push(GroupDescription {
            group,
            subgroups: described,
        });
    }
    Ok(descriptions)
}
