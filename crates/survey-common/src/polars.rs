//! Polars DataFrame helpers.

use polars::prelude::DataFrame;

/// Column names of `df` as owned strings, in table order.
///
/// # Examples
///
/// ```
/// use polars::prelude::{Column, DataFrame};
/// use survey_common::column_names;
///
/// let df = DataFrame::new(vec![
///     Column::new("Group".into(), ["By Age"]),
///     Column::new("Value".into(), [1.5f64]),
/// ])
/// .unwrap();
/// assert_eq!(column_names(&df), vec!["Group", "Value"]);
/// ```
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_has_no_columns() {
        assert!(column_names(&DataFrame::empty()).is_empty());
    }
}
