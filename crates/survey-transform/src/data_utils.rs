//! Cell extraction and string helpers shared by the cleaning steps.

use polars::prelude::{Column, DataType};
use survey_model::{CellValue, ColumnType, epoch_days_to_date};

use crate::error::{CleanError, Result};

/// Read every cell of a column as [`CellValue`]s of the given type.
pub fn column_cells(column: &Column, column_type: ColumnType) -> Result<Vec<CellValue>> {
    let cells = match column_type {
        ColumnType::Text | ColumnType::RawString => column
            .str()?
            .into_iter()
            .map(|value| value.map_or(CellValue::Missing, CellValue::text))
            .collect(),
        ColumnType::Number => column
            .f64()?
            .into_iter()
            .map(|value| value.map_or(CellValue::Missing, CellValue::Number))
            .collect(),
        ColumnType::Date => {
            let days = column.cast(&DataType::Int32)?;
            let mut cells = Vec::with_capacity(days.len());
            for value in days.i32()? {
                let cell = match value {
                    None => CellValue::Missing,
                    Some(days) => epoch_days_to_date(days).map(CellValue::Date).ok_or_else(
                        || CleanError::TypeConversion {
                            column: column.name().to_string(),
                            value: days.to_string(),
                            target: ColumnType::Date,
                        },
                    )?,
                };
                cells.push(cell);
            }
            cells
        }
    };
    Ok(cells)
}

/// Strip surrounding whitespace and enclosing double quotes from a value.
///
/// Unlike a single quote-pair strip, repeated quotes left by double escaping
/// are removed too.
///
/// # Examples
///
/// ```
/// use survey_transform::data_utils::strip_quotes;
///
/// assert_eq!(strip_quotes("\"hello\""), "hello");
/// assert_eq!(strip_quotes("  \"\"world\"\"  "), "world");
/// assert_eq!(strip_quotes(" unquoted "), "unquoted");
/// assert_eq!(strip_quotes("say \"hi\" now"), "say \"hi\" now");
/// ```
pub fn strip_quotes(value: &str) -> String {
    value.trim().trim_matches('"').trim().to_string()
}

/// True for a section divider label: at least one upper-case letter and no
/// lower-case letters.
///
/// # Examples
///
/// ```
/// use survey_transform::data_utils::is_divider_label;
///
/// assert!(is_divider_label("HOUSEHOLDS BY TYPE"));
/// assert!(is_divider_label("SEX AND AGE (18+)"));
/// assert!(!is_divider_label("Married couples"));
/// assert!(!is_divider_label("18 - 24"));
/// ```
pub fn is_divider_label(label: &str) -> bool {
    label.chars().any(char::is_uppercase) && !label.chars().any(char::is_lowercase)
}
