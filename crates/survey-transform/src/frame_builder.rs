//! DataFrame column construction from typed cells.

use polars::prelude::{Column, DataType, IntoColumn, NamedFrom, Series};
use survey_model::{CellValue, ColumnType, date_to_epoch_days};

use crate::error::{CleanError, Result};

/// Build a Polars column holding `cells` with the physical type of `column_type`.
///
/// Number columns become `Float64`, date columns `Date`, and text or raw
/// columns nullable `String`. A cell of another kind is a conversion error.
pub fn build_column(name: &str, column_type: ColumnType, cells: &[CellValue]) -> Result<Column> {
    let mismatch = |cell: &CellValue| CleanError::TypeConversion {
        column: name.to_string(),
        value: format!("{cell:?}"),
        target: column_type,
    };
    let column = match column_type {
        ColumnType::Text | ColumnType::RawString => {
            let mut values: Vec<Option<String>> = Vec::with_capacity(cells.len());
            for cell in cells {
                values.push(match cell {
                    CellValue::Missing => None,
                    CellValue::Text(value) => Some(value.clone()),
                    other => return Err(mismatch(other)),
                });
            }
            Series::new(name.into(), values).into_column()
        }
        ColumnType::Number => {
            let mut values: Vec<Option<f64>> = Vec::with_capacity(cells.len());
            for cell in cells {
                values.push(match cell {
                    CellValue::Missing => None,
                    CellValue::Number(value) => Some(*value),
                    other => return Err(mismatch(other)),
                });
            }
            Series::new(name.into(), values).into_column()
        }
        ColumnType::Date => {
            let mut values: Vec<Option<i32>> = Vec::with_capacity(cells.len());
            for cell in cells {
                values.push(match cell {
                    CellValue::Missing => None,
                    CellValue::Date(date) => Some(date_to_epoch_days(*date)),
                    other => return Err(mismatch(other)),
                });
            }
            Series::new(name.into(), values)
                .cast(&DataType::Date)?
                .into_column()
        }
    };
    Ok(column)
}

/// Polars dtype backing a column type.
pub fn physical_dtype(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Text | ColumnType::RawString => DataType::String,
        ColumnType::Number => DataType::Float64,
        ColumnType::Date => DataType::Date,
    }
}
