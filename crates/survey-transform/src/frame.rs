//! Survey frame type: a Polars DataFrame paired with its column type schema.
//!
//! Every cleaning step takes a [`SurveyFrame`] by reference and returns a new
//! one. Column storage is cheap to clone, so steps stay pure without copying
//! untouched columns.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use survey_common::column_names;
use survey_model::{CellValue, ColumnType, TypeSchema};

use crate::data_utils::column_cells;
use crate::error::{CleanError, Result};
use crate::frame_builder::{build_column, physical_dtype};

/// A survey table with its resolved column types.
#[derive(Debug, Clone)]
pub struct SurveyFrame {
    /// Dataset name, used in errors and logs.
    pub name: String,
    /// The table contents.
    pub data: DataFrame,
    /// Column name to resolved type. Keys always equal the data's columns.
    pub schema: TypeSchema,
}

impl SurveyFrame {
    /// Wrap a freshly ingested DataFrame, typing every column as raw text.
    pub fn raw(name: impl Into<String>, data: DataFrame) -> Self {
        let schema = TypeSchema::raw(column_names(&data));
        Self {
            name: name.into(),
            data,
            schema,
        }
    }

    /// Pair a DataFrame with a schema, checking that both describe the same columns.
    pub fn new(name: impl Into<String>, data: DataFrame, schema: TypeSchema) -> Result<Self> {
        let name = name.into();
        let columns = column_names(&data);
        if !schema.matches_columns(columns.as_slice()) {
            return Err(CleanError::SchemaMismatch {
                table: name,
                message: format!(
                    "columns [{}] vs schema [{}]",
                    columns.join(", "),
                    schema.iter().map(|(n, _)| n).collect::<Vec<_>>().join(", ")
                ),
            });
        }
        for column in data.get_columns() {
            let declared = schema.get(column.name().as_str()).unwrap_or(ColumnType::RawString);
            if column.dtype() != &physical_dtype(declared) {
                return Err(CleanError::SchemaMismatch {
                    table: name,
                    message: format!(
                        "column '{}' is stored as {} but declared {}",
                        column.name(),
                        column.dtype(),
                        declared
                    ),
                });
            }
        }
        Ok(Self { name, data, schema })
    }

    /// Build a frame from typed cell columns, in the given order.
    pub fn from_cells(
        name: impl Into<String>,
        columns: Vec<(String, ColumnType, Vec<CellValue>)>,
    ) -> Result<Self> {
        let mut schema = TypeSchema::new();
        let mut built = Vec::with_capacity(columns.len());
        for (column, column_type, cells) in columns {
            built.push(build_column(&column, column_type, &cells)?);
            schema.insert(column, column_type);
        }
        let data = DataFrame::new(built)?;
        Self::new(name, data, schema)
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        column_names(&self.data)
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.schema.get(column)
    }

    /// Type of `column`, or [`CleanError::ColumnNotFound`].
    pub fn require_column(&self, column: &str) -> Result<ColumnType> {
        self.schema
            .get(column)
            .ok_or_else(|| CleanError::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// All cells of one column.
    pub fn cells(&self, column: &str) -> Result<Vec<CellValue>> {
        let column_type = self.require_column(column)?;
        column_cells(self.data.column(column)?, column_type)
    }

    /// Column names in table order with their types.
    pub fn typed_columns(&self) -> Vec<(String, ColumnType)> {
        self.data
            .get_columns()
            .iter()
            .map(|column| {
                let name = column.name().to_string();
                let column_type = self.schema.get(&name).unwrap_or(ColumnType::RawString);
                (name, column_type)
            })
            .collect()
    }

    /// Number of null cells across all columns.
    pub fn missing_count(&self) -> usize {
        self.data
            .get_columns()
            .iter()
            .map(|column| column.null_count())
            .sum()
    }

    /// Replace the contents (and possibly the type) of an existing column,
    /// keeping its position.
    pub fn replace_column(
        &mut self,
        column: &str,
        column_type: ColumnType,
        cells: &[CellValue],
    ) -> Result<()> {
        self.require_column(column)?;
        let built = build_column(column, column_type, cells)?;
        self.data.with_column(built)?;
        self.schema.insert(column, column_type);
        Ok(())
    }

    /// New frame keeping only rows whose `keep` flag is set.
    pub fn retain_rows(&self, keep: &[bool]) -> Result<Self> {
        let mask = BooleanChunked::from_slice("keep".into(), keep);
        Ok(Self {
            name: self.name.clone(),
            data: self.data.filter(&mask)?,
            schema: self.schema.clone(),
        })
    }

    /// New frame without `column`.
    pub fn without_column(&self, column: &str) -> Result<Self> {
        self.require_column(column)?;
        let mut schema = self.schema.clone();
        schema.remove(column);
        Ok(Self {
            name: self.name.clone(),
            data: self.data.drop(column)?,
            schema,
        })
    }

    /// True when both frames have the same columns in the same order, the same
    /// types and the same cells. Numbers compare bitwise so `NaN` equals itself.
    pub fn same_contents(&self, other: &Self) -> bool {
        if self.schema != other.schema || self.column_names() != other.column_names() {
            return false;
        }
        self.column_names().iter().all(|column| {
            match (self.cells(column), other.cells(column)) {
                (Ok(left), Ok(right)) => {
                    left.len() == right.len()
                        && left.iter().zip(&right).all(|(a, b)| cells_identical(a, b))
                }
                _ => false,
            }
        })
    }
}

pub(crate) fn cells_identical(left: &CellValue, right: &CellValue) -> bool {
    match (left, right) {
        (CellValue::Number(a), CellValue::Number(b)) => a.to_bits() == b.to_bits(),
        _ => left == right,
    }
}
