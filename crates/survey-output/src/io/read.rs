//! Table reading.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use survey_model::{CellValue, ColumnType, TypeSchema};
use survey_transform::SurveyFrame;
use tracing::debug;

use super::schema_path_for;
use crate::error::{Artifact, PersistError, Result};
use crate::format::decode_cell;

fn read_schema(path: &Path) -> Result<TypeSchema> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PersistError::MissingPersistedArtifact {
                artifact: Artifact::Schema,
                path: path.to_path_buf(),
            }
        } else {
            PersistError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|e| PersistError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

fn open_data(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PersistError::MissingPersistedArtifact {
                artifact: Artifact::Data,
                path: path.to_path_buf(),
            }
        } else {
            PersistError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read a table written by [`write_table`](super::write_table).
///
/// The schema is read first and drives decoding: every column is parsed as
/// its declared type and nothing is inferred.
pub fn read_table(path: &Path) -> Result<SurveyFrame> {
    let schema_path = schema_path_for(path);
    let schema = read_schema(&schema_path)?;
    let file = open_data(path)?;

    let csv_error = |source| PersistError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if !schema.matches_columns(headers.as_slice()) {
        return Err(PersistError::SchemaMismatch {
            path: path.to_path_buf(),
            message: format!(
                "header [{}] vs schema [{}]",
                headers.join(", "),
                schema.iter().map(|(n, _)| n).collect::<Vec<_>>().join(", ")
            ),
        });
    }
    let types: Vec<ColumnType> = headers
        .iter()
        .map(|column| schema.get(column).unwrap_or(ColumnType::RawString))
        .collect();

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        for (idx, raw) in record.iter().enumerate() {
            let cell = decode_cell(raw, types[idx]).ok_or_else(|| PersistError::Decode {
                path: path.to_path_buf(),
                column: headers[idx].clone(),
                row: row + 1,
                value: raw.to_string(),
                expected: types[idx],
            })?;
            columns[idx].push(cell);
        }
    }

    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("table")
        .to_string();
    let frame = SurveyFrame::from_cells(
        name,
        headers
            .into_iter()
            .zip(types)
            .zip(columns)
            .map(|((column, column_type), cells)| (column, column_type, cells))
            .collect(),
    )?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "read cleaned table"
    );
    Ok(frame)
}
