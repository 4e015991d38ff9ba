//! Raw CSV file reading into untyped DataFrames.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use survey_model::default_null_values;
use tracing::debug;

use crate::error::{IngestError, Result};

use super::header::normalize_header;

/// Options controlling how raw cells are read.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Exact cell contents read as a missing value.
    pub null_values: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            null_values: default_null_values(),
        }
    }
}

impl IngestOptions {
    pub fn with_null_values(null_values: Vec<String>) -> Self {
        Self { null_values }
    }

    fn is_null(&self, value: &str) -> bool {
        self.null_values.iter().any(|token| token == value)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open(path)?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

fn csv_error(path: &Path, err: &::csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn read_headers(path: &Path, reader: &mut ::csv::Reader<File>) -> Result<Vec<String>> {
    let record = reader.headers().map_err(|e| csv_error(path, &e))?;
    let headers: Vec<String> = record.iter().map(normalize_header).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let mut seen = BTreeSet::new();
    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: header.clone(),
            });
        }
    }
    Ok(headers)
}

/// Reads a raw CSV extract into a DataFrame of nullable string columns.
///
/// Cells equal to one of the configured null tokens become nulls; every
/// other cell is kept verbatim. Rows shorter than the header are padded
/// with nulls, longer rows are rejected.
pub fn read_raw_csv(path: &Path, options: &IngestOptions) -> Result<DataFrame> {
    validate_encoding(path)?;
    let file = open(path)?;
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let headers = read_headers(path, &mut reader)?;

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, &e))?;
        if record.len() > headers.len() {
            return Err(IngestError::RaggedRow {
                path: path.to_path_buf(),
                line: record
                    .position()
                    .map_or(idx as u64 + 2, ::csv::Position::line),
                expected: headers.len(),
                found: record.len(),
            });
        }
        for (col_idx, column) in values.iter_mut().enumerate() {
            let cell = record
                .get(col_idx)
                .filter(|value| !options.is_null(value))
                .map(str::to_string);
            column.push(cell);
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(values)
        .map(|(name, cells)| Series::new(name.as_str().into(), cells).into_column())
        .collect();
    let df = DataFrame::new(columns)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read raw csv"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use survey_common::column_names;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_raw_csv_keeps_cells_as_text() {
        let file = create_temp_csv("A,B,C\n1,x,\n2,\" y \",z\n");
        let df = read_raw_csv(file.path(), &IngestOptions::default()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        let b = df.column("B").unwrap().str().unwrap();
        assert_eq!(b.get(0), Some("x"));
        assert_eq!(b.get(1), Some(" y "));
        let c = df.column("C").unwrap().str().unwrap();
        assert_eq!(c.get(0), None);
        assert_eq!(c.get(1), Some("z"));
    }

    #[test]
    fn test_read_raw_csv_null_tokens() {
        let file = create_temp_csv("A\nNA\nN/A\nkeep\n");
        let df = read_raw_csv(file.path(), &IngestOptions::default()).unwrap();
        let a = df.column("A").unwrap().str().unwrap();
        assert_eq!(a.get(0), None);
        assert_eq!(a.get(1), None);
        assert_eq!(a.get(2), Some("keep"));

        let only_empty = IngestOptions::with_null_values(vec![String::new()]);
        let df = read_raw_csv(file.path(), &only_empty).unwrap();
        assert_eq!(df.column("A").unwrap().str().unwrap().get(0), Some("NA"));
    }

    #[test]
    fn test_read_raw_csv_pads_short_rows() {
        let file = create_temp_csv("A,B\n1\n2,3\n");
        let df = read_raw_csv(file.path(), &IngestOptions::default()).unwrap();
        let b = df.column("B").unwrap().str().unwrap();
        assert_eq!(b.get(0), None);
        assert_eq!(b.get(1), Some("3"));
    }

    #[test]
    fn test_read_raw_csv_rejects_long_rows() {
        let file = create_temp_csv("A,B\n1,2,3\n");
        let result = read_raw_csv(file.path(), &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::RaggedRow { found: 3, .. })));
    }

    #[test]
    fn test_read_raw_csv_with_bom_and_spaced_headers() {
        let file = create_temp_csv("\u{feff}Label  (Grouping),Value\nTOTAL,1\n");
        let df = read_raw_csv(file.path(), &IngestOptions::default()).unwrap();
        assert_eq!(column_names(&df), vec!["Label (Grouping)", "Value"]);
    }

    #[test]
    fn test_read_raw_csv_duplicate_header() {
        let file = create_temp_csv("A,A\n1,2\n");
        let result = read_raw_csv(file.path(), &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::DuplicateColumn { .. })));
    }

    #[test]
    fn test_read_raw_csv_empty_header() {
        let file = create_temp_csv("A,,C\n1,2,3\n");
        let result = read_raw_csv(file.path(), &IngestOptions::default());
        assert!(matches!(
            result,
            Err(IngestError::EmptyColumnName { index: 1, .. })
        ));
    }

    #[test]
    fn test_read_raw_csv_empty_file() {
        let file = create_temp_csv("");
        let result = read_raw_csv(file.path(), &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_raw_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_raw_csv(&dir.path().join("absent.csv"), &IngestOptions::default());
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'A', 0]).unwrap();
        assert!(matches!(
            validate_encoding(file.path()),
            Err(IngestError::UnsupportedEncoding { .. })
        ));
    }
}
