//! Table writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use survey_transform::SurveyFrame;

use super::schema_path_for;
use crate::error::{PersistError, Result};
use crate::format::encode_cell;

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn encode_csv(frame: &SurveyFrame, path: &Path) -> Result<Vec<u8>> {
    let csv_error = |source| PersistError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let columns = frame.column_names();
    let cells = columns
        .iter()
        .map(|column| frame.cells(column))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns).map_err(csv_error)?;
    for row in 0..frame.height() {
        writer
            .write_record(cells.iter().map(|column| encode_cell(&column[row])))
            .map_err(csv_error)?;
    }
    writer.into_inner().map_err(|e| PersistError::Io {
        operation: "encode",
        path: path.to_path_buf(),
        source: e.into_error(),
    })
}

/// Write bytes to a temp file next to `path` and sync it.
fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let temp_path = temp_path_for(path);
    let mut file = File::create(&temp_path).map_err(|e| PersistError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(bytes).map_err(|e| PersistError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| PersistError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;
    Ok(temp_path)
}

fn commit(temp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(temp_path, path).map_err(|e| PersistError::AtomicWriteFailed {
        temp_path: temp_path.to_path_buf(),
        target_path: path.to_path_buf(),
        source: e,
    })
}

/// Write a cleaned table as CSV plus its JSON type schema.
///
/// Both files go to temp files first and are renamed into place only once
/// both are complete, so a failed write never leaves a half-written file.
/// The two renames are not one atomic step: the schema is committed first,
/// and if the data rename then fails the schema is removed, leaving the table
/// unreadable until it is cleaned again rather than paired with stale data.
pub fn write_table(frame: &SurveyFrame, path: &Path) -> Result<()> {
    let schema_path = schema_path_for(path);
    if schema_path == path {
        return Err(PersistError::SchemaMismatch {
            path: path.to_path_buf(),
            message: "data file must not use the schema extension .json".to_string(),
        });
    }

    let data = encode_csv(frame, path)?;
    let schema = serde_json::to_vec_pretty(&frame.schema).map_err(|e| PersistError::Json {
        path: schema_path.clone(),
        source: e,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let data_temp = write_temp(path, &data)?;
    let schema_temp = match write_temp(&schema_path, &schema) {
        Ok(temp) => temp,
        Err(err) => {
            let _ = fs::remove_file(&data_temp);
            return Err(err);
        }
    };
    if let Err(err) = commit(&schema_temp, &schema_path) {
        let _ = fs::remove_file(&data_temp);
        let _ = fs::remove_file(&schema_temp);
        return Err(err);
    }
    if let Err(err) = commit(&data_temp, path) {
        // The new schema must not describe the old data.
        let _ = fs::remove_file(&data_temp);
        let _ = fs::remove_file(&schema_path);
        return Err(err);
    }

    tracing::info!(
        rows = frame.height(),
        columns = frame.width(),
        "Saved {} to {}",
        frame.name,
        path.display()
    );
    Ok(())
}
