//! Cell text encoding for the persisted CSV.
//!
//! Numbers use Rust's shortest round-trip float formatting, dates are ISO
//! `YYYY-MM-DD`, and both the date sentinel and missing cells are written as
//! `-1`.

use chrono::NaiveDate;
use survey_common::parse_f64;
use survey_model::{CellValue, ColumnType, SENTINEL_TEXT, sentinel_date};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text form of a cell.
pub fn encode_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Missing => SENTINEL_TEXT.to_string(),
        CellValue::Text(value) => value.clone(),
        CellValue::Number(value) => value.to_string(),
        CellValue::Date(date) if *date == sentinel_date() => SENTINEL_TEXT.to_string(),
        CellValue::Date(date) => date.format(DATE_FORMAT).to_string(),
    }
}

/// Parse a cell of the declared type, `None` when it does not decode.
///
/// Text cells are taken verbatim. An empty number or date cell is missing.
pub fn decode_cell(raw: &str, column_type: ColumnType) -> Option<CellValue> {
    match column_type {
        ColumnType::Text | ColumnType::RawString => Some(CellValue::text(raw)),
        ColumnType::Number => {
            if raw.trim().is_empty() {
                return Some(CellValue::Missing);
            }
            parse_f64(raw).map(CellValue::Number)
        }
        ColumnType::Date => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Some(CellValue::Missing)
            } else if trimmed == SENTINEL_TEXT {
                Some(CellValue::Date(sentinel_date()))
            } else {
                NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                    .ok()
                    .map(CellValue::Date)
            }
        }
    }
}
