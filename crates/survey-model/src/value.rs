//! Typed cell values and the `-1` absence sentinel.

use chrono::{Datelike, NaiveDate};

use crate::column::ColumnType;

/// Text form of the absence sentinel, both in text columns and on disk.
pub const SENTINEL_TEXT: &str = "-1";

/// Sentinel stored in number columns.
pub const SENTINEL_NUMBER: f64 = -1.0;

/// Physical day count (days since 1970-01-01) stored in date columns for the sentinel.
pub const SENTINEL_DATE_DAYS: i32 = -1;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A single cell of a survey table.
///
/// `Missing` is a real gap (a null). It is distinct from the `-1` sentinel,
/// which marks a cell as intentionally absent once cleaning has run.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The sentinel cell for a column of the given type.
    pub fn sentinel_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Text | ColumnType::RawString => Self::Text(SENTINEL_TEXT.to_string()),
            ColumnType::Number => Self::Number(SENTINEL_NUMBER),
            ColumnType::Date => Self::Date(sentinel_date()),
        }
    }

    /// True for the text and date forms of the sentinel.
    ///
    /// `-1.0` in a number column is not reported as a sentinel since it can be
    /// a legitimate measurement.
    pub fn is_sentinel(&self) -> bool {
        match self {
            Self::Text(value) => value == SENTINEL_TEXT,
            Self::Date(date) => *date == sentinel_date(),
            Self::Missing | Self::Number(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }
}

/// The calendar date whose physical representation is the sentinel (1969-12-31).
pub fn sentinel_date() -> NaiveDate {
    // Day -1 is always in range for chrono.
    epoch_days_to_date(SENTINEL_DATE_DAYS).unwrap_or(NaiveDate::MIN)
}

/// Days since 1970-01-01, the physical form of a Polars `Date`.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`date_to_epoch_days`]; `None` when out of chrono's range.
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_days_round_trip() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        let days = date_to_epoch_days(date);
        assert_eq!(days, 18_276);
        assert_eq!(epoch_days_to_date(days), Some(date));
        assert_eq!(
            date_to_epoch_days(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            0
        );
    }

    #[test]
    fn sentinel_date_is_day_before_epoch() {
        assert_eq!(sentinel_date(), NaiveDate::from_ymd_opt(1969, 12, 31).unwrap());
        assert_eq!(date_to_epoch_days(sentinel_date()), SENTINEL_DATE_DAYS);
    }

    #[test]
    fn sentinel_per_column_type() {
        assert_eq!(
            CellValue::sentinel_for(ColumnType::Text),
            CellValue::text("-1")
        );
        assert_eq!(
            CellValue::sentinel_for(ColumnType::Number),
            CellValue::Number(-1.0)
        );
        assert!(CellValue::sentinel_for(ColumnType::Date).is_sentinel());
        assert!(CellValue::sentinel_for(ColumnType::Text).is_sentinel());
        assert!(!CellValue::Number(-1.0).is_sentinel());
        assert!(!CellValue::Missing.is_sentinel());
    }

    #[test]
    fn equality_is_type_sensitive() {
        assert_ne!(CellValue::text("1"), CellValue::Number(1.0));
        assert_eq!(CellValue::Number(1.0), CellValue::Number(1.0));
    }
}
