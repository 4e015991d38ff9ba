//! Column type inference for raw text columns.
//!
//! A raw column resolves to the first type whose pattern matches every
//! candidate value: date (`MM/DD/YYYY`), then number. Missing cells and the
//! `-1` placeholder are exempt from matching. Anything else stays text.
//!
//! Conversion after a full match is strict: a value that matched a pattern
//! but does not convert is an error, never a silent fallback.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use survey_common::parse_f64;
use survey_model::{CellValue, ColumnType, SENTINEL_TEXT};
use tracing::{debug, warn};

use crate::error::{CleanError, Result};
use crate::frame::SurveyFrame;

/// `MM/DD/YYYY`; calendar validity is checked on conversion.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("Invalid date regex"));

/// Digits with separators, `±`, `%`, quotes and an optional leading sign.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[+-]?[0-9±%,."]+$"#).expect("Invalid number regex"));

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Characters removed from a number before parsing.
const NUMBER_DECORATIONS: &[char] = &[',', '±', '%', '"'];

/// Why a column resolved the way it did, when that is worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceNote {
    /// Every value was missing or the placeholder, so the column is text.
    NoEvidence { column: String },
    /// Some but not all candidate values matched a pattern; kept as text.
    Inconsistent {
        column: String,
        candidate: ColumnType,
        matched: usize,
        candidates: usize,
    },
}

impl InferenceNote {
    pub fn column(&self) -> &str {
        match self {
            Self::NoEvidence { column } | Self::Inconsistent { column, .. } => column,
        }
    }

    /// The inconsistency as an error value, for strict callers.
    pub fn to_error(&self) -> Option<CleanError> {
        match self {
            Self::NoEvidence { .. } => None,
            Self::Inconsistent {
                column,
                candidate,
                matched,
                candidates,
            } => Some(CleanError::TypeInferenceInconsistent {
                column: column.clone(),
                candidate: *candidate,
                matched: *matched,
                candidates: *candidates,
            }),
        }
    }
}

impl fmt::Display for InferenceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEvidence { column } => {
                write!(f, "column '{column}' has no values to type; kept as text")
            }
            Self::Inconsistent { .. } => match self.to_error() {
                Some(err) => write!(f, "{err}"),
                None => Ok(()),
            },
        }
    }
}

/// Outcome of inspecting one raw column.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub column_type: ColumnType,
    pub note: Option<InferenceNote>,
}

fn is_exempt(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim() == SENTINEL_TEXT)
}

pub fn matches_date(value: &str) -> bool {
    DATE_PATTERN.is_match(value.trim())
}

pub fn matches_number(value: &str) -> bool {
    NUMBER_PATTERN.is_match(value.trim())
}

/// Classify a raw column from its values.
pub fn infer_column_type(column: &str, values: &[Option<&str>]) -> Inference {
    let candidates: Vec<&str> = values
        .iter()
        .copied()
        .filter(|value| !is_exempt(*value))
        .flatten()
        .collect();
    if candidates.is_empty() {
        return Inference {
            column_type: ColumnType::Text,
            note: Some(InferenceNote::NoEvidence {
                column: column.to_string(),
            }),
        };
    }

    let dates = candidates.iter().filter(|v| matches_date(v)).count();
    if dates == candidates.len() {
        return Inference {
            column_type: ColumnType::Date,
            note: None,
        };
    }
    let numbers = candidates.iter().filter(|v| matches_number(v)).count();
    if numbers == candidates.len() {
        return Inference {
            column_type: ColumnType::Number,
            note: None,
        };
    }

    let note = if dates == 0 && numbers == 0 {
        None
    } else {
        let (candidate, matched) = if dates >= numbers {
            (ColumnType::Date, dates)
        } else {
            (ColumnType::Number, numbers)
        };
        Some(InferenceNote::Inconsistent {
            column: column.to_string(),
            candidate,
            matched,
            candidates: candidates.len(),
        })
    };
    Inference {
        column_type: ColumnType::Text,
        note,
    }
}

/// Parse a number cell, stripping separators, `±`, `%` and quotes.
pub fn parse_number(column: &str, value: &str) -> Result<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| !NUMBER_DECORATIONS.contains(ch))
        .collect();
    parse_f64(&cleaned).ok_or_else(|| CleanError::TypeConversion {
        column: column.to_string(),
        value: value.to_string(),
        target: ColumnType::Number,
    })
}

/// Parse a `MM/DD/YYYY` date cell.
pub fn parse_date(column: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| CleanError::TypeConversion {
        column: column.to_string(),
        value: value.to_string(),
        target: ColumnType::Date,
    })
}

/// Convert raw values to cells of the resolved type. Exempt values of a
/// number or date column become missing.
pub fn convert_values(
    column: &str,
    column_type: ColumnType,
    values: &[Option<&str>],
) -> Result<Vec<CellValue>> {
    values
        .iter()
        .map(|&value| match column_type {
            ColumnType::Text | ColumnType::RawString => {
                Ok(value.map_or(CellValue::Missing, CellValue::text))
            }
            ColumnType::Number => match value {
                Some(v) if !is_exempt(Some(v)) => parse_number(column, v).map(CellValue::Number),
                _ => Ok(CellValue::Missing),
            },
            ColumnType::Date => match value {
                Some(v) if !is_exempt(Some(v)) => parse_date(column, v).map(CellValue::Date),
                _ => Ok(CellValue::Missing),
            },
        })
        .collect()
}

/// Resolve every raw column of `frame` to a concrete type.
///
/// Columns named in `pinned_text` resolve to text without inspection and must
/// exist in the frame. Columns that are already typed are left alone.
pub fn resolve_column_types(
    frame: &SurveyFrame,
    pinned_text: &[String],
) -> Result<(SurveyFrame, Vec<InferenceNote>)> {
    for pinned in pinned_text {
        frame.require_column(pinned)?;
    }
    let mut resolved = frame.clone();
    let mut notes = Vec::new();
    for (column, column_type) in frame.typed_columns() {
        if column_type != ColumnType::RawString {
            continue;
        }
        let raw = frame.data.column(&column)?.str()?;
        let values: Vec<Option<&str>> = raw.into_iter().collect();

        let inference = if pinned_text.iter().any(|pinned| pinned == &column) {
            debug!(column = %column, "pinned to text");
            Inference {
                column_type: ColumnType::Text,
                note: None,
            }
        } else {
            infer_column_type(&column, &values)
        };
        if let Some(note) = &inference.note {
            match note {
                InferenceNote::NoEvidence { .. } => debug!(table = %frame.name, "{note}"),
                InferenceNote::Inconsistent { .. } => warn!(table = %frame.name, "{note}"),
            }
        }
        debug!(column = %column, column_type = %inference.column_type, "resolved column type");

        let cells = convert_values(&column, inference.column_type, &values)?;
        resolved.replace_column(&column, inference.column_type, &cells)?;
        notes.extend(inference.note);
    }
    Ok((resolved, notes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(values: &[&str]) -> Inference {
        let values: Vec<Option<&str>> = values.iter().copied().map(Some).collect();
        infer_column_type("col", &values)
    }

    #[test]
    fn date_column_with_placeholder() {
        let inference = infer(&["01/15/2020", "-1", "03/02/2021"]);
        assert_eq!(inference.column_type, ColumnType::Date);
        assert!(inference.note.is_none());
    }

    #[test]
    fn number_column_with_decorations() {
        let inference = infer(&["45%", "-1", "12.5", "1,234", "±3.2", "\"7\""]);
        assert_eq!(inference.column_type, ColumnType::Number);
    }

    #[test]
    fn text_column() {
        let inference = infer(&["yes", "-1", "no"]);
        assert_eq!(inference.column_type, ColumnType::Text);
        assert!(inference.note.is_none());
    }

    #[test]
    fn date_wins_over_number() {
        // Digits and slashes never match the number pattern, but the date
        // check runs first regardless.
        assert_eq!(infer(&["12/31/2020"]).column_type, ColumnType::Date);
    }

    #[test]
    fn partial_match_falls_back_with_note() {
        let inference = infer(&["12.5", "n.a.", "7"]);
        assert_eq!(inference.column_type, ColumnType::Text);
        assert_eq!(
            inference.note,
            Some(InferenceNote::Inconsistent {
                column: "col".to_string(),
                candidate: ColumnType::Number,
                matched: 2,
                candidates: 3,
            })
        );
        assert!(matches!(
            inference.note.unwrap().to_error(),
            Some(CleanError::TypeInferenceInconsistent { matched: 2, .. })
        ));
    }

    #[test]
    fn empty_evidence_is_text() {
        let inference = infer_column_type("col", &[None, Some("-1")]);
        assert_eq!(inference.column_type, ColumnType::Text);
        assert!(matches!(
            inference.note,
            Some(InferenceNote::NoEvidence { .. })
        ));
    }

    #[test]
    fn negative_numbers_match() {
        assert_eq!(infer(&["-5", "110"]).column_type, ColumnType::Number);
    }

    #[test]
    fn parse_number_strips_decorations() {
        assert_eq!(parse_number("c", "45%").unwrap(), 45.0);
        assert_eq!(parse_number("c", "1,234.5").unwrap(), 1234.5);
        assert_eq!(parse_number("c", "±12").unwrap(), 12.0);
        assert_eq!(parse_number("c", "\"3\"").unwrap(), 3.0);
    }

    #[test]
    fn malformed_number_is_fatal() {
        let values = [Some("1.2.3")];
        assert!(matches_number("1.2.3"));
        let err = convert_values("c", ColumnType::Number, &values).unwrap_err();
        assert!(matches!(
            err,
            CleanError::TypeConversion {
                target: ColumnType::Number,
                ..
            }
        ));
    }

    #[test]
    fn impossible_date_is_fatal() {
        let values = [Some("13/45/2020")];
        assert_eq!(
            infer_column_type("c", &values).column_type,
            ColumnType::Date
        );
        assert!(convert_values("c", ColumnType::Date, &values).is_err());
    }

    #[test]
    fn absent_pinned_column_is_an_error() {
        let frame = SurveyFrame::from_cells(
            "t",
            vec![(
                "Value".to_string(),
                ColumnType::RawString,
                vec![CellValue::text("1")],
            )],
        )
        .unwrap();
        let err = resolve_column_types(&frame, &["Phase".to_string()]).unwrap_err();
        assert!(matches!(err, CleanError::ColumnNotFound { ref column, .. } if column == "Phase"));
    }

    #[test]
    fn pinned_column_stays_text() {
        let frame = SurveyFrame::from_cells(
            "t",
            vec![(
                "Phase".to_string(),
                ColumnType::RawString,
                vec![CellValue::text("1"), CellValue::text("-1"), CellValue::text("2")],
            )],
        )
        .unwrap();
        let (resolved, _) = resolve_column_types(&frame, &["Phase".to_string()]).unwrap();
        assert_eq!(resolved.column_type("Phase"), Some(ColumnType::Text));
        assert_eq!(resolved.cells("Phase").unwrap()[1], CellValue::text("-1"));
    }

    #[test]
    fn exempt_values_become_missing() {
        let values = [Some("45%"), Some("-1"), None];
        let cells = convert_values("c", ColumnType::Number, &values).unwrap();
        assert_eq!(
            cells,
            vec![CellValue::Number(45.0), CellValue::Missing, CellValue::Missing]
        );

        let cells = convert_values("c", ColumnType::Text, &values).unwrap();
        assert_eq!(cells[1], CellValue::text("-1"));
    }
}
