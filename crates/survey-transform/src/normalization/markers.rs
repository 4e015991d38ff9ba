//! "Not applicable" marker recognition.
//!
//! Each raw source declares which whole-cell patterns mean "no value", e.g.
//! `(X)` or `*****` in census extracts. Matching cells become missing before
//! type inference, so inference only ever sees real values or the `-1`
//! placeholder.

use regex::Regex;
use survey_model::{CellValue, default_na_markers};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::frame::SurveyFrame;

/// Compiled set of NA marker patterns for one source.
#[derive(Debug, Clone)]
pub struct NaMarkers {
    patterns: Vec<Regex>,
}

impl NaMarkers {
    /// Compile marker patterns. Patterns are matched against the trimmed cell.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern.as_ref()).map_err(|source| CleanError::InvalidMarker {
                    pattern: pattern.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// A set that recognizes nothing.
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn is_marker(&self, value: &str) -> bool {
        let trimmed = value.trim();
        self.patterns.iter().any(|pattern| pattern.is_match(trimmed))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for NaMarkers {
    fn default() -> Self {
        // The built-in patterns are known to compile.
        Self::new(default_na_markers().as_slice()).unwrap_or_else(|_| Self::none())
    }
}

/// Map every marker cell of every string-typed column to missing.
///
/// Returns the new frame and the number of cells replaced. Number and date
/// columns are never touched.
pub fn replace_na_markers(frame: &SurveyFrame, markers: &NaMarkers) -> Result<(SurveyFrame, usize)> {
    let mut result = frame.clone();
    let mut replaced = 0usize;
    if markers.is_empty() {
        return Ok((result, replaced));
    }
    for (column, column_type) in frame.typed_columns() {
        if !column_type.is_textual() {
            continue;
        }
        let mut cells = frame.cells(&column)?;
        let mut column_replaced = 0usize;
        for cell in &mut cells {
            if cell.as_str().is_some_and(|value| markers.is_marker(value)) {
                *cell = CellValue::Missing;
                column_replaced += 1;
            }
        }
        if column_replaced > 0 {
            debug!(column = %column, replaced = column_replaced, "NA markers replaced");
            result.replace_column(&column, column_type, &cells)?;
            replaced += column_replaced;
        }
    }
    Ok((result, replaced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_model::ColumnType;

    fn frame() -> SurveyFrame {
        SurveyFrame::from_cells(
            "census",
            vec![
                (
                    "Estimate".to_string(),
                    ColumnType::RawString,
                    vec![
                        CellValue::text("(X)"),
                        CellValue::text("*****"),
                        CellValue::text("-"),
                        CellValue::text("-1"),
                        CellValue::text("12"),
                        CellValue::text("*"),
                    ],
                ),
                (
                    "Value".to_string(),
                    ColumnType::Number,
                    vec![
                        CellValue::Number(1.0),
                        CellValue::Missing,
                        CellValue::Number(2.0),
                        CellValue::Number(3.0),
                        CellValue::Number(4.0),
                        CellValue::Number(5.0),
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn default_markers_map_to_missing() {
        let (cleaned, replaced) = replace_na_markers(&frame(), &NaMarkers::default()).unwrap();
        assert_eq!(replaced, 3);
        assert_eq!(
            cleaned.cells("Estimate").unwrap(),
            vec![
                CellValue::Missing,
                CellValue::Missing,
                CellValue::Missing,
                CellValue::text("-1"),
                CellValue::text("12"),
                CellValue::text("*"),
            ]
        );
        assert_eq!(
            cleaned.cells("Value").unwrap(),
            frame().cells("Value").unwrap()
        );
    }

    #[test]
    fn source_specific_markers() {
        let markers = NaMarkers::new(&[r"^\*$"]).unwrap();
        let (cleaned, replaced) = replace_na_markers(&frame(), &markers).unwrap();
        assert_eq!(replaced, 1);
        assert_eq!(cleaned.cells("Estimate").unwrap()[0], CellValue::text("(X)"));
        assert_eq!(cleaned.cells("Estimate").unwrap()[5], CellValue::Missing);
    }

    #[test]
    fn markers_match_trimmed_cells() {
        let markers = NaMarkers::default();
        assert!(markers.is_marker(" (X) "));
        assert!(markers.is_marker("**"));
        assert!(!markers.is_marker("(X) units"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let result = NaMarkers::new(&["(unclosed"]);
        assert!(matches!(result, Err(CleanError::InvalidMarker { .. })));
    }

    #[test]
    fn input_frame_is_untouched() {
        let original = frame();
        let _ = replace_na_markers(&original, &NaMarkers::default()).unwrap();
        assert_eq!(original.cells("Estimate").unwrap()[0], CellValue::text("(X)"));
    }
}
