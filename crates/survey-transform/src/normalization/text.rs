//! Text cell canonicalization.

use survey_model::{CellValue, ColumnType};

use crate::data_utils::strip_quotes;
use crate::error::Result;
use crate::frame::SurveyFrame;

/// Strip surrounding whitespace and enclosing quotes from every text cell.
///
/// Only columns resolved to [`ColumnType::Text`] are rewritten.
pub fn trim_text_columns(frame: &SurveyFrame) -> Result<SurveyFrame> {
    let mut result = frame.clone();
    for column in frame.schema.columns_of(ColumnType::Text) {
        let cells: Vec<CellValue> = frame
            .cells(column)?
            .into_iter()
            .map(|cell| match cell {
                CellValue::Text(value) => CellValue::Text(strip_quotes(&value)),
                other => other,
            })
            .collect();
        result.replace_column(column, ColumnType::Text, &cells)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_only_text_columns() {
        let frame = SurveyFrame::from_cells(
            "t",
            vec![
                (
                    "Label".to_string(),
                    ColumnType::Text,
                    vec![
                        CellValue::text("  \"Married couples\" "),
                        CellValue::Missing,
                    ],
                ),
                (
                    "Raw".to_string(),
                    ColumnType::RawString,
                    vec![CellValue::text(" x "), CellValue::text("\"y\"")],
                ),
            ],
        )
        .unwrap();
        let trimmed = trim_text_columns(&frame).unwrap();
        assert_eq!(
            trimmed.cells("Label").unwrap(),
            vec![CellValue::text("Married couples"), CellValue::Missing]
        );
        assert_eq!(
            trimmed.cells("Raw").unwrap(),
            frame.cells("Raw").unwrap()
        );
    }
}
