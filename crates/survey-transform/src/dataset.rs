//! Dataset-specific cleaning strategies.
//!
//! Each raw source gets one [`DatasetCleaner`], chosen from its configured
//! [`DatasetKind`] when the pipeline is built. The pipeline itself never looks
//! at column names to decide what kind of data it holds.
//!
//! # Example
//!
//! ```ignore
//! use survey_model::DatasetKind;
//! use survey_transform::dataset::cleaner_for;
//!
//! let cleaner = cleaner_for(&DatasetKind::census_extract());
//! let (frame, summary) = cleaner.clean(&frame)?;
//! ```

use survey_model::{CellValue, DatasetKind};
use tracing::info;

use crate::error::Result;
use crate::frame::SurveyFrame;
use crate::sanitize::{drop_column, drop_divider_rows, drop_rows_equal, filter_rows_equal, repair_percent_columns};

/// What a dataset-specific clean changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetCleanSummary {
    /// Rows removed by filters and drops.
    pub rows_removed: usize,
    /// Columns removed.
    pub columns_dropped: Vec<String>,
    /// Percent cells replaced, for variants that repair percentages.
    pub percent_repairs: Option<usize>,
}

/// Trait for variant-specific cleaning of one source's table.
///
/// Implementors run after the generic stages, on a fully typed frame with no
/// missing cells.
pub trait DatasetCleaner: Send + Sync {
    /// Short variant name for logs and reports.
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the cleaner.
    fn description(&self) -> &'static str {
        "Dataset cleaner"
    }

    /// Apply the variant's cleanup.
    ///
    /// # Errors
    ///
    /// Fails when a configured column is absent or has an unexpected type.
    fn clean(&self, frame: &SurveyFrame) -> Result<(SurveyFrame, DatasetCleanSummary)>;
}

/// Symptom-frequency survey: one indicator, no phase-less rows.
#[derive(Debug, Clone)]
pub struct SymptomSurveyCleaner {
    pub indicator_column: String,
    pub target_indicator: String,
    pub phase_column: String,
}

impl DatasetCleaner for SymptomSurveyCleaner {
    fn name(&self) -> &'static str {
        "symptom_survey"
    }

    fn description(&self) -> &'static str {
        "Keep one indicator and drop rows outside every survey phase"
    }

    fn clean(&self, frame: &SurveyFrame) -> Result<(SurveyFrame, DatasetCleanSummary)> {
        let before = frame.height();
        let target = CellValue::text(self.target_indicator.as_str());
        let filtered = filter_rows_equal(frame, &self.indicator_column, &target)?;
        let indicator_removed = before - filtered.height();

        // The phase column's own sentinel marks "no phase".
        let phase_type = filtered.require_column(&self.phase_column)?;
        let (phased, phase_removed) = drop_rows_equal(
            &filtered,
            &self.phase_column,
            &CellValue::sentinel_for(phase_type),
        )?;
        let cleaned = drop_column(&phased, &self.indicator_column)?;

        info!(
            table = %frame.name,
            indicator = %self.target_indicator,
            indicator_removed,
            phase_removed,
            "symptom survey cleaned"
        );
        Ok((
            cleaned,
            DatasetCleanSummary {
                rows_removed: indicator_removed + phase_removed,
                columns_dropped: vec![self.indicator_column.clone()],
                percent_repairs: None,
            },
        ))
    }
}

/// Census-style extract: section dividers out, percentages in range.
#[derive(Debug, Clone)]
pub struct CensusExtractCleaner {
    pub label_column: String,
    pub percent_replacement: f64,
}

impl DatasetCleaner for CensusExtractCleaner {
    fn name(&self) -> &'static str {
        "census_extract"
    }

    fn description(&self) -> &'static str {
        "Drop section divider rows and repair out-of-range percentages"
    }

    fn clean(&self, frame: &SurveyFrame) -> Result<(SurveyFrame, DatasetCleanSummary)> {
        let (without_dividers, dividers) = drop_divider_rows(frame, &self.label_column)?;
        let (repaired, repairs) =
            repair_percent_columns(&without_dividers, self.percent_replacement)?;
        info!(
            table = %frame.name,
            dividers,
            percent_repairs = repairs,
            "census extract cleaned"
        );
        Ok((
            repaired,
            DatasetCleanSummary {
                rows_removed: dividers,
                columns_dropped: Vec::new(),
                percent_repairs: Some(repairs),
            },
        ))
    }
}

/// The cleaner for a configured dataset variant.
pub fn cleaner_for(kind: &DatasetKind) -> Box<dyn DatasetCleaner> {
    match kind {
        DatasetKind::SymptomSurvey {
            indicator_column,
            target_indicator,
            phase_column,
        } => Box::new(SymptomSurveyCleaner {
            indicator_column: indicator_column.clone(),
            target_indicator: target_indicator.clone(),
            phase_column: phase_column.clone(),
        }),
        DatasetKind::CensusExtract {
            label_column,
            percent_replacement,
        } => Box::new(CensusExtractCleaner {
            label_column: label_column.clone(),
            percent_replacement: *percent_replacement,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanError;
    use survey_model::ColumnType;

    fn text(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn survey_frame() -> SurveyFrame {
        SurveyFrame::from_cells(
            "anxiety_trends",
            vec![
                (
                    "Indicator".to_string(),
                    ColumnType::Text,
                    text(&[
                        "Symptoms of Anxiety Disorder",
                        "Symptoms of Depressive Disorder",
                        "Symptoms of Anxiety Disorder",
                        "Symptoms of Anxiety Disorder",
                    ]),
                ),
                ("Phase".to_string(), ColumnType::Text, text(&["1", "1", "-1", "2"])),
                (
                    "Value".to_string(),
                    ColumnType::Number,
                    vec![
                        CellValue::Number(30.8),
                        CellValue::Number(24.1),
                        CellValue::Number(31.0),
                        CellValue::Number(35.2),
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn symptom_survey_keeps_target_indicator() {
        let cleaner = cleaner_for(&DatasetKind::symptom_survey());
        assert_eq!(cleaner.name(), "symptom_survey");
        let (cleaned, summary) = cleaner.clean(&survey_frame()).unwrap();

        assert_eq!(cleaned.column_names(), vec!["Phase", "Value"]);
        assert_eq!(cleaned.cells("Phase").unwrap(), text(&["1", "2"]));
        assert_eq!(summary.rows_removed, 2);
        assert_eq!(summary.columns_dropped, vec!["Indicator".to_string()]);
        assert_eq!(summary.percent_repairs, None);
    }

    #[test]
    fn symptom_survey_requires_configured_columns() {
        let cleaner = SymptomSurveyCleaner {
            indicator_column: "Indicator".to_string(),
            target_indicator: "Symptoms of Anxiety Disorder".to_string(),
            phase_column: "Round".to_string(),
        };
        let err = cleaner.clean(&survey_frame()).unwrap_err();
        assert!(matches!(err, CleanError::ColumnNotFound { ref column, .. } if column == "Round"));
    }

    #[test]
    fn census_extract_drops_dividers_and_repairs() {
        let frame = SurveyFrame::from_cells(
            "household",
            vec![
                (
                    "Label (Grouping)".to_string(),
                    ColumnType::Text,
                    text(&["HOUSEHOLDS", "Married couples", "FAMILIES", "Living alone"]),
                ),
                (
                    "United States!!Percent".to_string(),
                    ColumnType::Number,
                    vec![
                        CellValue::Number(-1.0),
                        CellValue::Number(47.1),
                        CellValue::Number(-1.0),
                        CellValue::Number(120.0),
                    ],
                ),
            ],
        )
        .unwrap();
        let cleaner = cleaner_for(&DatasetKind::census_extract());
        let (cleaned, summary) = cleaner.clean(&frame).unwrap();

        assert_eq!(
            cleaned.cells("Label (Grouping)").unwrap(),
            text(&["Married couples", "Living alone"])
        );
        assert_eq!(
            cleaned.cells("United States!!Percent").unwrap(),
            vec![CellValue::Number(47.1), CellValue::Number(0.0)]
        );
        assert_eq!(summary.rows_removed, 2);
        assert_eq!(summary.percent_repairs, Some(1));
    }
}
