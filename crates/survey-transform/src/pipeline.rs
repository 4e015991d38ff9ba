//! Cleaning pipeline orchestration.
//!
//! The pipeline moves one raw table through a fixed sequence of stages:
//!
//! ```text
//! RawLoaded → TypesResolved → NumericGapsImputed → ResidualGapsSentineled
//!           → Deduplicated → TextTrimmed → DatasetSpecificClean → Persisted
//! ```
//!
//! Every stage either completes or aborts the whole run; there is no partial
//! result. Persisting is left to the caller, which records it on the report
//! with [`CleanReport::mark_persisted`] once the cleaned table is written.

use std::fmt;

use survey_model::{ColumnType, SourceConfig};
use tracing::{debug, info, info_span};

use crate::dataset::{DatasetCleanSummary, DatasetCleaner, cleaner_for};
use crate::error::Result;
use crate::frame::SurveyFrame;
use crate::impute::{fill_missing, impute_numeric_means};
use crate::inference::{InferenceNote, resolve_column_types};
use crate::normalization::{NaMarkers, replace_na_markers, trim_text_columns};
use crate::sanitize::deduplicate;

/// Stage reached by a table in the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CleanStage {
    RawLoaded,
    TypesResolved,
    NumericGapsImputed,
    ResidualGapsSentineled,
    Deduplicated,
    TextTrimmed,
    DatasetSpecificClean,
    Persisted,
}

impl CleanStage {
    /// All stages in execution order.
    pub const ORDER: [CleanStage; 8] = [
        CleanStage::RawLoaded,
        CleanStage::TypesResolved,
        CleanStage::NumericGapsImputed,
        CleanStage::ResidualGapsSentineled,
        CleanStage::Deduplicated,
        CleanStage::TextTrimmed,
        CleanStage::DatasetSpecificClean,
        CleanStage::Persisted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RawLoaded => "raw_loaded",
            Self::TypesResolved => "types_resolved",
            Self::NumericGapsImputed => "numeric_gaps_imputed",
            Self::ResidualGapsSentineled => "residual_gaps_sentineled",
            Self::Deduplicated => "deduplicated",
            Self::TextTrimmed => "text_trimmed",
            Self::DatasetSpecificClean => "dataset_specific_clean",
            Self::Persisted => "persisted",
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        let idx = Self::ORDER.iter().position(|stage| *stage == self)?;
        Self::ORDER.get(idx + 1).copied()
    }
}

impl fmt::Display for CleanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts and notes collected while cleaning one table.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanReport {
    pub dataset: String,
    pub variant: &'static str,
    /// Stages completed, in order.
    pub stages: Vec<CleanStage>,
    pub rows_in: usize,
    pub rows_out: usize,
    pub na_markers_replaced: usize,
    pub inference_notes: Vec<InferenceNote>,
    pub numeric_cells_imputed: usize,
    pub sentinel_cells_filled: usize,
    pub duplicates_removed: usize,
    pub dataset_clean: DatasetCleanSummary,
    /// Resolved type per column, in table order.
    pub column_types: Vec<(String, ColumnType)>,
}

impl CleanReport {
    fn new(dataset: &str, variant: &'static str, rows_in: usize) -> Self {
        Self {
            dataset: dataset.to_string(),
            variant,
            stages: vec![CleanStage::RawLoaded],
            rows_in,
            rows_out: rows_in,
            na_markers_replaced: 0,
            inference_notes: Vec::new(),
            numeric_cells_imputed: 0,
            sentinel_cells_filled: 0,
            duplicates_removed: 0,
            dataset_clean: DatasetCleanSummary::default(),
            column_types: Vec::new(),
        }
    }

    /// Last stage completed.
    pub fn stage(&self) -> CleanStage {
        self.stages.last().copied().unwrap_or(CleanStage::RawLoaded)
    }

    fn advance(&mut self, stage: CleanStage) {
        self.stages.push(stage);
    }

    /// Record that the cleaned table has been written.
    pub fn mark_persisted(&mut self) {
        if self.stage() == CleanStage::DatasetSpecificClean {
            self.advance(CleanStage::Persisted);
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.stage() == CleanStage::Persisted
    }
}

/// A cleaned table and the report describing how it got there.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub frame: SurveyFrame,
    pub report: CleanReport,
}

/// Cleaning pipeline for one configured source.
pub struct CleaningPipeline {
    markers: NaMarkers,
    pinned_text: Vec<String>,
    cleaner: Box<dyn DatasetCleaner>,
    strict_inference: bool,
}

impl fmt::Debug for CleaningPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleaningPipeline")
            .field("markers", &self.markers.len())
            .field("pinned_text", &self.pinned_text)
            .field("cleaner", &self.cleaner.name())
            .field("strict_inference", &self.strict_inference)
            .finish()
    }
}

impl CleaningPipeline {
    /// Build the pipeline for a source, selecting its variant strategy once.
    ///
    /// Columns pinned to text are the source's own `text_columns` plus
    /// whatever the variant's rules depend on.
    pub fn for_source(source: &SourceConfig) -> Result<Self> {
        let mut pinned_text = source.text_columns.clone();
        for column in source.variant.pinned_text_columns() {
            if !pinned_text.iter().any(|pinned| pinned == column) {
                pinned_text.push(column.to_string());
            }
        }
        Ok(Self {
            markers: NaMarkers::new(source.na_markers.as_slice())?,
            pinned_text,
            cleaner: cleaner_for(&source.variant),
            strict_inference: false,
        })
    }

    /// Build a pipeline from explicit parts.
    pub fn new(markers: NaMarkers, pinned_text: Vec<String>, cleaner: Box<dyn DatasetCleaner>) -> Self {
        Self {
            markers,
            pinned_text,
            cleaner,
            strict_inference: false,
        }
    }

    /// Treat partially matching columns as an error instead of a note.
    #[must_use]
    pub fn with_strict_inference(mut self, strict: bool) -> Self {
        self.strict_inference = strict;
        self
    }

    pub fn variant(&self) -> &'static str {
        self.cleaner.name()
    }

    /// Run every stage up to [`CleanStage::DatasetSpecificClean`].
    pub fn run(&self, frame: SurveyFrame) -> Result<CleanOutcome> {
        let span = info_span!("clean", dataset = %frame.name, variant = self.variant());
        let _guard = span.enter();

        let mut report = CleanReport::new(&frame.name, self.variant(), frame.height());
        info!(rows = frame.height(), columns = frame.width(), "raw table loaded");

        let (marked, replaced) = replace_na_markers(&frame, &self.markers)?;
        let (typed, notes) = resolve_column_types(&marked, &self.pinned_text)?;
        if self.strict_inference
            && let Some(err) = notes.iter().find_map(InferenceNote::to_error)
        {
            return Err(err);
        }
        report.na_markers_replaced = replaced;
        report.inference_notes = notes;
        report.advance(CleanStage::TypesResolved);
        info!(
            na_markers = replaced,
            notes = report.inference_notes.len(),
            "column types resolved"
        );

        let (imputed, imputed_cells) = impute_numeric_means(&typed)?;
        report.numeric_cells_imputed = imputed_cells;
        report.advance(CleanStage::NumericGapsImputed);
        info!(cells = imputed_cells, "numeric gaps imputed");

        let (filled, filled_cells) = fill_missing(&imputed)?;
        report.sentinel_cells_filled = filled_cells;
        report.advance(CleanStage::ResidualGapsSentineled);
        info!(cells = filled_cells, "residual gaps filled with sentinel");

        let (deduped, duplicates) = deduplicate(&filled)?;
        report.duplicates_removed = duplicates;
        report.advance(CleanStage::Deduplicated);
        info!(rows = duplicates, "duplicates removed");

        let trimmed = trim_text_columns(&deduped)?;
        report.advance(CleanStage::TextTrimmed);

        debug!(cleaner = self.cleaner.name(), "{}", self.cleaner.description());
        let (cleaned, summary) = self.cleaner.clean(&trimmed)?;
        report.dataset_clean = summary;
        report.advance(CleanStage::DatasetSpecificClean);

        report.rows_out = cleaned.height();
        report.column_types = cleaned.typed_columns();
        info!(
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "table cleaned"
        );
        Ok(CleanOutcome {
            frame: cleaned,
            report,
        })
    }
}
