//! Per-source pipeline: ingest, clean, persist, and load back.

use anyhow::{Context, Result};
use survey_ingest::{IngestOptions, read_raw_csv};
use survey_model::{CleanConfig, SourceConfig};
use survey_output::{read_table, write_table};
use survey_transform::{CleanReport, CleaningPipeline, SurveyFrame};
use tracing::{info, info_span};

/// Read a source's raw CSV as an all-text frame.
pub fn ingest(config: &CleanConfig, source: &SourceConfig) -> Result<SurveyFrame> {
    let path = config.raw_path(source);
    let options = IngestOptions::with_null_values(source.null_values.clone());
    let data = read_raw_csv(&path, &options)
        .with_context(|| format!("ingest {} from {}", source.name, path.display()))?;
    Ok(SurveyFrame::raw(source.name.as_str(), data))
}

/// Clean one source and write the result next to its schema.
///
/// Nothing is written when any stage before persistence fails.
pub fn clean_source(
    config: &CleanConfig,
    source: &SourceConfig,
    strict_inference: bool,
) -> Result<CleanReport> {
    let span = info_span!("source", name = %source.name);
    let _guard = span.enter();

    let raw = ingest(config, source)?;
    let pipeline = CleaningPipeline::for_source(source)
        .with_context(|| format!("configure cleaning for {}", source.name))?
        .with_strict_inference(strict_inference);
    let outcome = pipeline
        .run(raw)
        .with_context(|| format!("clean {}", source.name))?;

    let output = config.clean_path(source);
    write_table(&outcome.frame, &output)
        .with_context(|| format!("write {}", output.display()))?;
    let mut report = outcome.report;
    report.mark_persisted();
    info!(
        rows = report.rows_out,
        output = %output.display(),
        "persisted cleaned table"
    );
    Ok(report)
}

/// Load a previously cleaned source through its persisted schema.
pub fn load_cleaned(config: &CleanConfig, source: &SourceConfig) -> Result<SurveyFrame> {
    let path = config.clean_path(source);
    read_table(&path).with_context(|| format!("load cleaned {}", source.name))
}
