use std::time::Instant;

use anyhow::Result;
use survey_model::CleanConfig;
use survey_report::{
    DescribeOptions, GroupDescription, QualityReport, TrendOptions, TrendSeries, describe_groups,
    quality_report, trend_series,
};
use tracing::{error, info, info_span};

use survey_cli::config::{find_source, select_sources};
use survey_cli::pipeline::{clean_source, load_cleaned};

use crate::cli::{CleanArgs, DescribeArgs, ReportArgs, TrendsArgs};
use crate::types::CleanRunResult;

/// Clean each selected source in turn. A failing source is recorded and the
/// run moves on to the next one.
pub fn run_clean(config: &CleanConfig, args: &CleanArgs) -> Result<CleanRunResult> {
    let sources = select_sources(config, &args.sources)?;
    let span = info_span!("clean_all", sources = sources.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut result = CleanRunResult {
        clean_dir: config.clean_dir.clone(),
        ..CleanRunResult::default()
    };
    for source in sources {
        match clean_source(config, source, args.strict_inference) {
            Ok(report) => result.reports.push(report),
            Err(err) => {
                error!(source = %source.name, error = %format!("{err:#}"), "cleaning failed");
                result.errors.push(format!("{}: {err:#}", source.name));
            }
        }
    }
    info!(
        cleaned = result.reports.len(),
        failed = result.errors.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "clean run finished"
    );
    Ok(result)
}

pub fn run_report(config: &CleanConfig, args: &ReportArgs) -> Result<Vec<QualityReport>> {
    let sources = select_sources(config, &args.sources)?;
    let mut reports = Vec::with_capacity(sources.len());
    for source in sources {
        let frame = load_cleaned(config, source)?;
        reports.push(quality_report(&frame)?);
    }
    Ok(reports)
}

pub fn run_describe(config: &CleanConfig, args: &DescribeArgs) -> Result<Vec<GroupDescription>> {
    let source = find_source(config, &args.source)?;
    let frame = load_cleaned(config, source)?;
    let excluded = if args.all_groups {
        Vec::new()
    } else {
        args.exclude_groups.clone()
    };
    let options = DescribeOptions::default().excluding(excluded);
    Ok(describe_groups(&frame, &options)?)
}

pub fn run_trends(config: &CleanConfig, args: &TrendsArgs) -> Result<Vec<TrendSeries>> {
    let source = find_source(config, &args.source)?;
    let frame = load_cleaned(config, source)?;
    Ok(trend_series(&frame, &TrendOptions::default(), &args.group)?)
}
