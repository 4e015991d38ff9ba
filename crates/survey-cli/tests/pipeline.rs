//! End-to-end tests: raw CSV on disk through cleaning, persistence and reports.

use std::fs;
use std::path::Path;

use survey_cli::config::load_config;
use survey_cli::pipeline::{clean_source, load_cleaned};
use survey_model::{CellValue, CleanConfig, ColumnType, DatasetKind, SourceConfig};
use survey_output::PersistError;
use survey_report::{TrendOptions, quality_report, trend_series};
use survey_transform::CleanStage;

const SURVEY_CSV: &str = "\
Indicator,Group,Subgroup,Phase,Time Period Start Date,Value
Symptoms of Anxiety Disorder,By Age,18 - 29 years,1,04/23/2020,40.2
Symptoms of Anxiety Disorder,By Age,18 - 29 years,2,05/07/2020,(X)
Symptoms of Depressive Disorder,By Age,18 - 29 years,1,04/23/2020,30.0
Symptoms of Anxiety Disorder,By Age,30 - 39 years,1,04/23/2020,35.0
Symptoms of Anxiety Disorder,By Age,30 - 39 years,1,04/23/2020,35.0
Symptoms of Anxiety Disorder,By State,Alabama,-1,04/23/2020,29.0
";

const CENSUS_CSV: &str = concat!(
    "Label (Grouping),Total!!Estimate,Total!!Percent\n",
    "SEX AND AGE,,\n",
    "    Total population,\"1,234\",(X)\n",
    "    Male,600,48.6%\n",
    "    Female,634,110\n",
);

fn write_raw(dir: &Path) {
    let raw = dir.join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("survey.csv"), SURVEY_CSV).unwrap();
    fs::write(raw.join("dp05.csv"), CENSUS_CSV).unwrap();
}

fn test_config(dir: &Path) -> CleanConfig {
    CleanConfig {
        raw_dir: dir.join("raw"),
        clean_dir: dir.join("clean"),
        sources: vec![
            SourceConfig::new(
                "anxiety_trends",
                "survey.csv",
                "anxiety_trends.csv",
                DatasetKind::symptom_survey(),
            ),
            SourceConfig::new(
                "demographics",
                "dp05.csv",
                "demographics.csv",
                DatasetKind::census_extract(),
            ),
        ],
    }
}

#[test]
fn survey_source_is_cleaned_persisted_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path());
    let config = test_config(dir.path());
    let source = &config.sources[0];

    let report = clean_source(&config, source, false).unwrap();
    assert!(report.is_persisted());
    assert_eq!(report.stage(), CleanStage::Persisted);
    assert_eq!(report.rows_in, 6);
    assert_eq!(report.rows_out, 3);
    assert_eq!(report.na_markers_replaced, 1);
    assert_eq!(report.numeric_cells_imputed, 1);
    assert_eq!(report.duplicates_removed, 1);
    assert!(config.clean_dir.join("anxiety_trends.json").exists());

    let frame = load_cleaned(&config, source).unwrap();
    assert_eq!(frame.height(), 3);
    assert!(!frame.schema.contains("Indicator"));
    assert_eq!(frame.column_type("Phase"), Some(ColumnType::Text));
    assert_eq!(frame.column_type("Time Period Start Date"), Some(ColumnType::Date));
    let values: Vec<f64> = frame
        .cells("Value")
        .unwrap()
        .iter()
        .filter_map(CellValue::as_f64)
        .collect();
    let mean = (40.2 + 30.0 + 35.0 + 35.0 + 29.0) / 5.0;
    assert_eq!(values.len(), 3);
    assert!((values[1] - mean).abs() < 1e-9);

    let quality = quality_report(&frame).unwrap();
    assert_eq!(quality.missing_cells, 0);
    assert_eq!(quality.duplicate_rows, 0);

    let series = trend_series(&frame, &TrendOptions::default(), "By Age").unwrap();
    let subgroups: Vec<&str> = series.iter().map(|s| s.subgroup.as_str()).collect();
    assert_eq!(subgroups, vec!["18 - 29 years", "30 - 39 years"]);
    assert_eq!(series[0].points.len(), 2);
}

#[test]
fn census_source_drops_dividers_and_repairs_percentages() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path());
    let config = test_config(dir.path());
    let source = &config.sources[1];

    let report = clean_source(&config, source, false).unwrap();
    assert_eq!(report.rows_out, 3);
    assert_eq!(report.dataset_clean.percent_repairs, Some(1));

    let frame = load_cleaned(&config, source).unwrap();
    assert_eq!(
        frame.cells("Label (Grouping)").unwrap(),
        vec![
            CellValue::text("Total population"),
            CellValue::text("Male"),
            CellValue::text("Female"),
        ]
    );
    let percents = frame.cells("Total!!Percent").unwrap();
    assert_eq!(percents[1], CellValue::Number(48.6));
    assert_eq!(percents[2], CellValue::Number(0.0));
    assert_eq!(
        frame.cells("Total!!Estimate").unwrap()[0],
        CellValue::Number(1234.0)
    );
}

#[test]
fn reporting_before_cleaning_asks_for_a_clean() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path());
    let config = test_config(dir.path());

    let err = load_cleaned(&config, &config.sources[0]).unwrap_err();
    let persist = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<PersistError>())
        .expect("persist error in chain");
    assert!(persist.is_missing_artifact());
    assert!(format!("{err:#}").contains("must be cleaned first"));
}

#[test]
fn failed_clean_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path());
    fs::write(
        dir.path().join("raw/survey.csv"),
        "Indicator,Group,Value\nSymptoms of Anxiety Disorder,By Age,1.0\n",
    )
    .unwrap();
    let config = test_config(dir.path());

    let err = clean_source(&config, &config.sources[0], false).unwrap_err();
    assert!(format!("{err:#}").contains("Phase"));
    assert!(!config.clean_dir.join("anxiety_trends.csv").exists());
    assert!(!config.clean_dir.join("anxiety_trends.json").exists());
}

#[test]
fn toml_config_resolves_relative_directories() {
    let dir = tempfile::tempdir().unwrap();
    write_raw(dir.path());
    let config_path = dir.path().join("survey.toml");
    fs::write(
        &config_path,
        r#"
raw_dir = "raw"
clean_dir = "clean"

[[sources]]
name = "anxiety_trends"
raw_file = "survey.csv"
clean_file = "anxiety_trends.csv"

[sources.variant]
type = "symptom_survey"
"#,
    )
    .unwrap();

    let config = load_config(Some(&config_path), Path::new("unused")).unwrap();
    assert_eq!(config.raw_dir, dir.path().join("raw"));
    assert!(config.sources[0].text_columns.is_empty());
    let report = clean_source(&config, &config.sources[0], false).unwrap();
    assert_eq!(report.rows_out, 3);

    let frame = load_cleaned(&config, &config.sources[0]).unwrap();
    assert_eq!(frame.column_type("Phase"), Some(ColumnType::Text));
    assert!(
        !frame
            .cells("Phase")
            .unwrap()
            .contains(&CellValue::text("-1"))
    );
}
