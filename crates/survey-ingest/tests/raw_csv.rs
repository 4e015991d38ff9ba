use std::fs;
use std::path::PathBuf;

use polars::prelude::DataType;
use survey_ingest::{IngestError, IngestOptions, read_raw_csv};

fn temp_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_census_extract_with_markers_left_intact() {
    let dir = tempfile::tempdir().expect("temp dir");
    let contents = concat!(
        "\u{feff}Label (Grouping),Estimate,Percent\n",
        "SEX AND AGE,,\n",
        "    Total population,\"1,234\",(X)\n",
        "    Male,600,48.6%\n",
    );
    let path = temp_file(&dir, "dp05.csv", contents);
    let df = read_raw_csv(&path, &IngestOptions::default()).expect("read csv");

    assert_eq!(df.height(), 3);
    let label = df.column("Label (Grouping)").unwrap().str().unwrap();
    assert_eq!(label.get(0), Some("SEX AND AGE"));
    assert_eq!(label.get(1), Some("    Total population"));

    let estimate = df.column("Estimate").unwrap().str().unwrap();
    assert_eq!(estimate.get(0), None);
    assert_eq!(estimate.get(1), Some("1,234"));

    // NA markers are a cleaning concern; ingest keeps them as text.
    let percent = df.column("Percent").unwrap().str().unwrap();
    assert_eq!(percent.get(1), Some("(X)"));
    assert_eq!(percent.get(2), Some("48.6%"));
}

#[test]
fn reads_survey_extract_dates_as_text() {
    let dir = tempfile::tempdir().expect("temp dir");
    let contents = "Indicator,Group,Phase,Time Period Start Date,Value\n\
Symptoms of Anxiety Disorder,National Estimate,1,04/23/2020,30.8\n\
Symptoms of Anxiety Disorder,By Age,-1,05/07/2020,\n";
    let path = temp_file(&dir, "anxiety.csv", contents);
    let df = read_raw_csv(&path, &IngestOptions::default()).expect("read csv");

    assert_eq!(df.width(), 5);
    for column in df.get_columns() {
        assert_eq!(column.dtype(), &DataType::String, "{}", column.name());
    }
    let dates = df.column("Time Period Start Date").unwrap().str().unwrap();
    assert_eq!(dates.get(0), Some("04/23/2020"));
    let phase = df.column("Phase").unwrap().str().unwrap();
    assert_eq!(phase.get(1), Some("-1"));
    let value = df.column("Value").unwrap().str().unwrap();
    assert_eq!(value.get(1), None);
}

#[test]
fn header_only_file_yields_empty_frame() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_file(&dir, "header.csv", "A,B\n");
    let df = read_raw_csv(&path, &IngestOptions::default()).expect("read csv");
    assert_eq!(df.height(), 0);
    assert_eq!(df.width(), 2);
}

#[test]
fn ragged_row_reports_line() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_file(&dir, "ragged.csv", "A,B\n1,2\n3,4,5\n");
    let err = read_raw_csv(&path, &IngestOptions::default()).unwrap_err();
    match err {
        IngestError::RaggedRow {
            line,
            expected,
            found,
            ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(expected, 2);
            assert_eq!(found, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}
