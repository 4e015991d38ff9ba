use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_common::format_numeric;
use survey_report::{
    ColumnProfile, ColumnQuality, GroupDescription, NumericSummary, QualityReport, TrendSeries,
};
use survey_transform::CleanReport;

use crate::types::CleanRunResult;

/// Distinct text values shown per column before eliding.
const MAX_DISTINCT_SHOWN: usize = 6;

pub fn print_clean_summary(result: &CleanRunResult) {
    println!("Output: {}", result.clean_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Variant"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("NA markers"),
        header_cell("Imputed"),
        header_cell("Sentinels"),
        header_cell("Duplicates"),
        header_cell("Dropped"),
        header_cell("% repairs"),
        header_cell("Stage"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..10 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_in = 0usize;
    let mut total_out = 0usize;
    for report in &result.reports {
        total_in += report.rows_in;
        total_out += report.rows_out;
        table.add_row(vec![
            Cell::new(&report.dataset)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(report.variant),
            Cell::new(report.rows_in),
            Cell::new(report.rows_out),
            count_cell(Some(report.na_markers_replaced), Color::Yellow),
            count_cell(Some(report.numeric_cells_imputed), Color::Yellow),
            count_cell(Some(report.sentinel_cells_filled), Color::Yellow),
            count_cell(Some(report.duplicates_removed), Color::Yellow),
            count_cell(Some(report.dataset_clean.rows_removed), Color::Yellow),
            count_cell(report.dataset_clean.percent_repairs, Color::Yellow),
            stage_cell(report),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_in).add_attribute(Attribute::Bold),
        Cell::new(total_out).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_inference_notes(&result.reports);
    if result.has_errors() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_inference_notes(reports: &[CleanReport]) {
    let notes: Vec<(&str, String)> = reports
        .iter()
        .flat_map(|report| {
            report
                .inference_notes
                .iter()
                .map(move |note| (report.dataset.as_str(), note.to_string()))
        })
        .collect();
    if notes.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Source"), header_cell("Type inference note")]);
    apply_table_style(&mut table);
    for (dataset, note) in notes {
        table.add_row(vec![Cell::new(dataset), Cell::new(note).fg(Color::Yellow)]);
    }
    println!();
    println!("Notes:");
    println!("{table}");
}

pub fn print_quality_reports(reports: &[QualityReport]) {
    for (index, report) in reports.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!(
            "Dataset: {}  rows: {}  missing cells: {}  duplicate rows: {}",
            report.dataset, report.rows, report.missing_cells, report.duplicate_rows
        );

        let mut columns = Table::new();
        columns.set_header(vec![
            header_cell("Column"),
            header_cell("Type"),
            header_cell("Missing"),
            header_cell("Profile"),
        ]);
        apply_table_style(&mut columns);
        align_column(&mut columns, 2, CellAlignment::Right);
        for column in &report.columns {
            columns.add_row(vec![
                Cell::new(&column.name),
                Cell::new(column.column_type),
                count_cell(Some(column.missing), Color::Red),
                Cell::new(profile_text(column)),
            ]);
        }
        println!("{columns}");

        let numeric: Vec<(&str, &NumericSummary)> = report
            .columns
            .iter()
            .filter_map(|column| match &column.profile {
                ColumnProfile::Number(Some(summary)) => Some((column.name.as_str(), summary)),
                _ => None,
            })
            .collect();
        if !numeric.is_empty() {
            let mut stats = numeric_table("Column");
            for (name, summary) in numeric {
                stats.add_row(numeric_row(name, summary));
            }
            println!("{stats}");
        }
    }
}

fn profile_text(column: &ColumnQuality) -> String {
    match &column.profile {
        ColumnProfile::Number(Some(summary)) => format!("{} values", summary.count),
        ColumnProfile::Number(None) => "no values".to_string(),
        ColumnProfile::Date(range) => {
            let bounds = match (range.earliest, range.latest) {
                (Some(earliest), Some(latest)) => format!("{earliest} to {latest}"),
                _ => "no dates".to_string(),
            };
            if range.sentinels > 0 {
                format!("{bounds} ({} sentinel)", range.sentinels)
            } else {
                bounds
            }
        }
        ColumnProfile::Text(values) => {
            let shown: Vec<&str> = values
                .iter()
                .take(MAX_DISTINCT_SHOWN)
                .map(String::as_str)
                .collect();
            let mut text = format!("{} distinct: {}", values.len(), shown.join(", "));
            if values.len() > MAX_DISTINCT_SHOWN {
                text.push_str(", ...");
            }
            text
        }
    }
}

pub fn print_descriptions(groups: &[GroupDescription]) {
    if groups.is_empty() {
        println!("No groups to describe.");
        return;
    }
    for group in groups {
        println!("Group: {}", group.group);
        let mut table = numeric_table("Subgroup / column");
        for subgroup in &group.subgroups {
            if subgroup.columns.is_empty() {
                table.add_row(vec![
                    Cell::new(&subgroup.subgroup),
                    dim_cell(format!("{} rows, no numbers", subgroup.rows)),
                ]);
                continue;
            }
            for (column, summary) in &subgroup.columns {
                table.add_row(numeric_row(&format!("{} / {}", subgroup.subgroup, column), summary));
            }
        }
        println!("{table}");
    }
}

pub fn print_trends(group: &str, series: &[TrendSeries]) {
    println!("Group: {group}");
    let mut by_date = BTreeMap::new();
    for (index, line) in series.iter().enumerate() {
        for point in &line.points {
            let row = by_date
                .entry(point.date)
                .or_insert_with(|| vec![Vec::new(); series.len()]);
            row[index].push(point.value);
        }
    }

    let mut header = vec![header_cell("Date")];
    header.extend(series.iter().map(|line| header_cell(&line.subgroup)));
    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=series.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (date, values) in by_date {
        let mut row = vec![Cell::new(date)];
        row.extend(values.iter().map(|points| {
            if points.is_empty() {
                dim_cell("-")
            } else {
                let text: Vec<String> = points.iter().map(|value| format_numeric(*value)).collect();
                Cell::new(text.join(" / "))
            }
        }));
        table.add_row(row);
    }
    println!("{table}");
}

fn numeric_table(first: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(first),
        header_cell("count"),
        header_cell("mean"),
        header_cell("std"),
        header_cell("min"),
        header_cell("25%"),
        header_cell("50%"),
        header_cell("75%"),
        header_cell("max"),
    ]);
    apply_table_style(&mut table);
    for index in 1..9 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

fn numeric_row(label: &str, summary: &NumericSummary) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(summary.count),
        Cell::new(format_numeric(summary.mean)),
        summary
            .std
            .map_or_else(|| dim_cell("-"), |std| Cell::new(format_numeric(std))),
        Cell::new(format_numeric(summary.min)),
        Cell::new(format_numeric(summary.q25)),
        Cell::new(format_numeric(summary.median)),
        Cell::new(format_numeric(summary.q75)),
        Cell::new(format_numeric(summary.max)),
    ]
}

fn stage_cell(report: &CleanReport) -> Cell {
    if report.is_persisted() {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new(report.stage()).fg(Color::Yellow)
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
