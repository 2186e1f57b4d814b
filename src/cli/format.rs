use std::cmp;

use anyhow::Result;

use crate::models::{BenchmarkReport, DatasetOutcome, Record};

/// Message printed when no dataset produced timings.
pub const NO_DATA_MESSAGE: &str = "No valid data to plot.";

/// One row of the table view.
struct DisplayRow {
    dataset: String,
    size: String,
    recursive: String,
    iterative: String,
    search: String,
    status: String,
}

/// Render a `BenchmarkReport` as a per-dataset narrative.
pub fn print_text(report: &BenchmarkReport) -> Result<()> {
    for outcome in &report.outcomes {
        match outcome {
            DatasetOutcome::Recorded(r) => {
                println!("{}: {} rows", r.dataset, r.size);
                if r.coerced > 0 {
                    println!(
                        "  coerced    : {} non-numeric '{}' value(s) to 0",
                        r.coerced, report.sort_key
                    );
                }
                println!("  recursive  : {}", format_seconds(r.recursive_seconds));
                println!("  iterative  : {}", format_seconds(r.iterative_seconds));
                if !r.sorted_ok {
                    println!("  warning    : sort outputs disagree");
                }
                match &r.search {
                    Some(search) => {
                        let result = match search.index {
                            Some(idx) => format!("found at row {}", idx + 1),
                            None => "not found".to_string(),
                        };
                        println!(
                            "  search     : '{}' {} ({})",
                            search.term,
                            result,
                            format_seconds(search.seconds)
                        );
                        if let Some(record) = &search.record {
                            println!("  record     : {}", format_record(record));
                        }
                    }
                    None => println!("  search     : not requested"),
                }
            }
            DatasetOutcome::Skipped { dataset, reason } => {
                println!("{dataset}: skipped ({reason})");
            }
        }
    }

    if !report.has_data() {
        println!("{NO_DATA_MESSAGE}");
    }

    Ok(())
}

/// Render a `BenchmarkReport` as a simple table.
///
/// Columns: DATASET, SIZE, RECURSIVE, ITERATIVE, SEARCH, STATUS.
pub fn print_table(report: &BenchmarkReport) -> Result<()> {
    let rows = build_rows(report);

    if rows.is_empty() {
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    }

    const MAX_DATASET_WIDTH: usize = 40;
    const MAX_STATUS_WIDTH: usize = 50;

    let headers = ["DATASET", "SIZE", "RECURSIVE", "ITERATIVE", "SEARCH", "STATUS"];
    let dataset_width = cmp::min(
        column_width(headers[0], rows.iter().map(|r| r.dataset.chars().count())),
        MAX_DATASET_WIDTH,
    );
    let size_width = column_width(headers[1], rows.iter().map(|r| r.size.len()));
    let recursive_width = column_width(headers[2], rows.iter().map(|r| r.recursive.len()));
    let iterative_width = column_width(headers[3], rows.iter().map(|r| r.iterative.len()));
    let search_width = column_width(headers[4], rows.iter().map(|r| r.search.len()));
    let status_width = cmp::min(
        column_width(headers[5], rows.iter().map(|r| r.status.chars().count())),
        MAX_STATUS_WIDTH,
    );

    println!(
        "{:<dataset_width$} {:>size_width$} {:>recursive_width$} {:>iterative_width$} {:>search_width$} {:<status_width$}",
        headers[0], headers[1], headers[2], headers[3], headers[4], headers[5]
    );

    for row in &rows {
        println!(
            "{:<dataset_width$} {:>size_width$} {:>recursive_width$} {:>iterative_width$} {:>search_width$} {:<status_width$}",
            truncate(&row.dataset, dataset_width),
            row.size,
            row.recursive,
            row.iterative,
            row.search,
            truncate(&row.status, status_width)
        );
    }

    if !report.has_data() {
        println!("{NO_DATA_MESSAGE}");
    }

    Ok(())
}

fn column_width(header: &str, values: impl Iterator<Item = usize>) -> usize {
    cmp::max(header.len(), values.max().unwrap_or(0))
}

fn build_rows(report: &BenchmarkReport) -> Vec<DisplayRow> {
    report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            DatasetOutcome::Recorded(r) => DisplayRow {
                dataset: r.dataset.clone(),
                size: r.size.to_string(),
                recursive: format_seconds(r.recursive_seconds),
                iterative: format_seconds(r.iterative_seconds),
                search: r
                    .search
                    .as_ref()
                    .map(|s| format_seconds(s.seconds))
                    .unwrap_or_else(|| "-".to_string()),
                status: match &r.search {
                    Some(s) if s.found() => "ok, found".to_string(),
                    Some(_) => "ok, not found".to_string(),
                    None => "ok".to_string(),
                },
            },
            DatasetOutcome::Skipped { dataset, reason } => DisplayRow {
                dataset: dataset.clone(),
                size: "-".to_string(),
                recursive: "-".to_string(),
                iterative: "-".to_string(),
                search: "-".to_string(),
                status: format!("skipped: {reason}"),
            },
        })
        .collect()
}

/// Render a record as `name=value` pairs in header order.
pub fn format_record(record: &Record) -> String {
    record
        .fields()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_seconds(secs: f64) -> String {
    format!("{secs:.6}s")
}

fn truncate(s: &str, max_width: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_width {
        s.to_string()
    } else if max_width <= 1 {
        "…".to_string()
    } else {
        s.chars()
            .take(max_width.saturating_sub(1))
            .collect::<String>()
            + "…"
    }
}
