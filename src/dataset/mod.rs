//! Loading CSV sources into [`Dataset`]s.
//!
//! Every cell is read as text; [`coerce_numeric`] later turns the sort
//! column into numbers.

mod error;
pub mod generate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use globset::{Glob, GlobSet};
use ignore::WalkBuilder;
use tracing::debug;

use crate::models::{Dataset, FieldValue, Record};

pub use error::{DatasetError, Stage};

/// Include pattern used when walking a directory source.
pub const DEFAULT_GLOB: &str = "*.csv";

/// Expand sources into a list of dataset files.
///
/// Directories are walked (honoring ignore files) and filtered by the
/// include/exclude globs, sorted by path. Any other path, including a
/// nonexistent one, is passed through unchanged so the harness can
/// report it.
pub fn discover_sources(
    sources: &[PathBuf],
    globs: &[String],
    exclude_globs: &[String],
) -> Result<Vec<PathBuf>> {
    let include = if globs.is_empty() {
        build_globset(&[DEFAULT_GLOB.to_string()])?
    } else {
        build_globset(globs)?
    };
    let exclude = build_globset(exclude_globs)?;

    let mut files = Vec::new();
    for source in sources {
        if !source.is_dir() {
            files.push(source.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkBuilder::new(source).build() {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            if let Some(set) = &include {
                if !set.is_match(path) {
                    continue;
                }
            }
            if let Some(set) = &exclude {
                if set.is_match(path) {
                    continue;
                }
            }

            found.push(path.to_path_buf());
        }

        found.sort();
        debug!(source = %source.display(), files = found.len(), "walked dataset directory");
        files.extend(found);
    }

    if files.is_empty() && !sources.is_empty() {
        bail!("no dataset files matched the given sources");
    }

    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = globset::GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(Some(builder.build()?))
}

/// Display name for a dataset path.
pub fn dataset_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a CSV file with a header row.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let load_err = |source| DatasetError::Load {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(load_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(load_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(load_err)?;
        let mut record = Record::new();
        for (name, value) in headers.iter().zip(row.iter()) {
            record.set(name.clone(), FieldValue::Text(value.to_string()));
        }
        records.push(record);
    }

    Ok(Dataset {
        name: dataset_name(path),
        path: path.to_path_buf(),
        headers,
        records,
    })
}

/// Check that every `required` column is in the header.
pub fn validate_columns(dataset: &Dataset, required: &[&str]) -> Result<(), DatasetError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !dataset.headers.iter().any(|h| h.as_str() == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::Schema { missing })
    }
}

/// Convert the `column` of every record to a number.
///
/// Values that do not parse (or parse to NaN) become `0`. Returns how
/// many values were replaced that way.
pub fn coerce_numeric(dataset: &mut Dataset, column: &str) -> usize {
    let mut coerced = 0;

    for record in &mut dataset.records {
        let parsed = match record.get(column) {
            Some(FieldValue::Number(n)) => Some(*n),
            Some(FieldValue::Text(s)) => parse_number(s),
            None => None,
        };

        let value = parsed.unwrap_or_else(|| {
            coerced += 1;
            0.0
        });
        record.set(column, FieldValue::Number(value));
    }

    coerced
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_dataset_reads_header_and_rows_as_text() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("150.csv");
        fs::write(&path, "Skin Name,Quantity\nRedline,3\nVulcan,abc\n").expect("write");

        let dataset = load_dataset(&path).expect("load");

        assert_eq!(dataset.name, "150.csv");
        assert_eq!(dataset.headers, vec!["Skin Name", "Quantity"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.records[1].get("Quantity"),
            Some(&FieldValue::Text("abc".into()))
        );
    }

    #[test]
    fn load_dataset_reports_missing_file() {
        let dir = tempdir().expect("tempdir");
        let err = load_dataset(&dir.path().join("nope.csv")).expect_err("missing");
        assert!(matches!(err, DatasetError::Load { .. }));
        assert_eq!(err.stage(), Stage::Load);
    }

    #[test]
    fn load_dataset_rejects_ragged_rows() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("bad.csv");
        fs::write(&path, "Skin Name,Quantity\nRedline,3,extra\n").expect("write");

        assert!(matches!(
            load_dataset(&path),
            Err(DatasetError::Load { .. })
        ));
    }

    #[test]
    fn validate_columns_lists_every_missing_column() {
        let dataset = Dataset {
            name: "x".into(),
            path: PathBuf::from("x.csv"),
            headers: vec!["Price".into()],
            records: Vec::new(),
        };

        let err = validate_columns(&dataset, &["Quantity", "Skin Name"]).expect_err("schema");
        match err {
            DatasetError::Schema { missing } => {
                assert_eq!(missing, vec!["Quantity", "Skin Name"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn coerce_numeric_defaults_unparseable_values_to_zero() {
        let mut dataset = Dataset {
            name: "x".into(),
            path: PathBuf::from("x.csv"),
            headers: vec!["Quantity".into()],
            records: ["12", " 4.5 ", "abc", "", "NaN"]
                .iter()
                .map(|v| Record::new().with("Quantity", FieldValue::Text(v.to_string())))
                .collect(),
        };

        let coerced = coerce_numeric(&mut dataset, "Quantity");

        let values: Vec<f64> = dataset
            .records
            .iter()
            .filter_map(|r| r.get("Quantity").and_then(FieldValue::as_number))
            .collect();
        assert_eq!(values, vec![12.0, 4.5, 0.0, 0.0, 0.0]);
        assert_eq!(coerced, 3);
    }

    #[test]
    fn discover_sources_walks_directories_and_keeps_explicit_files() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("b.csv"), "Skin Name,Quantity\n").expect("write");
        fs::write(dir.path().join("a.csv"), "Skin Name,Quantity\n").expect("write");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");
        let explicit = dir.path().join("missing.csv");

        let files = discover_sources(
            &[dir.path().to_path_buf(), explicit.clone()],
            &[],
            &["*b.csv".to_string()],
        )
        .expect("discover");

        assert_eq!(files, vec![dir.path().join("a.csv"), explicit]);
    }
}
