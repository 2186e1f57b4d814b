//! Shared data models for records, datasets, timings, and reports.
//!
//! These types form the stable JSON surface emitted by
//! `mergebench run --format json`.

use std::fmt;
use std::path::PathBuf;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Schema version for `BenchmarkReport` JSON payloads.
///
/// MAJOR bumps break required fields, MINOR bumps add optional
/// fields, PATCH is documentation only.
pub const REPORT_VERSION: &str = "1.0.0";

/// Default attribute used to order records.
pub const DEFAULT_SORT_KEY: &str = "Quantity";

/// Default attribute used for name lookups.
pub const DEFAULT_SEARCH_KEY: &str = "Skin Name";

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// One row of tabular data.
///
/// Fields keep the column order of the source header so that
/// re-emitting a record (CSV or JSON) preserves the layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An ordered sequence of records loaded from one source.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Display name (file name of the source).
    pub name: String,
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Merge sort variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    Recursive,
    Iterative,
}

/// A single dataset source plus the term to look up in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSpec {
    pub path: PathBuf,
    /// `None` means no search was requested for this dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Core configuration for a benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchConfig {
    pub datasets: Vec<DatasetSpec>,
    pub sort_key: String,
    pub search_key: String,
}

/// Elapsed time of one operation on one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingSample {
    /// Number of records in the dataset.
    pub size: usize,
    pub seconds: f64,
}

/// Timing series for each measured operation, in dataset order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingSeries {
    pub recursive: Vec<TimingSample>,
    pub iterative: Vec<TimingSample>,
    pub search: Vec<TimingSample>,
}

/// Result of the search stage for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub term: String,
    pub seconds: f64,
    /// Index of the first matching record in load order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.record.is_some()
    }
}

/// Measurements for a dataset that completed the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub dataset: String,
    pub path: PathBuf,
    pub size: usize,
    /// Number of sort-key values that were not numeric and became 0.
    pub coerced: usize,
    pub recursive_seconds: f64,
    pub iterative_seconds: f64,
    /// Both sort outputs agree and are ordered by the sort key.
    pub sorted_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchOutcome>,
}

/// Terminal state of one dataset's pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DatasetOutcome {
    Recorded(DatasetReport),
    Skipped { dataset: String, reason: String },
}

impl DatasetOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, DatasetOutcome::Recorded(_))
    }
}

/// Everything a single benchmark run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub version: String,
    /// RFC 3339 timestamp of when the run finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub sort_key: String,
    pub search_key: String,
    pub outcomes: Vec<DatasetOutcome>,
    pub series: TimingSeries,
}

impl BenchmarkReport {
    pub fn recorded(&self) -> impl Iterator<Item = &DatasetReport> {
        self.outcomes.iter().filter_map(|o| match o {
            DatasetOutcome::Recorded(report) => Some(report),
            DatasetOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_recorded()).count()
    }

    /// True when at least one dataset produced timings.
    pub fn has_data(&self) -> bool {
        !self.series.recursive.is_empty()
    }
}
