//! Benchmark harness.
//!
//! Each dataset runs the pipeline load, validate, coerce, check-empty,
//! recursive sort, iterative sort, search, record timings, in that
//! order. A failing stage skips only its dataset; the run always
//! returns a [`BenchmarkReport`] covering every configured dataset.

use std::time::Instant;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::dataset::{self, DatasetError, Stage};
use crate::engine::{self, EngineError};
use crate::models::{
    BenchConfig, BenchmarkReport, DatasetOutcome, DatasetReport, DatasetSpec, Record,
    SearchOutcome, TimingSample, TimingSeries, REPORT_VERSION,
};

/// Run every configured dataset and collect the timings.
pub fn run_benchmark(config: &BenchConfig) -> BenchmarkReport {
    let mut series = TimingSeries::default();
    let mut outcomes = Vec::with_capacity(config.datasets.len());

    for spec in &config.datasets {
        let name = dataset::dataset_name(&spec.path);
        info!(dataset = %name, "processing dataset");

        match process_dataset(spec, config) {
            Ok(report) => {
                debug!(dataset = %name, stage = %Stage::RecordTimings, "recording timings");
                record_timings(&mut series, &report);
                outcomes.push(DatasetOutcome::Recorded(report));
            }
            Err(err) => {
                warn!(dataset = %name, stage = %err.stage(), "skipping dataset: {err}");
                outcomes.push(DatasetOutcome::Skipped {
                    dataset: name,
                    reason: err.to_string(),
                });
            }
        }
    }

    if series.recursive.is_empty() {
        warn!("no dataset produced timings");
    }

    BenchmarkReport {
        version: REPORT_VERSION.to_string(),
        generated_at: now_rfc3339(),
        sort_key: config.sort_key.clone(),
        search_key: config.search_key.clone(),
        outcomes,
        series,
    }
}

/// Run the full pipeline for a single dataset.
pub fn process_dataset(
    spec: &DatasetSpec,
    config: &BenchConfig,
) -> Result<DatasetReport, DatasetError> {
    debug!(stage = %Stage::Load, path = %spec.path.display());
    let mut data = dataset::load_dataset(&spec.path)?;

    debug!(stage = %Stage::Validate);
    dataset::validate_columns(&data, &[config.sort_key.as_str(), config.search_key.as_str()])?;

    debug!(stage = %Stage::Coerce);
    let coerced = dataset::coerce_numeric(&mut data, &config.sort_key);
    if coerced > 0 {
        warn!(
            dataset = %data.name,
            coerced,
            "non-numeric '{}' values replaced with 0",
            config.sort_key
        );
    }

    debug!(stage = %Stage::CheckEmpty);
    if data.is_empty() {
        return Err(DatasetError::Empty);
    }

    let size = data.len();
    info!(dataset = %data.name, size, "data size: {size} rows");

    let records = &data.records;
    let key = config.sort_key.as_str();

    let (recursive, recursive_seconds) =
        timed(|| engine::merge_sort_recursive(records, key));
    let recursive = recursive.map_err(at(Stage::SortRecursive))?;

    let (iterative, iterative_seconds) =
        timed(|| engine::merge_sort_iterative(records, key));
    let iterative = iterative.map_err(at(Stage::SortIterative))?;

    let sorted_ok =
        recursive == iterative && engine::is_sorted_by(&recursive, key).unwrap_or(false);
    if !sorted_ok {
        warn!(dataset = %data.name, "sort outputs disagree or are out of order");
    }
    info!(
        dataset = %data.name,
        recursive_seconds,
        iterative_seconds,
        "sorted {size} rows"
    );

    let search = match spec.search.as_deref() {
        Some(term) => Some(run_search(records, &config.search_key, term, &data.name)?),
        None => {
            debug!(dataset = %data.name, "no search requested");
            None
        }
    };

    Ok(DatasetReport {
        dataset: data.name.clone(),
        path: data.path.clone(),
        size,
        coerced,
        recursive_seconds,
        iterative_seconds,
        sorted_ok,
        search,
    })
}

fn run_search(
    records: &[Record],
    attribute: &str,
    term: &str,
    dataset: &str,
) -> Result<SearchOutcome, DatasetError> {
    let (hit, seconds) = timed(|| engine::linear_search(records, attribute, term));
    let hit = hit.map_err(at(Stage::Search))?;

    match &hit {
        Some(h) => info!(dataset, term, index = h.index, seconds, "search result: found"),
        None => info!(dataset, term, seconds, "search result: not found"),
    }

    Ok(SearchOutcome {
        term: term.to_string(),
        seconds,
        index: hit.as_ref().map(|h| h.index),
        record: hit.map(|h| h.item.clone()),
    })
}

fn record_timings(series: &mut TimingSeries, report: &DatasetReport) {
    series.recursive.push(TimingSample {
        size: report.size,
        seconds: report.recursive_seconds,
    });
    series.iterative.push(TimingSample {
        size: report.size,
        seconds: report.iterative_seconds,
    });
    if let Some(search) = &report.search {
        series.search.push(TimingSample {
            size: report.size,
            seconds: search.seconds,
        });
    }
}

fn at(stage: Stage) -> impl FnOnce(EngineError) -> DatasetError {
    move |source| DatasetError::Algorithm { stage, source }
}

/// Run `op` once and return its result with the elapsed seconds.
fn timed<R>(op: impl FnOnce() -> R) -> (R, f64) {
    let start = Instant::now();
    let out = op();
    (out, start.elapsed().as_secs_f64())
}

fn now_rfc3339() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}
