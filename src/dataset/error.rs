use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Pipeline stage a dataset passes through during a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Validate,
    Coerce,
    CheckEmpty,
    SortRecursive,
    SortIterative,
    Search,
    RecordTimings,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Validate => "validate",
            Stage::Coerce => "coerce",
            Stage::CheckEmpty => "check-empty",
            Stage::SortRecursive => "recursive sort",
            Stage::SortIterative => "iterative sort",
            Stage::Search => "search",
            Stage::RecordTimings => "record timings",
        };
        f.write_str(name)
    }
}

/// Reasons a dataset is skipped.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Source missing, unreadable, or not well-formed CSV.
    #[error("failed to load '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required columns are absent from the header.
    #[error("required column(s) missing: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// No rows remained after preprocessing.
    #[error("dataset is empty after preprocessing")]
    Empty,

    /// The engine rejected the records.
    #[error("error during {stage}: {source}")]
    Algorithm {
        stage: Stage,
        #[source]
        source: EngineError,
    },
}

impl DatasetError {
    /// Stage at which the pipeline stopped.
    pub fn stage(&self) -> Stage {
        match self {
            DatasetError::Load { .. } => Stage::Load,
            DatasetError::Schema { .. } => Stage::Validate,
            DatasetError::Empty => Stage::CheckEmpty,
            DatasetError::Algorithm { stage, .. } => *stage,
        }
    }
}
