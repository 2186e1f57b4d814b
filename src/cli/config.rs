use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::args::OutputFormat;
use crate::cli::{GenerateArgs, RunArgs};

/// Top-level representation of `.mergebench/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub run: Option<RunSection>,

    #[serde(default)]
    pub generate: Option<GenerateSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunSection {
    /// Sources without their own search term.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    #[serde(default)]
    pub datasets: Vec<DatasetEntry>,
    #[serde(default)]
    pub globs: Vec<String>,
    #[serde(default, alias = "exclude")]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub search_key: Option<String>,
    #[serde(default)]
    pub search_all: Option<String>,
    #[serde(default)]
    pub chart: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// One `[[run.datasets]]` entry: a source and the term to search in it.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateSection {
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_quantity: Option<u32>,
}

/// Discover and load a project-local `.mergebench/config.toml`
/// starting from the current working directory and walking up parent
/// directories.
pub fn load_cli_config() -> Result<Option<CliConfig>> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let Some(path) = find_project_config(&cwd) else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: CliConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse TOML config at {}", path.display()))?;

    Ok(Some(config))
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);

    while let Some(current) = dir {
        let config_toml = current.join(".mergebench").join("config.toml");
        if config_toml.is_file() {
            return Some(config_toml);
        }

        dir = current.parent();
    }

    None
}

pub fn apply_run_config_defaults(config: &CliConfig, args: &mut RunArgs) {
    let Some(run) = &config.run else {
        return;
    };

    if args.sources.is_empty() {
        args.sources = run.sources.clone();
        for entry in &run.datasets {
            args.sources.push(entry.path.clone());
            if let Some(term) = &entry.search {
                args.dataset_searches.push((entry.path.clone(), term.clone()));
            }
        }
    }

    if args.globs.is_empty() && !run.globs.is_empty() {
        args.globs = run.globs.clone();
    }

    if args.exclude_globs.is_empty() && !run.exclude_globs.is_empty() {
        args.exclude_globs = run.exclude_globs.clone();
    }

    if args.sort_key.is_none() {
        args.sort_key = run.sort_key.clone();
    }

    if args.search_key.is_none() {
        args.search_key = run.search_key.clone();
    }

    if args.search_all.is_none() {
        args.search_all = run.search_all.clone();
    }

    if args.chart.is_none() {
        args.chart = run.chart.clone();
    }

    if matches!(args.format, OutputFormat::Text) {
        if let Some(format) = run.format {
            args.format = format;
        }
    }
}

pub fn apply_generate_config_defaults(config: &CliConfig, args: &mut GenerateArgs) {
    let Some(generate) = &config.generate else {
        return;
    };

    if args.rows.is_none() {
        args.rows = generate.rows;
    }

    if args.seed.is_none() {
        args.seed = generate.seed;
    }

    if args.max_quantity.is_none() {
        args.max_quantity = generate.max_quantity;
    }
}
