use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::dataset::{self, generate::GenerateOptions};
use crate::models::{
    BenchConfig, DatasetSpec, SortAlgorithm, DEFAULT_SEARCH_KEY, DEFAULT_SORT_KEY,
};

/// Top-level CLI entrypoint for `mergebench`.
#[derive(Parser, Debug)]
#[command(
    name = "mergebench",
    about = "Benchmark recursive and iterative merge sort plus linear search over CSV data",
    author = "mergebench developers",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    /// Print the JSON schema version used for `--format=json` output
    /// and exit.
    #[arg(long = "schema-version")]
    pub schema_version: bool,

    /// Only log warnings and errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every pipeline stage.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Time both merge sorts and a search over each dataset.
    Run(RunArgs),
    /// Sort one CSV file by its numeric key and print it.
    Sort(SortArgs),
    /// Print the first record whose name matches, ignoring case.
    Search(SearchArgs),
    /// Write a synthetic dataset.
    Generate(GenerateArgs),
}

/// Arguments specific to the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// CSV files or directories holding CSV files.
    pub sources: Vec<PathBuf>,

    /// Inclusion globs applied to files found in directories.
    ///
    /// Defaults to `*.csv`.
    #[arg(long = "glob")]
    pub globs: Vec<String>,

    /// Exclusion globs applied to files found in directories.
    #[arg(long = "exclude")]
    pub exclude_globs: Vec<String>,

    /// Numeric column to sort by.
    #[arg(long = "sort-key")]
    pub sort_key: Option<String>,

    /// Text column to search.
    #[arg(long = "search-key")]
    pub search_key: Option<String>,

    /// Search term for one dataset, as `PATH=TERM`.
    ///
    /// PATH may be the full path given on the command line or just
    /// the file name. Repeat for several datasets.
    #[arg(long = "search", value_name = "PATH=TERM")]
    pub searches: Vec<String>,

    /// Search term used for every dataset without its own `--search`.
    #[arg(long = "search-all", value_name = "TERM")]
    pub search_all: Option<String>,

    /// Write a two-panel SVG runtime chart to this path.
    #[arg(long = "chart")]
    pub chart: Option<PathBuf>,

    /// Output format (text, table, or json).
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Search terms from `[[run.datasets]]`, consulted after `--search`.
    #[arg(skip)]
    pub dataset_searches: Vec<(PathBuf, String)>,
}

/// Arguments specific to the `sort` subcommand.
#[derive(Args, Debug)]
pub struct SortArgs {
    /// CSV file to sort.
    pub file: PathBuf,

    /// Merge sort variant.
    #[arg(long = "algorithm", value_enum, default_value_t = SortAlgorithmArg::Recursive)]
    pub algorithm: SortAlgorithmArg,

    /// Numeric column to sort by.
    #[arg(long = "sort-key")]
    pub sort_key: Option<String>,
}

/// Arguments specific to the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// CSV file to search.
    pub file: PathBuf,

    /// Name to look for (case-insensitive, whole value).
    pub term: String,

    /// Text column to search.
    #[arg(long = "search-key")]
    pub search_key: Option<String>,

    /// Output format (text or json).
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments specific to the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of data rows to write.
    #[arg(long = "rows")]
    pub rows: Option<usize>,

    /// Seed for the random generator.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Exclusive upper bound for quantities.
    #[arg(long = "max-quantity")]
    pub max_quantity: Option<u32>,

    /// Output file (stdout when omitted).
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,
}

/// CLI representation of output format.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Table,
    Json,
}

/// CLI representation of the merge sort variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithmArg {
    Recursive,
    Iterative,
}

impl SortAlgorithmArg {
    pub fn to_model(self) -> SortAlgorithm {
        match self {
            SortAlgorithmArg::Recursive => SortAlgorithm::Recursive,
            SortAlgorithmArg::Iterative => SortAlgorithm::Iterative,
        }
    }
}

/// Build a core `BenchConfig` from CLI `RunArgs`.
pub fn bench_config_from_args(args: &RunArgs) -> Result<BenchConfig> {
    if args.sources.is_empty() {
        bail!("at least one dataset source is required");
    }

    let sort_key = args.sort_key.as_deref().unwrap_or(DEFAULT_SORT_KEY);
    let search_key = args.search_key.as_deref().unwrap_or(DEFAULT_SEARCH_KEY);
    if sort_key == search_key {
        bail!("sort key and search key must be different columns (both are '{sort_key}')");
    }

    let mut searches = parse_search_terms(&args.searches)?;
    searches.extend(
        args.dataset_searches
            .iter()
            .map(|(path, term)| (path.clone(), term.trim().to_string()))
            .filter(|(_, term)| !term.is_empty()),
    );
    let files = dataset::discover_sources(&args.sources, &args.globs, &args.exclude_globs)?;
    let fallback = args
        .search_all
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let datasets = files
        .into_iter()
        .map(|path| {
            let search = searches
                .iter()
                .find(|(target, _)| search_target_matches(target, &path))
                .map(|(_, term)| term.as_str())
                .or(fallback)
                .map(str::to_string);
            DatasetSpec { path, search }
        })
        .collect();

    Ok(BenchConfig {
        datasets,
        sort_key: sort_key.to_string(),
        search_key: search_key.to_string(),
    })
}

/// Parse `PATH=TERM` pairs. An empty term means "no search" and the
/// pair is dropped.
fn parse_search_terms(raw: &[String]) -> Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::with_capacity(raw.len());
    for entry in raw {
        let Some((path, term)) = entry.split_once('=') else {
            bail!("invalid --search value '{entry}': expected PATH=TERM");
        };
        if path.is_empty() {
            bail!("invalid --search value '{entry}': PATH must not be empty");
        }
        let term = term.trim();
        if !term.is_empty() {
            out.push((PathBuf::from(path), term.to_string()));
        }
    }
    Ok(out)
}

fn search_target_matches(target: &Path, path: &Path) -> bool {
    // A directory target covers every file discovered under it.
    if path.starts_with(target) {
        return true;
    }
    // A bare file name matches any dataset with that name.
    target.components().count() == 1 && path.file_name() == Some(target.as_os_str())
}

/// Build generator options from CLI `GenerateArgs`.
pub fn generate_options_from_args(args: &GenerateArgs) -> GenerateOptions {
    let defaults = GenerateOptions::default();
    GenerateOptions {
        rows: args.rows.unwrap_or(defaults.rows),
        seed: args.seed.unwrap_or(defaults.seed),
        max_quantity: args.max_quantity.unwrap_or(defaults.max_quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run_args(sources: Vec<PathBuf>) -> RunArgs {
        RunArgs {
            sources,
            globs: Vec::new(),
            exclude_globs: Vec::new(),
            sort_key: None,
            search_key: None,
            searches: Vec::new(),
            search_all: None,
            chart: None,
            format: OutputFormat::Text,
            dataset_searches: Vec::new(),
        }
    }

    #[test]
    fn bench_config_defaults_keys() {
        let config =
            bench_config_from_args(&run_args(vec![PathBuf::from("200.csv")])).expect("config");

        assert_eq!(config.sort_key, "Quantity");
        assert_eq!(config.search_key, "Skin Name");
        assert_eq!(
            config.datasets,
            vec![DatasetSpec {
                path: PathBuf::from("200.csv"),
                search: None
            }]
        );
    }

    #[test]
    fn bench_config_requires_sources() {
        assert!(bench_config_from_args(&run_args(Vec::new())).is_err());
    }

    #[test]
    fn search_terms_match_by_path_or_file_name_with_fallback() {
        let mut args = run_args(vec![
            PathBuf::from("data/200.csv"),
            PathBuf::from("data/150.csv"),
            PathBuf::from("other/150.csv"),
            PathBuf::from("sample.csv"),
        ]);
        args.searches = vec![
            "data/200.csv=AK-47 | Redline".to_string(),
            "150.csv=Vulcan".to_string(),
            "sample.csv=  ".to_string(),
        ];
        args.search_all = Some("Howl".to_string());

        let config = bench_config_from_args(&args).expect("config");
        let terms: Vec<Option<&str>> = config
            .datasets
            .iter()
            .map(|d| d.search.as_deref())
            .collect();

        assert_eq!(
            terms,
            vec![
                Some("AK-47 | Redline"),
                Some("Vulcan"),
                Some("Vulcan"),
                Some("Howl"),
            ]
        );
    }

    #[test]
    fn malformed_search_pairs_are_rejected() {
        let mut args = run_args(vec![PathBuf::from("a.csv")]);
        args.searches = vec!["no-separator".to_string()];
        assert!(bench_config_from_args(&args).is_err());

        args.searches = vec!["=term".to_string()];
        assert!(bench_config_from_args(&args).is_err());
    }

    #[test]
    fn directory_sources_expand_to_csv_files() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("200.csv"), "Skin Name,Quantity\n").expect("write");
        fs::write(dir.path().join("readme.md"), "# data").expect("write");

        let config =
            bench_config_from_args(&run_args(vec![dir.path().to_path_buf()])).expect("config");

        let paths: Vec<PathBuf> = config.datasets.into_iter().map(|d| d.path).collect();
        assert_eq!(paths, vec![dir.path().join("200.csv")]);
    }

    #[test]
    fn dataset_search_pairs_keep_paths_containing_equals() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("run=1");
        fs::create_dir_all(&nested).expect("mkdir");
        let file = nested.join("200.csv");
        fs::write(&file, "Skin Name,Quantity\n").expect("write");

        let mut args = run_args(vec![file.clone()]);
        args.dataset_searches = vec![(file.clone(), "Redline".to_string())];

        let config = bench_config_from_args(&args).expect("config");
        assert_eq!(
            config.datasets,
            vec![DatasetSpec {
                path: file,
                search: Some("Redline".to_string())
            }]
        );
    }

    #[test]
    fn directory_search_term_applies_to_discovered_files() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("150.csv"), "Skin Name,Quantity\n").expect("write");
        fs::write(dir.path().join("200.csv"), "Skin Name,Quantity\n").expect("write");

        let mut args = run_args(vec![dir.path().to_path_buf()]);
        args.searches = vec![format!("{}=Vulcan", dir.path().join("200.csv").display())];
        args.dataset_searches = vec![(dir.path().to_path_buf(), "Redline".to_string())];

        let config = bench_config_from_args(&args).expect("config");
        let terms: Vec<Option<&str>> = config
            .datasets
            .iter()
            .map(|d| d.search.as_deref())
            .collect();
        assert_eq!(terms, vec![Some("Redline"), Some("Vulcan")]);
    }

    #[test]
    fn equal_sort_and_search_keys_are_rejected() {
        let mut args = run_args(vec![PathBuf::from("a.csv")]);
        args.search_key = Some("Quantity".to_string());

        let err = bench_config_from_args(&args).expect_err("same column");
        assert!(err.to_string().contains("must be different"));
    }

    #[test]
    fn generate_options_fill_unset_values() {
        let options = generate_options_from_args(&GenerateArgs {
            rows: Some(10),
            seed: None,
            max_quantity: None,
            out: None,
        });

        assert_eq!(options.rows, 10);
        assert_eq!(options.seed, GenerateOptions::default().seed);
    }
}
