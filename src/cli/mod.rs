use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bench;
use crate::dataset::{self, generate};
use crate::engine;
use crate::models::{DEFAULT_SEARCH_KEY, DEFAULT_SORT_KEY, REPORT_VERSION};
use crate::report;

mod args;
mod config;
mod format;

pub use args::{Cli, Commands, GenerateArgs, OutputFormat, RunArgs, SearchArgs, SortArgs};

use config::{apply_generate_config_defaults, apply_run_config_defaults, load_cli_config};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "MERGEBENCH_LOG";

/// Entry point for the CLI binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.schema_version {
        println!("Benchmark report JSON schema version: {}", REPORT_VERSION);
        return Ok(());
    }

    let cli_config = load_cli_config()?;

    match cli.command {
        Some(Commands::Run(mut run_args)) => {
            if let Some(ref config) = cli_config {
                apply_run_config_defaults(config, &mut run_args);
            }

            let config = args::bench_config_from_args(&run_args)?;
            let report = bench::run_benchmark(&config);

            match run_args.format {
                OutputFormat::Text => format::print_text(&report)?,
                OutputFormat::Table => format::print_table(&report)?,
                OutputFormat::Json => {
                    serde_json::to_writer(io::stdout(), &report)?;
                    println!();
                }
            }

            if let Some(path) = &run_args.chart {
                if report::write_chart(&report, path)? {
                    info!(chart = %path.display(), "chart written");
                } else {
                    warn!("no valid data to plot; chart not written");
                }
            }

            Ok(())
        }
        Some(Commands::Sort(sort_args)) => {
            let sort_key = sort_args.sort_key.as_deref().unwrap_or(DEFAULT_SORT_KEY);

            let mut data = dataset::load_dataset(&sort_args.file)?;
            dataset::validate_columns(&data, &[sort_key])?;
            let coerced = dataset::coerce_numeric(&mut data, sort_key);
            if coerced > 0 {
                warn!(coerced, "non-numeric '{sort_key}' values replaced with 0");
            }

            let algorithm = sort_args.algorithm.to_model();
            let sorted = engine::sort_with(algorithm, &data.records, sort_key)?;

            let mut writer = csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(io::stdout().lock());
            writer.write_record(&data.headers)?;
            for record in &sorted {
                writer.write_record(
                    data.headers
                        .iter()
                        .map(|h| record.get(h).map(|v| v.to_string()).unwrap_or_default()),
                )?;
            }
            writer.flush()?;
            Ok(())
        }
        Some(Commands::Search(search_args)) => {
            let search_key = search_args
                .search_key
                .as_deref()
                .unwrap_or(DEFAULT_SEARCH_KEY);

            let data = dataset::load_dataset(&search_args.file)?;
            dataset::validate_columns(&data, &[search_key])?;
            let hit = engine::linear_search(&data.records, search_key, &search_args.term)?;

            match search_args.format {
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "term": search_args.term,
                        "index": hit.as_ref().map(|h| h.index),
                        "record": hit.as_ref().map(|h| h.item),
                    });
                    serde_json::to_writer(io::stdout(), &value)?;
                    println!();
                }
                OutputFormat::Text | OutputFormat::Table => match &hit {
                    Some(h) => {
                        println!("Found at row {}", h.index + 1);
                        println!("{}", format::format_record(h.item));
                    }
                    None => println!("Not found"),
                },
            }
            Ok(())
        }
        Some(Commands::Generate(mut generate_args)) => {
            if let Some(ref config) = cli_config {
                apply_generate_config_defaults(config, &mut generate_args);
            }

            let options = args::generate_options_from_args(&generate_args);
            if options.max_quantity == 0 {
                bail!("--max-quantity must be at least 1");
            }

            match &generate_args.out {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    generate::write_synthetic(BufWriter::new(file), options)?;
                    info!(rows = options.rows, out = %path.display(), "dataset generated");
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    generate::write_synthetic(&mut lock, options)?;
                    lock.flush()?;
                }
            }
            Ok(())
        }
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
