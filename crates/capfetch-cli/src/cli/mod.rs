//! CLI for the capfetch ingestion pipeline.

mod commands;

use anyhow::Result;
use capfetch_core::config::{self, CapfetchConfig};
use capfetch_core::fetcher::{Fetcher, HttpOptions};
use capfetch_core::store::AssetStore;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{run_annotate, run_clean, run_fetch, run_path, run_rows};

/// Input used when no CSV path is given.
pub const DEFAULT_CSV_PATH: &str = "./examples/test.csv";

/// Top-level CLI for capfetch.
#[derive(Debug, Parser)]
#[command(name = "capfetch")]
#[command(about = "capfetch: ingest image URLs from a CSV and fetch them into a local store", long_about = None)]
pub struct Cli {
    /// Directory for fetched images (overrides `data_dir` in config.toml).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the image of every row; failed rows are reported and skipped.
    Fetch {
        /// CSV file with a `url` column.
        #[arg(default_value = DEFAULT_CSV_PATH)]
        csv: PathBuf,
    },

    /// Print every normalized row as one JSON line.
    Rows {
        /// CSV file with a `url` column.
        #[arg(default_value = DEFAULT_CSV_PATH)]
        csv: PathBuf,
    },

    /// Print the local path a URL is stored at.
    Path {
        url: String,

        /// Use the URL exactly as given instead of cleaning it first.
        #[arg(long)]
        raw: bool,
    },

    /// Print the cleaned form of a URL.
    Clean { url: String },

    /// Fetch every row and run the configured caption/OCR commands on it.
    Annotate {
        /// CSV file with a `url` column.
        #[arg(default_value = DEFAULT_CSV_PATH)]
        csv: PathBuf,

        /// Recompute values the input already has.
        #[arg(long)]
        force: bool,

        /// Output table (default: input with `.out.csv`).
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let data_dir = cli.data_dir.as_deref();
        match cli.command {
            CliCommand::Fetch { csv } => run_fetch(&build_fetcher(&cfg, data_dir)?, &csv)?,
            CliCommand::Rows { csv } => run_rows(&csv)?,
            CliCommand::Path { url, raw } => {
                run_path(&build_fetcher(&cfg, data_dir)?, &url, raw)
            }
            CliCommand::Clean { url } => run_clean(&url),
            CliCommand::Annotate { csv, force, output } => {
                let fetcher = build_fetcher(&cfg, data_dir)?;
                run_annotate(&cfg, &fetcher, &csv, output.as_deref(), force)?;
            }
        }

        Ok(())
    }
}

/// Fetcher rooted at the `--data-dir` override, the configured dir, or the XDG default.
fn build_fetcher(cfg: &CapfetchConfig, data_dir: Option<&Path>) -> Result<Fetcher> {
    let dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => cfg.resolved_data_dir()?,
    };
    Ok(Fetcher::new(AssetStore::new(dir), HttpOptions::from(&cfg.fetch)))
}

#[cfg(test)]
mod tests;
