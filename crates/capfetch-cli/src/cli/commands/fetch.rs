//! `capfetch fetch [csv]` – download every row's image.

use super::report::ConsoleReport;
use anyhow::{Context, Result};
use capfetch_core::batch;
use capfetch_core::fetcher::Fetcher;
use std::path::Path;

pub fn run_fetch(fetcher: &Fetcher, csv: &Path) -> Result<()> {
    batch::run_with(csv, fetcher, &mut ConsoleReport)
        .with_context(|| format!("batch over {}", csv.display()))?;
    Ok(())
}
