//! `capfetch annotate [csv]` – caption/OCR every row into an output table.

use super::report::ConsoleReport;
use anyhow::{Context, Result};
use capfetch_core::annotate::{output_path_for, Annotator};
use capfetch_core::config::CapfetchConfig;
use capfetch_core::fetcher::Fetcher;
use std::path::Path;

pub fn run_annotate(
    cfg: &CapfetchConfig,
    fetcher: &Fetcher,
    csv: &Path,
    output: Option<&Path>,
    force: bool,
) -> Result<()> {
    let inference = cfg.inference.clone().unwrap_or_default();
    if inference.caption.is_none() {
        tracing::warn!("no caption command configured; only existing captions will be used");
    }
    let annotator = Annotator::from_config(&inference).force(force);

    let output = output.map_or_else(|| output_path_for(csv), Path::to_path_buf);
    let written = annotator
        .run(csv, &output, fetcher, &mut ConsoleReport)
        .with_context(|| format!("annotate {}", csv.display()))?;
    println!("Wrote {written} rows to {}", output.display());
    Ok(())
}
