//! `capfetch rows [csv]` – dump normalized rows as JSON lines.

use anyhow::Result;
use capfetch_core::rows::{read_rows, RowOutcome};
use serde_json::{json, Value};
use std::path::Path;

pub fn run_rows(csv: &Path) -> Result<()> {
    for row in read_rows(csv)? {
        println!("{}", row_json(&row));
    }
    Ok(())
}

fn row_json(row: &RowOutcome) -> Value {
    match row {
        RowOutcome::Ok(r) => json!({
            "index": r.index,
            "line": r.line,
            "failed": false,
            "url": r.url,
            "width": r.width,
            "height": r.height,
            "fields": r.fields,
        }),
        RowOutcome::Failed(f) => json!({
            "index": f.index,
            "line": f.line,
            "failed": true,
            "url": f.url,
            "error": f.error.to_string(),
            "fields": f.fields,
        }),
    }
}
