//! CSV ingestion and row normalization.
//!
//! Reads a comma-separated file with a header row into one [`RowOutcome`]
//! per data row. A row that cannot be normalized (missing or unparseable
//! URL, non-numeric width/height) is kept as [`RowOutcome::Failed`] and
//! reading goes on; only problems with the file itself abort the read.

mod error;
mod record;

pub use error::{ReadError, RowError};
pub use record::{FailedRow, FieldValue, Fields, Record, RowOutcome};

use crate::url_model::clean_url;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use url::Url;

/// Reads and normalizes every row of the CSV at `path`, in file order.
pub fn read_rows(path: &Path) -> Result<Vec<RowOutcome>, ReadError> {
    let file = File::open(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows_from_reader(file)?;
    tracing::debug!(
        "read {} rows ({} failed) from {}",
        rows.len(),
        rows.iter().filter(|r| r.is_failed()).count(),
        path.display()
    );
    Ok(rows)
}

/// Like [`read_rows`] but from any reader.
pub fn read_rows_from_reader<R: Read>(rdr: R) -> Result<Vec<RowOutcome>, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);

    let headers: Vec<String> = reader
        .headers()
        .map_err(ReadError::Header)?
        .iter()
        .map(str::to_lowercase)
        .collect();

    let mut rows = Vec::new();
    for (index, result) in reader.byte_records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(ReadError::Io(err));
            }
            Err(err) => {
                let line = err.position().map_or(0, |p| p.line());
                tracing::warn!("row {} (line {}) is malformed: {}", index, line, err);
                rows.push(RowOutcome::Failed(FailedRow {
                    index,
                    line,
                    fields: Fields::default(),
                    url: None,
                    error: RowError::Malformed { line, source: err },
                }));
                continue;
            }
        };

        let line = record.position().map_or(0, |p| p.line());
        let cells = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned());
        let fields = Fields::from_pairs(headers.iter().zip(cells));

        match csv::StringRecord::from_byte_record(record) {
            Ok(_) => rows.push(normalize_row(index, line, fields)),
            Err(source) => {
                tracing::warn!("row {} (line {}) has invalid UTF-8: {}", index, line, source);
                rows.push(failed(index, line, fields, RowError::InvalidUtf8 { line, source }));
            }
        }
    }

    Ok(rows)
}

/// Cleans and parses the recognized columns of one row.
pub fn normalize_row(index: usize, line: u64, fields: Fields) -> RowOutcome {
    let Some(url) = fields.get("url").map(clean_url) else {
        tracing::warn!("row {} (line {}) has no url column", index, line);
        return failed(index, line, fields, RowError::MissingUrl);
    };

    match normalize_fields(&fields, &url) {
        Ok((url_parsed, width, height)) => RowOutcome::Ok(Record {
            index,
            line,
            fields,
            url,
            url_parsed,
            width,
            height,
        }),
        Err(error) => {
            tracing::warn!("row {} (line {}) failed: {}", index, line, error);
            RowOutcome::Failed(FailedRow {
                index,
                line,
                fields,
                url: Some(url),
                error,
            })
        }
    }
}

/// Failed row whose url cell, if any, is cleaned for reporting.
fn failed(index: usize, line: u64, fields: Fields, error: RowError) -> RowOutcome {
    let url = fields.get("url").map(clean_url);
    RowOutcome::Failed(FailedRow {
        index,
        line,
        fields,
        url,
        error,
    })
}

type Normalized = (Url, Option<f64>, Option<f64>);

fn normalize_fields(fields: &Fields, url: &str) -> Result<Normalized, RowError> {
    let url_parsed = Url::parse(url).map_err(|source| RowError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let width = parse_dimension(fields, "width")?;
    let height = parse_dimension(fields, "height")?;
    Ok((url_parsed, width, height))
}

/// Absent or empty cells stay `None`; anything else must parse as a float.
fn parse_dimension(fields: &Fields, name: &'static str) -> Result<Option<f64>, RowError> {
    match fields.get(name) {
        Some(value) if !value.is_empty() => value
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|source| RowError::InvalidNumber {
                field: name,
                value: value.to_string(),
                source,
            }),
        _ => Ok(None),
    }
}
