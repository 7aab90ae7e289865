//! Row and file level read errors.

use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single row could not be normalized. The row is still kept in the
/// batch, tagged as failed.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("row has no url column")]
    MissingUrl,

    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A cell is not valid UTF-8. The cells are kept, decoded lossily.
    #[error("invalid UTF-8 on line {line}: {source}")]
    InvalidUtf8 {
        line: u64,
        #[source]
        source: csv::FromUtf8Error,
    },

    /// The CSV reader rejected the record itself.
    #[error("malformed record on line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// Problems with the input file as a whole. These end the read before any
/// row is returned.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open {path}: {source}", path = .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read header row: {0}")]
    Header(#[source] csv::Error),

    #[error("read failed: {0}")]
    Io(#[source] csv::Error),
}
