//! Normalized row types.

use super::error::RowError;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use url::Url;

/// Column name → raw cell text, in column order. Keys are lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    /// Builds from header/value pairs, lowercasing headers. A repeated
    /// header keeps its first position and takes the last value.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut fields = Fields::default();
        for (k, v) in pairs {
            fields.insert(k.as_ref(), v.into());
        }
        fields
    }

    pub fn insert(&mut self, key: &str, value: String) {
        let key = key.to_lowercase();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Typed view of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> FieldValue<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

/// A row whose URL was cleaned and parsed successfully.
#[derive(Debug, Clone)]
pub struct Record {
    /// 0-based position among the data rows.
    pub index: usize,
    /// 1-based line in the input file where the row starts.
    pub line: u64,
    /// Raw cells as read.
    pub fields: Fields,
    /// Cleaned URL text; this is what gets fetched.
    pub url: String,
    pub url_parsed: Url,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Record {
    /// Typed access: `url` is the cleaned URL, `width`/`height` are numbers
    /// when the cell was non-empty, any other column is its raw text.
    pub fn get(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "url" => Some(FieldValue::Text(&self.url)),
            "width" => self
                .width
                .map(FieldValue::Number)
                .or_else(|| self.fields.get(key).map(FieldValue::Text)),
            "height" => self
                .height
                .map(FieldValue::Number)
                .or_else(|| self.fields.get(key).map(FieldValue::Text)),
            _ => self.fields.get(key).map(FieldValue::Text),
        }
    }

    /// Original cell text for `key`, before any cleanup.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    /// Raw cell for `key` when present and non-empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.raw(key).filter(|s| !s.is_empty())
    }
}

/// A row that could not be normalized; raw cells are kept as read.
#[derive(Debug)]
pub struct FailedRow {
    pub index: usize,
    pub line: u64,
    pub fields: Fields,
    /// Cleaned `url` cell, `None` when the row had no url column.
    pub url: Option<String>,
    pub error: RowError,
}

impl FailedRow {
    /// The raw `url` cell, if the row had one.
    pub fn raw_url(&self) -> Option<&str> {
        self.fields.get("url")
    }

    /// URL that is still worth fetching: the row only failed on a numeric
    /// column, so its URL parsed fine.
    pub fn fetchable_url(&self) -> Option<&str> {
        match self.error {
            RowError::InvalidNumber { .. } => self.url.as_deref(),
            _ => None,
        }
    }
}

/// One entry of a batch: every input row yields exactly one of these.
#[derive(Debug)]
pub enum RowOutcome {
    Ok(Record),
    Failed(FailedRow),
}

impl RowOutcome {
    pub fn index(&self) -> usize {
        match self {
            RowOutcome::Ok(r) => r.index,
            RowOutcome::Failed(f) => f.index,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RowOutcome::Failed(_))
    }

    pub fn fields(&self) -> &Fields {
        match self {
            RowOutcome::Ok(r) => &r.fields,
            RowOutcome::Failed(f) => &f.fields,
        }
    }

    pub fn error(&self) -> Option<&RowError> {
        match self {
            RowOutcome::Ok(_) => None,
            RowOutcome::Failed(f) => Some(&f.error),
        }
    }

    /// Cleaned URL, for failed rows too when they had a url cell.
    pub fn url(&self) -> Option<&str> {
        match self {
            RowOutcome::Ok(r) => Some(&r.url),
            RowOutcome::Failed(f) => f.url.as_deref(),
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            RowOutcome::Ok(r) => Some(r),
            RowOutcome::Failed(_) => None,
        }
    }
}
