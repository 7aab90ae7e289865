//! Annotated output table.

use std::path::{Path, PathBuf};

pub const OUTPUT_HEADERS: [&str; 6] = ["URL", "NORMALIZED_URL", "CAPTION", "OCR", "OCR_QA", "FINAL"];

/// One line of the output table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedRow {
    /// The `url` cell as it appeared in the input.
    pub url: String,
    pub normalized_url: String,
    pub caption: String,
    pub ocr: String,
    pub ocr_qa: String,
    pub final_text: String,
}

impl AnnotatedRow {
    fn as_record(&self) -> [&str; 6] {
        [
            self.url.as_str(),
            self.normalized_url.as_str(),
            self.caption.as_str(),
            self.ocr.as_str(),
            self.ocr_qa.as_str(),
            self.final_text.as_str(),
        ]
    }
}

/// `photos.csv` → `photos.out.csv`; any other name gets `.out.csv` appended.
pub fn output_path_for(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = name.strip_suffix(".csv").unwrap_or(&name);
    input.with_file_name(format!("{base}.out.csv"))
}

/// Rewrites `path` with the header and all `rows`.
pub fn write_table(path: &Path, rows: &[AnnotatedRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(OUTPUT_HEADERS)?;
    for row in rows {
        writer.write_record(row.as_record())?;
    }
    writer.flush()?;
    Ok(())
}
