//! Annotation pass: fetch each row's image, run the configured models on
//! the local file and write a table of captions and recognized text.
//!
//! Rows are processed one at a time. Values already present in the input
//! (`caption`, `ocr`, `ocr_qa`) are reused unless `force` is set, and rows
//! with a non-empty `final` column are copied through untouched. The output
//! table is rewritten after every processed row.

mod inference;
mod output;
mod parse;

pub use inference::{CommandInference, Inference, InferenceError, Step};
pub use output::{output_path_for, write_table, AnnotatedRow, OUTPUT_HEADERS};
pub use parse::{answer_from_json, caption_from_json, flatten_text, is_likely_text_based};

use crate::batch::{BatchFailure, BatchFailureKind, BatchHooks};
use crate::config::InferenceConfig;
use crate::fetcher::{FetchedAsset, Fetcher};
use crate::rows::{read_rows, ReadError, Record, RowOutcome};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("cannot write {path}: {source}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result of annotating one record.
#[derive(Debug, Clone)]
pub struct Annotated {
    pub row: AnnotatedRow,
    /// `None` when the row was copied through without fetching.
    pub asset: Option<FetchedAsset>,
}

/// Runs the inference steps over fetched assets.
#[derive(Default)]
pub struct Annotator {
    caption: Option<Box<dyn Inference>>,
    ocr: Option<Box<dyn Inference>>,
    ocr_qa: Option<Box<dyn Inference>>,
    force: bool,
}

impl Annotator {
    /// Builds subprocess-backed steps from the `[inference]` config section.
    pub fn from_config(cfg: &InferenceConfig) -> Self {
        fn command(parts: &Option<Vec<String>>) -> Option<Box<dyn Inference>> {
            parts
                .as_deref()
                .and_then(CommandInference::from_command_line)
                .map(|c| Box::new(c) as Box<dyn Inference>)
        }

        Self {
            caption: command(&cfg.caption),
            ocr: command(&cfg.ocr),
            ocr_qa: command(&cfg.ocr_qa),
            force: false,
        }
    }

    pub fn with_caption(mut self, inference: impl Inference + 'static) -> Self {
        self.caption = Some(Box::new(inference));
        self
    }

    pub fn with_ocr(mut self, inference: impl Inference + 'static) -> Self {
        self.ocr = Some(Box::new(inference));
        self
    }

    pub fn with_ocr_qa(mut self, inference: impl Inference + 'static) -> Self {
        self.ocr_qa = Some(Box::new(inference));
        self
    }

    /// Recompute every value even when the input already has one.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Annotates `input` into `output`. Returns the number of rows written.
    pub fn run<H: BatchHooks>(
        &self,
        input: &Path,
        output: &Path,
        fetcher: &Fetcher,
        hooks: &mut H,
    ) -> Result<usize, AnnotateError> {
        let rows = read_rows(input)?;
        tracing::info!("annotating {} rows from {}", rows.len(), input.display());

        let mut results = Vec::new();
        for row in rows {
            let record = match row {
                RowOutcome::Ok(record) => record,
                RowOutcome::Failed(failed) => {
                    hooks.on_failure(BatchFailure::from_failed_row(failed));
                    continue;
                }
            };

            match self.annotate_record(&record, fetcher) {
                Ok(annotated) => {
                    if let Some(asset) = &annotated.asset {
                        hooks.on_fetched(record.index, &record.url, asset);
                    }
                    results.push(annotated.row);
                }
                Err(kind) => {
                    tracing::warn!("row {}: {}", record.index, kind);
                    hooks.on_failure(BatchFailure {
                        index: record.index,
                        url: Some(record.url.clone()),
                        kind,
                    });
                }
            }
            save(output, &results)?;
        }

        save(output, &results)?;
        Ok(results.len())
    }

    /// Fetches and annotates a single record.
    pub fn annotate_record(
        &self,
        record: &Record,
        fetcher: &Fetcher,
    ) -> Result<Annotated, BatchFailureKind> {
        if !self.force && record.non_empty("final").is_some() {
            tracing::debug!("row {} already has a final caption, skipping", record.index);
            return Ok(Annotated {
                row: passthrough(record),
                asset: None,
            });
        }

        let asset = fetcher.fetch(&record.url).map_err(BatchFailureKind::Fetch)?;
        let image = asset.path.as_path();

        let caption = match self.reuse(record, "caption") {
            Some(existing) => existing,
            None => run_step(Step::Caption, &self.caption, image, caption_from_json)?
                .unwrap_or_default(),
        };

        let text_based = is_likely_text_based(&caption);

        let ocr = match self.reuse(record, "ocr") {
            Some(existing) => existing,
            None if text_based => {
                run_step(Step::Ocr, &self.ocr, image, |v| Ok(flatten_text(v)))?.unwrap_or_default()
            }
            None => String::new(),
        };

        let ocr_qa = match self.reuse(record, "ocr_qa") {
            Some(existing) => existing,
            None if text_based => {
                run_step(Step::OcrQa, &self.ocr_qa, image, answer_from_json)?.unwrap_or_default()
            }
            None => String::new(),
        };

        Ok(Annotated {
            row: AnnotatedRow {
                url: record.raw("url").unwrap_or_default().to_string(),
                normalized_url: record.url_parsed.to_string(),
                caption,
                ocr,
                ocr_qa,
                // Combining the three sources is not done yet.
                final_text: String::new(),
            },
            asset: Some(asset),
        })
    }

    fn reuse(&self, record: &Record, column: &str) -> Option<String> {
        if self.force {
            return None;
        }
        record.non_empty(column).map(str::to_string)
    }
}

fn run_step<F>(
    step: Step,
    inference: &Option<Box<dyn Inference>>,
    image: &Path,
    interpret: F,
) -> Result<Option<String>, BatchFailureKind>
where
    F: Fn(&Value) -> Result<String, InferenceError>,
{
    let Some(inference) = inference else {
        return Ok(None);
    };
    let text = inference
        .infer(image)
        .and_then(|value| interpret(&value))
        .map_err(|source| BatchFailureKind::Inference { step, source })?;
    tracing::debug!("{} for {}: {}", step, image.display(), text);
    Ok(Some(text))
}

fn passthrough(record: &Record) -> AnnotatedRow {
    let cell = |key: &str| record.raw(key).unwrap_or_default().to_string();
    AnnotatedRow {
        url: cell("url"),
        normalized_url: record
            .non_empty("normalized_url")
            .map(str::to_string)
            .unwrap_or_else(|| record.url_parsed.to_string()),
        caption: cell("caption"),
        ocr: cell("ocr"),
        ocr_qa: cell("ocr_qa"),
        final_text: cell("final"),
    }
}

fn save(path: &Path, rows: &[AnnotatedRow]) -> Result<(), AnnotateError> {
    write_table(path, rows).map_err(|source| AnnotateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::HttpOptions;
    use crate::rows::read_rows_from_reader;
    use crate::store::AssetStore;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Returns a fixed value and counts calls.
    struct Fixed {
        value: Value,
        calls: Rc<Cell<usize>>,
    }

    impl Fixed {
        fn new(value: Value) -> (Self, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            (
                Self {
                    value,
                    calls: Rc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl Inference for Fixed {
        fn infer(&self, image: &Path) -> Result<Value, InferenceError> {
            assert!(image.exists(), "inference must get a local file");
            self.calls.set(self.calls.get() + 1);
            Ok(self.value.clone())
        }
    }

    const URL: &str = "http://192.0.2.1:9/logo.png";

    fn cached_fetcher(dir: &Path) -> Fetcher {
        let fetcher = Fetcher::new(AssetStore::new(dir), HttpOptions::default());
        std::fs::write(fetcher.store().derive_path(URL), b"png").unwrap();
        fetcher
    }

    fn record(csv: &str) -> Record {
        let mut rows = read_rows_from_reader(csv.as_bytes()).unwrap();
        match rows.remove(0) {
            RowOutcome::Ok(r) => r,
            RowOutcome::Failed(f) => panic!("row failed: {}", f.error),
        }
    }

    #[test]
    fn text_based_caption_runs_ocr_steps() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = cached_fetcher(dir.path());
        let (caption, _) = Fixed::new(json!([{"generated_text": "a poster on a wall"}]));
        let (ocr, ocr_calls) = Fixed::new(json!({"menu": {"nm": "OPEN"}, "total": "24h"}));
        let (qa, qa_calls) = Fixed::new(json!({"question": "q", "answer": "Open 24h"}));
        let annotator = Annotator::default()
            .with_caption(caption)
            .with_ocr(ocr)
            .with_ocr_qa(qa);

        let rec = record(&format!("URL\n{URL}\n"));
        let annotated = annotator.annotate_record(&rec, &fetcher).unwrap();
        assert_eq!(annotated.row.caption, "a poster on a wall");
        assert_eq!(annotated.row.ocr, "OPEN24h");
        assert_eq!(annotated.row.ocr_qa, "Open 24h");
        assert_eq!(annotated.row.normalized_url, URL);
        assert_eq!(annotated.row.final_text, "");
        assert_eq!(ocr_calls.get(), 1);
        assert_eq!(qa_calls.get(), 1);
    }

    #[test]
    fn plain_caption_skips_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = cached_fetcher(dir.path());
        let (caption, _) = Fixed::new(json!([{"generated_text": "a dog in a field"}]));
        let (ocr, ocr_calls) = Fixed::new(json!("text"));
        let annotator = Annotator::default().with_caption(caption).with_ocr(ocr);

        let rec = record(&format!("url\n{URL}\n"));
        let annotated = annotator.annotate_record(&rec, &fetcher).unwrap();
        assert_eq!(annotated.row.ocr, "");
        assert_eq!(ocr_calls.get(), 0);
    }

    #[test]
    fn existing_values_reused_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = cached_fetcher(dir.path());
        let csv = format!("url,caption\n{URL},a sign\n");

        let (caption, caption_calls) = Fixed::new(json!([{"generated_text": "new"}]));
        let annotator = Annotator::default().with_caption(caption);
        let annotated = annotator.annotate_record(&record(&csv), &fetcher).unwrap();
        assert_eq!(annotated.row.caption, "a sign");
        assert_eq!(caption_calls.get(), 0);

        let (caption, caption_calls) = Fixed::new(json!([{"generated_text": "new"}]));
        let annotator = Annotator::default().with_caption(caption).force(true);
        let annotated = annotator.annotate_record(&record(&csv), &fetcher).unwrap();
        assert_eq!(annotated.row.caption, "new");
        assert_eq!(caption_calls.get(), 1);
    }

    #[test]
    fn final_rows_pass_through_without_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(AssetStore::new(dir.path()), HttpOptions::default());
        let csv = format!("url,caption,final\n{URL},c,done\n");
        let annotated = Annotator::default()
            .annotate_record(&record(&csv), &fetcher)
            .unwrap();
        assert!(annotated.asset.is_none());
        assert_eq!(annotated.row.final_text, "done");
        assert_eq!(annotated.row.caption, "c");
        assert!(!fetcher.store().derive_path(URL).exists());
    }

    #[test]
    fn bad_model_output_is_inference_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = cached_fetcher(dir.path());
        let (caption, _) = Fixed::new(json!({"unexpected": true}));
        let annotator = Annotator::default().with_caption(caption);
        let err = annotator
            .annotate_record(&record(&format!("url\n{URL}\n")), &fetcher)
            .unwrap_err();
        assert!(matches!(
            err,
            BatchFailureKind::Inference {
                step: Step::Caption,
                ..
            }
        ));
    }

    #[test]
    fn from_config_skips_missing_commands() {
        let cfg = InferenceConfig {
            caption: Some(vec!["python".into(), "caption.py".into()]),
            ocr: Some(vec![]),
            ocr_qa: None,
        };
        let annotator = Annotator::from_config(&cfg);
        assert!(annotator.caption.is_some());
        assert!(annotator.ocr.is_none());
        assert!(annotator.ocr_qa.is_none());
    }
}
