//! External inference commands.
//!
//! A model runs as a separate process: `program args... <image_path>`,
//! printing one JSON document on stdout.

use serde_json::Value;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Which inference step produced a value or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Caption,
    Ocr,
    OcrQa,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Caption => "caption",
            Step::Ocr => "ocr",
            Step::OcrQa => "ocr-qa",
        })
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("cannot start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} printed nothing on stdout")]
    EmptyOutput { program: String },

    #[error("{program} output is not JSON: {source}")]
    Json {
        program: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected {expected}, got {got}")]
    Shape { expected: &'static str, got: String },
}

/// Runs a model on one local image.
pub trait Inference {
    fn infer(&self, image: &Path) -> Result<Value, InferenceError>;
}

/// An [`Inference`] backed by a subprocess.
#[derive(Debug, Clone)]
pub struct CommandInference {
    program: String,
    args: Vec<String>,
}

impl CommandInference {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `["python", "caption.py"]` → program `python`, args `["caption.py"]`.
    /// Returns `None` for an empty list.
    pub fn from_command_line(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl Inference for CommandInference {
    fn infer(&self, image: &Path) -> Result<Value, InferenceError> {
        tracing::debug!("running {} {:?} {}", self.program, self.args, image.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .output()
            .map_err(|source| InferenceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                "(no stderr output)".to_string()
            } else {
                stderr
            };
            return Err(InferenceError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }

        parse_stdout(&self.program, &output.stdout)
    }
}

/// Parses subprocess stdout as JSON. When the whole output is not JSON (model
/// libraries like to print progress first), the last non-empty line is tried.
pub(crate) fn parse_stdout(program: &str, stdout: &[u8]) -> Result<Value, InferenceError> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InferenceError::EmptyOutput {
            program: program.to_string(),
        });
    }

    serde_json::from_str(trimmed).or_else(|source| {
        trimmed
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| serde_json::from_str(line).ok())
            .ok_or(InferenceError::Json {
                program: program.to_string(),
                source,
            })
    })
}
