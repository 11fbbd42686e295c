//! Output types, `.txt` export, and text statistics.

use crate::error::RewriteError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// A single piece of transformed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Stable slug: lower-cased style name, `"custom"`, or `"summary"`.
    pub id: String,
    /// Display label, e.g. `"Formal"`, `"Custom"`, `"Summary-short"`.
    pub style: String,
    /// The model result, trimmed.
    pub text: String,
}

impl Output {
    pub fn new(id: impl Into<String>, style: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style: style.into(),
            text: text.into(),
        }
    }

    /// Download name for this output: `output_<style>.txt`.
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced by `_`.
    pub fn file_name(&self) -> String {
        static UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());
        format!("output_{}.txt", UNSAFE.replace_all(&self.style, "_"))
    }
}

/// One completed transform action: the input and every output built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationRun {
    pub input: String,
    pub outputs: Vec<Output>,
}

/// Word and character counts shown after loading a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

/// Write each output's literal text to `dir/<file_name>`.
///
/// Each file is written to a temporary sibling and renamed into place so a
/// reader never sees a half-written export.
pub async fn write_outputs(
    dir: impl AsRef<Path>,
    outputs: &[Output],
) -> Result<Vec<PathBuf>, RewriteError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| RewriteError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        let path = dir.join(output.file_name());
        let tmp_path = path.with_extension("txt.tmp");

        tokio::fs::write(&tmp_path, &output.text)
            .await
            .map_err(|e| RewriteError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| RewriteError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;

        info!("Wrote {} ({} bytes)", path.display(), output.text.len());
        written.push(path);
    }
    Ok(written)
}
