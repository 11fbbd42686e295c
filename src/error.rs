//! Error type for the edgequake-rewrite library.
//!
//! Every failure a user action can hit is a [`RewriteError`] variant. None of
//! them is fatal: the action that produced the error is abandoned, the
//! [`crate::session::Session`] is left exactly as it was, and the caller may
//! simply retry. Nothing in the library retries on its own.
//!
//! The `Display` strings are written for end users: a one-line statement of
//! what went wrong, optionally followed by a hint line.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-rewrite library.
#[derive(Debug, Error)]
pub enum RewriteError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The declared MIME type is neither PDF nor DOCX.
    #[error(
        "Unsupported document type '{mime}'\n\
         Only application/pdf and application/vnd.openxmlformats-officedocument.wordprocessingml.document are accepted."
    )]
    UnsupportedFormat { mime: String },

    /// The document could not be parsed (corrupt, truncated, encrypted, …).
    #[error("Could not read {format} document: {detail}")]
    DocumentParse { format: &'static str, detail: String },

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The input file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Request / config errors ───────────────────────────────────────────
    /// Bad summary length, empty style set, blank input, or builder validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Model errors ──────────────────────────────────────────────────────
    /// No API key could be found; raised before any network call.
    #[error("Credential '{key}' not found.\n{hint}")]
    MissingCredential { key: String, hint: String },

    /// The generative-text service call failed (transport or service error).
    #[error("Transformation failed: {message}")]
    TransformationFailed { message: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// Could not create or write an exported output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RewriteError {
    pub(crate) fn transformation(message: impl Into<String>) -> Self {
        RewriteError::TransformationFailed {
            message: message.into(),
        }
    }
}
