//! Document extraction: declared MIME type → plain text.
//!
//! Only two formats are accepted, PDF and DOCX. The MIME check happens before
//! a single byte is parsed, so an unsupported upload can never yield partial
//! text. Parsing is a pure function of the bytes; [`extract_file`] is the async
//! convenience wrapper the CLI uses.

use crate::error::RewriteError;
use crate::pipeline::{docx, pdf};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A supported upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Parse a declared MIME type.
    ///
    /// Parameters after `;` are ignored and the comparison is
    /// case-insensitive. Anything else is [`RewriteError::UnsupportedFormat`].
    pub fn from_mime(mime: &str) -> Result<Self, RewriteError> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => Ok(DocumentFormat::Pdf),
            DOCX_MIME => Ok(DocumentFormat::Docx),
            _ => Err(RewriteError::UnsupportedFormat {
                mime: mime.to_string(),
            }),
        }
    }

    /// Infer the format from a `.pdf` / `.docx` file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => PDF_MIME,
            DocumentFormat::Docx => DOCX_MIME,
        }
    }

    /// Short label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
        }
    }
}

/// Extract plain text from a byte stream with a declared MIME type.
///
/// The result is trimmed of surrounding whitespace.
pub fn extract(mut reader: impl Read, declared_mime: &str) -> Result<String, RewriteError> {
    let format = DocumentFormat::from_mime(declared_mime)?;
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| RewriteError::DocumentParse {
            format: format.label(),
            detail: format!("stream could not be read: {e}"),
        })?;
    extract_bytes(&data, format)
}

/// Extract plain text from an in-memory document of a known format.
pub fn extract_bytes(data: &[u8], format: DocumentFormat) -> Result<String, RewriteError> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(data)?,
        DocumentFormat::Docx => docx::extract_docx_text(data)?,
    };
    debug!("{}: extracted {} bytes of text", format.label(), text.len());
    Ok(text.trim().to_string())
}

/// Read a document from disk and extract its text.
///
/// `mime` overrides the type inferred from the file extension. Parsing runs
/// on the blocking pool because large PDFs are CPU-bound.
pub async fn extract_file(path: impl AsRef<Path>, mime: Option<&str>) -> Result<String, RewriteError> {
    let path = path.as_ref();
    let format = match mime {
        Some(m) => DocumentFormat::from_mime(m)?,
        None => DocumentFormat::from_path(path).ok_or_else(|| RewriteError::UnsupportedFormat {
            mime: format!("unknown (file '{}')", path.display()),
        })?,
    };

    let data = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RewriteError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RewriteError::InputReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    info!("Loaded {} ({} bytes, {})", path.display(), data.len(), format.label());

    tokio::task::spawn_blocking(move || extract_bytes(&data, format))
        .await
        .map_err(|e| RewriteError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Run a parser, turning a panic on malformed input into a parse error.
pub(crate) fn guard_parser<T>(
    format: DocumentFormat,
    parse: impl FnOnce() -> Result<T, RewriteError>,
) -> Result<T, RewriteError> {
    panic::catch_unwind(AssertUnwindSafe(parse)).unwrap_or_else(|_| {
        Err(RewriteError::DocumentParse {
            format: format.label(),
            detail: "parser panicked (malformed document)".into(),
        })
    })
}
