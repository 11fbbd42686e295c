//! PDF text extraction via [`pdf_extract`].
//!
//! `pdf_extract` can panic on malformed input instead of returning an error,
//! so every call goes through [`guard_parser`].

use crate::error::RewriteError;
use crate::pipeline::extract::{guard_parser, DocumentFormat};
use tracing::debug;

/// Extract the text of every page, in page order, joined by `\n`.
///
/// Pages with no extractable text (scans, blank pages) are skipped.
pub(crate) fn extract_pdf_text(data: &[u8]) -> Result<String, RewriteError> {
    let pages = guard_parser(DocumentFormat::Pdf, || {
        pdf_extract::extract_text_from_mem_by_pages(data).map_err(|e| RewriteError::DocumentParse {
            format: DocumentFormat::Pdf.label(),
            detail: e.to_string(),
        })
    })?;
    debug!("PDF: {} page(s)", pages.len());
    Ok(join_pages(&pages))
}

/// Join trimmed, non-empty page texts with a newline.
pub(crate) fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
