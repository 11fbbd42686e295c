//! DOCX text extraction via [`docx_rs`].
//!
//! Only body paragraphs are read, in document order; tables, headers and
//! footers are not part of the extracted text.

use crate::error::RewriteError;
use crate::pipeline::extract::{guard_parser, DocumentFormat};
use docx_rs::{read_docx, DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};
use tracing::debug;

/// Extract paragraph text joined by `\n`. Empty paragraphs yield empty lines.
pub(crate) fn extract_docx_text(data: &[u8]) -> Result<String, RewriteError> {
    let docx = guard_parser(DocumentFormat::Docx, || {
        read_docx(data).map_err(|e| RewriteError::DocumentParse {
            format: DocumentFormat::Docx.label(),
            detail: e.to_string(),
        })
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();
    debug!("DOCX: {} paragraph(s)", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    children_text(&paragraph.children, &mut text);
    text
}

/// Hyperlinks and tracked insertions nest their own runs; deletions are
/// not part of the visible text.
fn children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => run_text(run, text),
            ParagraphChild::Hyperlink(link) => children_text(&link.children, text),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn run_text(run: &Run, text: &mut String) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Hyperlink, HyperlinkType, Insert};
    use std::io::Cursor;

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut doc = Docx::new();
        for p in paragraphs {
            let para = if p.is_empty() {
                Paragraph::new()
            } else {
                Paragraph::new().add_run(Run::new().add_text(*p))
            };
            doc = doc.add_paragraph(para);
        }
        let mut buf = Cursor::new(Vec::new());
        doc.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn paragraphs_are_newline_joined_in_order() {
        let bytes = build_docx(&["First paragraph.", "Second paragraph.", "Third."]);
        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.\nThird.");
    }

    #[test]
    fn empty_paragraphs_keep_their_line() {
        let bytes = build_docx(&["Top", "", "Bottom"]);
        assert_eq!(extract_docx_text(&bytes).unwrap(), "Top\n\nBottom");
    }

    #[test]
    fn runs_within_a_paragraph_are_concatenated() {
        let para = Paragraph::new()
            .add_run(Run::new().add_text("Hello"))
            .add_run(Run::new().add_text("World"));
        assert_eq!(extract_docx_text(&pack(para)).unwrap(), "HelloWorld");
    }

    fn pack(para: Paragraph) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        Docx::new().add_paragraph(para).build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn hyperlink_text_stays_in_the_sentence() {
        let para = Paragraph::new()
            .add_run(Run::new().add_text("See the "))
            .add_hyperlink(
                Hyperlink::new("https://example.com/plan", HyperlinkType::External)
                    .add_run(Run::new().add_text("launch plan")),
            )
            .add_run(Run::new().add_text(" for details."));

        assert_eq!(
            extract_docx_text(&pack(para)).unwrap(),
            "See the launch plan for details."
        );
    }

    #[test]
    fn tracked_insertions_are_read() {
        let para = Paragraph::new()
            .add_run(Run::new().add_text("Ship on "))
            .add_insert(Insert::new(Run::new().add_text("Monday")));

        assert_eq!(extract_docx_text(&pack(para)).unwrap(), "Ship on Monday");
    }

    #[test]
    fn non_zip_bytes_are_a_parse_error() {
        let err = extract_docx_text(b"definitely not a zip archive").unwrap_err();
        assert!(
            matches!(err, RewriteError::DocumentParse { format: "DOCX", .. }),
            "got {err:?}"
        );
    }
}
