//! Plain-text extraction from uploaded file buffers.
//!
//! Extraction branches on the resolved [`ContentKind`]: plain text decodes
//! verbatim, word-processor documents go through the OOXML converter, and
//! everything else returns empty text to signal the OCR fallback. PDFs are
//! deliberately not parsed here: many uploads are scanned documents, so the
//! pipeline routes all PDFs through OCR for uniform handling.

mod kind;

use std::io::Read;

pub use kind::{ContentKind, MIME_DOC, MIME_DOCX, MIME_PDF, MIME_PLAIN_TEXT};

use crate::error::{Error, Result};
use crate::retry::{RetryPolicy, retry_with_backoff};

/// Minimum trimmed length for extraction to count as successful; shorter
/// results trigger the OCR fallback.
pub const MIN_EXTRACTED_CHARS: usize = 100;

/// Maximum decompressed bytes read from the OOXML document part.
const MAX_DOCUMENT_XML_BYTES: u64 = 50 * 1024 * 1024;

/// Extracts plain text from a file buffer.
///
/// Returns an empty string for kinds that defer to OCR. An `Err` is only
/// produced for malformed word-processor archives.
pub fn extract_text(bytes: &[u8], kind: ContentKind) -> Result<String> {
    match kind {
        ContentKind::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        ContentKind::WordProcessor => extract_docx(bytes),
        ContentKind::Pdf | ContentKind::Image | ContentKind::Unknown => Ok(String::new()),
    }
}

/// Extracts plain text, retrying transient failures with backoff.
pub async fn extract_text_with_retry(bytes: &[u8], kind: ContentKind) -> Result<String> {
    retry_with_backoff(RetryPolicy::extraction(), "extract_text", |_| true, || async {
        extract_text(bytes, kind)
    })
    .await
}

/// Check whether extracted text meets the success threshold.
pub fn meets_minimum_length(text: &str) -> bool {
    text.trim().chars().count() >= MIN_EXTRACTED_CHARS
}

/// Extracts the text runs of an OOXML word-processor document.
///
/// Unzips `word/document.xml` (bounded read) and walks the XML events,
/// emitting text runs with paragraph and line breaks preserved.
fn extract_docx(bytes: &[u8]) -> Result<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| Error::extraction("invalid word-processor archive").with_source(e))?;

    let mut xml = String::new();
    {
        let file = archive
            .by_name("word/document.xml")
            .map_err(|e| Error::extraction("archive is missing word/document.xml").with_source(e))?;

        file.take(MAX_DOCUMENT_XML_BYTES)
            .read_to_string(&mut xml)
            .map_err(|e| Error::extraction("failed to read word/document.xml").with_source(e))?;
    }

    let mut reader = quick_xml::Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut out = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Text(text)) => {
                if let Ok(value) = text.unescape() {
                    out.push_str(&value);
                }
            }
            Ok(quick_xml::events::Event::Empty(element)) => match element.name().as_ref() {
                b"w:br" => out.push('\n'),
                b"w:tab" => out.push('\t'),
                _ => {}
            },
            Ok(quick_xml::events::Event::End(element)) => {
                if element.name().as_ref() == b"w:p" {
                    out.push_str("\n\n");
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::extraction("malformed document XML").with_source(e));
            }
        }
        buf.clear();
    }

    Ok(out.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn docx_with_document_xml(xml: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn plain_text_decodes_verbatim() {
        let text = extract_text(b"The termination clause.", ContentKind::PlainText).unwrap();
        assert_eq!(text, "The termination clause.");
    }

    #[test]
    fn pdf_and_images_defer_to_ocr() {
        assert_eq!(extract_text(b"%PDF-1.7", ContentKind::Pdf).unwrap(), "");
        assert_eq!(extract_text(b"\x89PNG", ContentKind::Image).unwrap(), "");
        assert_eq!(extract_text(b"??", ContentKind::Unknown).unwrap(), "");
    }

    #[test]
    fn docx_extraction_preserves_paragraphs() {
        let xml = "<w:document><w:body>\
            <w:p><w:r><w:t>First clause.</w:t></w:r></w:p>\
            <w:p><w:r><w:t>Second</w:t><w:br/><w:t>clause.</w:t></w:r></w:p>\
            </w:body></w:document>";
        let bytes = docx_with_document_xml(xml);

        let text = extract_text(&bytes, ContentKind::WordProcessor).unwrap();
        assert_eq!(text, "First clause.\n\nSecond\nclause.");
    }

    #[test]
    fn malformed_docx_is_an_error() {
        let result = extract_text(b"not a zip archive", ContentKind::WordProcessor);
        assert!(result.is_err());
    }

    #[test]
    fn minimum_length_threshold() {
        assert!(!meets_minimum_length("   short   "));
        assert!(meets_minimum_length(&"a".repeat(MIN_EXTRACTED_CHARS)));
    }
}
