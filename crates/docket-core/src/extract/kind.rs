//! Content type classification for uploaded files.
//!
//! The declared MIME type (with a file-extension fallback) is resolved once
//! into a [`ContentKind`] and matched exhaustively afterwards, instead of
//! scattering string comparisons through the pipeline.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// MIME type for plain text.
pub const MIME_PLAIN_TEXT: &str = "text/plain";
/// MIME type for PDF documents.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type for OOXML word-processor documents.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for legacy word-processor documents.
pub const MIME_DOC: &str = "application/msword";

/// High-level classification of an uploaded file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Plain text content, decoded verbatim.
    PlainText,
    /// Word-processor documents (DOCX), converted to plain text.
    WordProcessor,
    /// PDF documents; extraction is skipped in favor of uniform OCR.
    Pdf,
    /// Image files; always transcribed via OCR.
    Image,
    /// Unknown or unsupported content.
    #[default]
    Unknown,
}

impl ContentKind {
    /// Resolves the kind from the declared MIME type, falling back to the
    /// file extension when the type is missing or unrecognized.
    pub fn resolve(content_type: &str, file_name: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        let kind = match mime.as_str() {
            MIME_PLAIN_TEXT | "text/markdown" | "text/csv" => Self::PlainText,
            MIME_DOCX | MIME_DOC => Self::WordProcessor,
            MIME_PDF => Self::Pdf,
            _ if mime.starts_with("image/") => Self::Image,
            _ => Self::Unknown,
        };

        if kind == Self::Unknown {
            Self::resolve_extension(file_name)
        } else {
            kind
        }
    }

    fn resolve_extension(file_name: &str) -> Self {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "md" | "csv" => Self::PlainText,
            "docx" | "doc" => Self::WordProcessor,
            "pdf" => Self::Pdf,
            "png" | "jpg" | "jpeg" | "tiff" | "webp" => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Check if direct extraction never produces text for this kind.
    ///
    /// These kinds go straight to the OCR fallback.
    #[must_use]
    pub fn is_ocr_only(&self) -> bool {
        matches!(self, Self::Pdf | Self::Image | Self::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_mime_type() {
        assert_eq!(
            ContentKind::resolve("text/plain; charset=utf-8", "notes"),
            ContentKind::PlainText
        );
        assert_eq!(ContentKind::resolve(MIME_DOCX, "contract"), ContentKind::WordProcessor);
        assert_eq!(ContentKind::resolve(MIME_PDF, "scan"), ContentKind::Pdf);
        assert_eq!(ContentKind::resolve("image/png", "exhibit"), ContentKind::Image);
    }

    #[test]
    fn falls_back_to_extension() {
        assert_eq!(
            ContentKind::resolve("application/octet-stream", "brief.docx"),
            ContentKind::WordProcessor
        );
        assert_eq!(
            ContentKind::resolve("", "exhibit-a.JPG"),
            ContentKind::Image
        );
        assert_eq!(ContentKind::resolve("", "mystery.bin"), ContentKind::Unknown);
    }

    #[test]
    fn ocr_only_kinds() {
        assert!(ContentKind::Pdf.is_ocr_only());
        assert!(ContentKind::Image.is_ocr_only());
        assert!(ContentKind::Unknown.is_ocr_only());
        assert!(!ContentKind::PlainText.is_ocr_only());
        assert!(!ContentKind::WordProcessor.is_ocr_only());
    }
}
