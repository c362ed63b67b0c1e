//! PDF validation and text extraction.
//!
//! Validation loads the document structure with `lopdf` and reports the page
//! count; extraction pulls the full text with `pdf-extract`. A file that
//! cannot be loaded is treated as invalid rather than as an I/O failure —
//! from the user's point of view both mean "I can't work with this file".

use std::path::Path;

use crate::error::{IngestError, Result};

/// Summary of a validated PDF document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfInfo {
    /// Number of pages in the document.
    pub page_count: usize,
}

/// Verify that the file at `path` is a well-formed PDF document.
pub fn verify_pdf(path: impl AsRef<Path>) -> Result<PdfInfo> {
    let path = path.as_ref();
    let document =
        lopdf::Document::load(path).map_err(|e| IngestError::InvalidPdf(e.to_string()))?;

    let page_count = document.get_pages().len();
    tracing::debug!(path = %path.display(), page_count, "PDF validated");

    Ok(PdfInfo { page_count })
}

/// Extract the full text content of a PDF document.
///
/// Fails with [`IngestError::EmptyDocument`] when the document has no
/// extractable text (for example, a scanned image without an OCR layer).
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = pdf_extract::extract_text(path)
        .map_err(|e| IngestError::Extraction(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(IngestError::EmptyDocument);
    }

    tracing::debug!(path = %path.display(), chars = text.len(), "Text extracted");
    Ok(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_test_pdf;
    use std::io::Write;

    #[test]
    fn test_verify_valid_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        write_test_pdf(&path, &["Hello from page one"]);

        let info = verify_pdf(&path).unwrap();
        assert_eq!(info.page_count, 1);
    }

    #[test]
    fn test_verify_multipage_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        write_test_pdf(&path, &["page one", "page two", "page three"]);

        let info = verify_pdf(&path).unwrap();
        assert_eq!(info.page_count, 3);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-pdf.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"this is definitely not a pdf").unwrap();

        let result = verify_pdf(&path);
        assert!(matches!(result, Err(IngestError::InvalidPdf(_))));
    }

    #[test]
    fn test_verify_rejects_missing_file() {
        let result = verify_pdf("/nonexistent/path/doc.pdf");
        assert!(matches!(result, Err(IngestError::InvalidPdf(_))));
    }

    #[test]
    fn test_extract_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        write_test_pdf(&path, &["Hello from page one"]);

        let text = extract_text(&path).unwrap();
        assert!(text.contains("Hello from page one"));
    }
}
