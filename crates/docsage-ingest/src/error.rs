//! Error types for document ingestion.

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while validating or reading a document.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file is not a well-formed PDF document.
    #[error("not a valid PDF document: {0}")]
    InvalidPdf(String),

    /// Text extraction failed.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    /// The document yielded no extractable text.
    #[error("document contains no extractable text")]
    EmptyDocument,
}
