//! Error types for the retrieval pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;

/// Errors that can occur while building a pipeline or answering a question.
#[derive(Debug, Error)]
pub enum RagError {
    /// Document could not be read or chunked.
    #[error(transparent)]
    Ingest(#[from] docsage_ingest::IngestError),

    /// Vector index failure.
    #[error(transparent)]
    Index(#[from] docsage_index::IndexError),

    /// Embedding or generation failure.
    #[error(transparent)]
    Llm(#[from] docsage_llm::LlmError),

    /// Internal failure (task join, invariant violation).
    #[error("internal error: {0}")]
    Internal(String),
}
