//! Error types for index operations.

use thiserror::Error;

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur while building or querying a document index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to create the index directory or file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A vector's dimensionality does not match the index.
    #[error("embedding has {got} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}
