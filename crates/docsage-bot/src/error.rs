//! Error types for update handling.

use thiserror::Error;

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;

/// Errors that can occur while handling an update.
#[derive(Debug, Error)]
pub enum BotError {
    /// Bot API call failure.
    #[error(transparent)]
    Telegram(#[from] docsage_telegram::TelegramError),

    /// Document validation or extraction failure.
    #[error(transparent)]
    Ingest(#[from] docsage_ingest::IngestError),

    /// Pipeline construction or answering failure.
    #[error(transparent)]
    Rag(#[from] docsage_rag::RagError),

    /// Local file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal failure (task join, invariant violation).
    #[error("internal error: {0}")]
    Internal(String),
}
