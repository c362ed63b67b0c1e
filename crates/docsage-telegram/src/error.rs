//! Error types for the Telegram client.

use thiserror::Error;

/// Result type alias for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

/// Errors produced by Bot API calls.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The Bot API rejected the request.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    /// Network-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to decode an API payload.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Local file I/O failure during a download.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response envelope was malformed.
    #[error("malformed API response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TelegramError::Network(format!("request timed out: {e}"))
        } else {
            TelegramError::Network(e.to_string())
        }
    }
}
