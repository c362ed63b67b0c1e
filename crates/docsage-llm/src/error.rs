//! Error types for the LLM crate.

use thiserror::Error;

/// Result type alias using the LLM error type.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors produced by chat and embedding clients.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration problem (bad key, bad URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication failed (HTTP 401).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Rate limit exceeded (HTTP 429).
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// The provider returned an error response.
    #[error("backend error: {0}")]
    Backend(String),

    /// Network-level failure (connect, timeout, broken stream).
    #[error("network error: {0}")]
    Network(String),

    /// Failed to decode a provider payload.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Network(format!("request timed out: {e}"))
        } else {
            LlmError::Network(e.to_string())
        }
    }
}
