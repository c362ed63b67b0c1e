//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("missing required environment variable '{0}'")]
    MissingVar(&'static str),

    /// An optional override was set but could not be parsed.
    #[error("invalid value '{value}' for '{var}': {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
}
