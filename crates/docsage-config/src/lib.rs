//! Environment-driven configuration for docsage.
//!
//! Configuration is read once at startup into an immutable [`Config`].
//! Required values (API credentials) fail fast with a [`ConfigError`] so the
//! process never starts polling with a broken setup. Optional values have the
//! documented defaults.

use std::path::{Path, PathBuf};

mod error;

pub use error::{ConfigError, Result};

/// Default chat completion model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Default root directory for per-user documents and indexes.
pub const DEFAULT_FILES_ROOT: &str = "USER_FILES";

/// Default upper bound on accepted document page count.
pub const DEFAULT_MAX_PAGES: usize = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key for chat and embedding requests.
    pub openai_api_key: String,

    /// Telegram bot token.
    pub bot_token: String,

    /// Chat completion model identifier.
    pub chat_model: String,

    /// Embedding model identifier.
    pub embedding_model: String,

    /// Root directory for per-user file and index storage.
    pub files_root: PathBuf,

    /// Maximum accepted document page count.
    pub max_pages: usize,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `OPENAI_KEY` and `BOT_TOKEN` are required; everything else falls back
    /// to the documented default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an injected variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_KEY").ok_or(ConfigError::MissingVar("OPENAI_KEY"))?;
        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::MissingVar("BOT_TOKEN"))?;

        let chat_model = get("MODEL_NAME").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let embedding_model =
            get("EMBEDDING_NAME").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let files_root = get("USER_FILES_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILES_ROOT));

        let max_pages = match get("MAX_PAGES") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidVar {
                    var: "MAX_PAGES",
                    value: raw,
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_MAX_PAGES,
        };

        tracing::debug!(
            chat_model = %chat_model,
            embedding_model = %embedding_model,
            files_root = %files_root.display(),
            max_pages,
            "Configuration loaded"
        );

        Ok(Self {
            openai_api_key,
            bot_token,
            chat_model,
            embedding_model,
            files_root,
            max_pages,
        })
    }

    /// Directory holding one user's uploaded documents.
    pub fn user_dir(&self, user_id: i64) -> PathBuf {
        self.files_root.join(user_id.to_string())
    }

    /// Directory holding one user's persisted vector index.
    pub fn index_dir(&self, user_id: i64) -> PathBuf {
        self.user_dir(user_id).join("db")
    }

    /// Destination path for an uploaded document.
    pub fn document_path(&self, user_id: i64, file_name: &str) -> PathBuf {
        self.user_dir(user_id).join(file_name)
    }
}

/// Check that a path stays inside the given root (no traversal components).
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
