//! Telegram Bot API client for docsage.
//!
//! A thin, typed layer over the Bot API operations this bot actually uses:
//! long-polling for updates, sending and editing messages, and downloading
//! uploaded documents.

mod client;
mod error;
mod types;

pub use client::BotClient;
pub use error::{Result, TelegramError};
pub use types::{Chat, Document, File, Message, PDF_MIME_TYPE, Update, User};
