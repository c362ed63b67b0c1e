//! Outbound chat transport seam.
//!
//! Handlers talk to the chat platform through [`Transport`] rather than
//! [`BotClient`] directly, so upload and question flows can be exercised in
//! tests without a network.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use docsage_telegram::{BotClient, TelegramError};

use crate::error::Result;

/// Outbound operations the handlers need from the chat platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message to a chat; returns the new message's id.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64>;

    /// Replace the text of a previously sent message.
    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;

    /// Download the attachment with `file_id` to `dest`.
    async fn download_document(&self, file_id: &str, dest: &Path) -> Result<()>;
}

/// A shared transport usable across handler tasks.
pub type SharedTransport = Arc<dyn Transport>;

#[async_trait]
impl Transport for BotClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64> {
        let message = BotClient::send_message(self, chat_id, text).await?;
        Ok(message.message_id)
    }

    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        Ok(BotClient::edit_message_text(self, chat_id, message_id, text).await?)
    }

    async fn download_document(&self, file_id: &str, dest: &Path) -> Result<()> {
        let file = self.get_file(file_id).await?;
        let file_path = file.file_path.ok_or_else(|| {
            TelegramError::Malformed(format!("getFile returned no path for '{file_id}'"))
        })?;
        Ok(self.download_file(&file_path, dest).await?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Transport
// ─────────────────────────────────────────────────────────────────────────────

/// One observed outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Sent {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    Edited {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    Downloaded {
        file_id: String,
        dest: PathBuf,
    },
}

/// In-memory transport that records every call.
///
/// `download_document` writes the configured payload to the destination, so
/// the full upload flow can run against a real file on disk.
#[derive(Default)]
pub struct MockTransport {
    state: parking_lot::Mutex<MockState>,
    payload: Vec<u8>,
    fail_downloads: bool,
}

#[derive(Default)]
struct MockState {
    next_message_id: i64,
    calls: Vec<TransportCall>,
}

impl MockTransport {
    /// Create a transport that records calls and serves no file content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose downloads write `payload` to disk.
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Create a transport whose downloads always fail.
    pub fn failing_downloads() -> Self {
        Self {
            fail_downloads: true,
            ..Self::default()
        }
    }

    /// Everything sent, edited or downloaded so far, in call order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().calls.clone()
    }

    /// Texts of all `send_message` calls, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Sent { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Texts of all `edit_message` calls, in order.
    pub fn edited_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Edited { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64> {
        let mut state = self.state.lock();
        state.next_message_id += 1;
        let message_id = state.next_message_id;
        state.calls.push(TransportCall::Sent {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(message_id)
    }

    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        self.state.lock().calls.push(TransportCall::Edited {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn download_document(&self, file_id: &str, dest: &Path) -> Result<()> {
        if self.fail_downloads {
            return Err(TelegramError::Network("mock download failure".to_string()).into());
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &self.payload).await?;

        self.state.lock().calls.push(TransportCall::Downloaded {
            file_id: file_id.to_string(),
            dest: dest.to_path_buf(),
        });
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
