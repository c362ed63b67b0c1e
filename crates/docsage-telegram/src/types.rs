//! Telegram Bot API wire types.
//!
//! Only the fields this bot consumes are modeled; unknown fields are
//! ignored during deserialization.

use serde::Deserialize;

/// MIME type of PDF documents.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// One inbound update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,
    /// The message payload, when the update is a message.
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub document: Option<Document>,
    /// Present for non-document attachments we don't handle.
    #[serde(default)]
    pub photo: Option<serde_json::Value>,
    #[serde(default)]
    pub audio: Option<serde_json::Value>,
    #[serde(default)]
    pub video: Option<serde_json::Value>,
    #[serde(default)]
    pub voice: Option<serde_json::Value>,
    #[serde(default)]
    pub sticker: Option<serde_json::Value>,
}

impl Message {
    /// Whether the message carries any attachment at all.
    pub fn has_attachment(&self) -> bool {
        self.document.is_some()
            || self.photo.is_some()
            || self.audio.is_some()
            || self.video.is_some()
            || self.voice.is_some()
            || self.sticker.is_some()
    }
}

/// The sender of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    /// Full display name ("First Last" or just "First").
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A file attachment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

impl Document {
    /// Whether this attachment declares itself a PDF.
    ///
    /// The declared MIME type wins; a `.pdf` file name is accepted as a
    /// fallback for clients that omit the MIME type.
    pub fn is_pdf(&self) -> bool {
        if let Some(mime) = &self.mime_type {
            return mime == PDF_MIME_TYPE;
        }
        self.file_name
            .as_deref()
            .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
            .unwrap_or(false)
    }
}

/// File metadata from `getFile`, used to build the download URL.
#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_path: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
