//! Reqwest-based Telegram Bot API client.
//!
//! Every method call is a JSON POST to
//! `https://api.telegram.org/bot<token>/<method>` whose response is wrapped
//! in the Bot API `{ok, result, description, error_code}` envelope. File
//! content is fetched from the separate `file/bot<token>` host path.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, TelegramError};
use crate::types::{File, Message, Update, User};

/// Default Bot API host.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Timeout for ordinary method calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Telegram Bot API client.
pub struct BotClient {
    client: Client,
    token: String,
    api_base: String,
}

impl BotClient {
    /// Create a client for the given bot token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a client against a custom API host (local test servers).
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| TelegramError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }

    /// Invoke a Bot API method and unwrap the response envelope.
    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
        timeout: Duration,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await?;

        let body = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| TelegramError::Serialization(format!("{method}: {e}")))?;

        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| TelegramError::Malformed(format!("{method}: ok without result")))
        } else {
            Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or(0),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify the bot token and fetch the bot's own identity.
    pub async fn get_me(&self) -> Result<User> {
        self.call(
            "getMe",
            &serde_json::json!({}),
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
        .await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        // Long poll: HTTP timeout must outlast the server-side hold
        self.call(
            "getUpdates",
            &params,
            Duration::from_secs(timeout_secs + REQUEST_TIMEOUT_SECS),
        )
        .await
    }

    /// Send a plain-text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        let params = SendMessageParams { chat_id, text };
        self.call(
            "sendMessage",
            &params,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
        .await
    }

    /// Replace the text of a previously sent message.
    ///
    /// Editing with unchanged text is rejected by the API; that rejection is
    /// logged and swallowed since the caller's content is already visible.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<()> {
        let params = EditMessageParams {
            chat_id,
            message_id,
            text,
        };
        let result: std::result::Result<Message, TelegramError> = self
            .call(
                "editMessageText",
                &params,
                Duration::from_secs(REQUEST_TIMEOUT_SECS),
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(TelegramError::Api { description, .. })
                if description.contains("message is not modified") =>
            {
                tracing::debug!(chat_id, message_id, "Edit skipped: content unchanged");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a file id into a downloadable path.
    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        let params = GetFileParams { file_id };
        self.call(
            "getFile",
            &params,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
        .await
    }

    /// Download a file (by `getFile` path) to `dest`, creating parent
    /// directories as needed.
    pub async fn download_file(&self, file_path: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self.client.get(self.file_url(file_path)).send().await?;
        if !response.status().is_success() {
            return Err(TelegramError::Api {
                code: response.status().as_u16() as i64,
                description: format!("file download failed for '{file_path}'"),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;

        tracing::debug!(dest = %dest.display(), size = bytes.len(), "File downloaded");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageParams<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct EditMessageParams<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GetFileParams<'a> {
    file_id: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let client = BotClient::new("123:abc").unwrap();
        assert_eq!(
            client.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_file_url() {
        let client = BotClient::new("123:abc").unwrap();
        assert_eq!(
            client.file_url("documents/file_1.pdf"),
            "https://api.telegram.org/file/bot123:abc/documents/file_1.pdf"
        );
    }

    #[test]
    fn test_custom_api_base_trailing_slash() {
        let client = BotClient::with_api_base("123:abc", "http://localhost:8081/").unwrap();
        assert_eq!(
            client.method_url("getMe"),
            "http://localhost:8081/bot123:abc/getMe"
        );
    }

    #[test]
    fn test_envelope_success_parsing() {
        let body = r#"{"ok": true, "result": [{"update_id": 7}]}"#;
        let envelope: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        assert!(envelope.ok);
        assert_eq!(envelope.result.unwrap()[0].update_id, 7);
    }

    #[test]
    fn test_envelope_error_parsing() {
        let body = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let envelope: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.error_code, Some(401));
        assert_eq!(envelope.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_get_updates_params_serialization() {
        let params = GetUpdatesParams {
            offset: Some(100),
            timeout: 30,
            allowed_updates: &["message"],
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["offset"], 100);
        assert_eq!(json["timeout"], 30);
        assert_eq!(json["allowed_updates"][0], "message");

        let params = GetUpdatesParams {
            offset: None,
            timeout: 30,
            allowed_updates: &["message"],
        };
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("offset").is_none());
    }
}
