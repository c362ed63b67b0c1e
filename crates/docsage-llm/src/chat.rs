//! Streaming chat completion backend.
//!
//! [`OpenAiChat`] talks to OpenAI's chat-completions API (or any
//! OpenAI-compatible service) in streaming mode and yields answer text one
//! delta at a time. [`MockChat`] replays a scripted token sequence for tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Client, Response, header};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{LlmError, Result};

/// Default OpenAI API base URL.
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// Default timeout for chat requests.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

/// Message role in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation messages, oldest first.
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a request from a single user message.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(content)],
            max_tokens: None,
            temperature: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming Types
// ─────────────────────────────────────────────────────────────────────────────

/// A streaming chat response.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send + 'static>>;

/// Events emitted while an answer is being generated.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Generation started.
    Start { id: String, model: String },
    /// One incremental fragment of answer text.
    Token(String),
    /// Generation finished; no further tokens follow.
    Done,
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for streaming chat completion providers.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Start a streaming completion for the given request.
    async fn stream_completion(&self, request: CompletionRequest) -> Result<TokenStream>;

    /// Name of this backend.
    fn name(&self) -> &str;
}

/// A shared chat backend usable across tasks.
pub type SharedChat = Arc<dyn ChatBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the OpenAI chat backend.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl ChatConfig {
    /// Create a new config for OpenAI with the given key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            model: model.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenAI chat-completions backend.
pub struct OpenAiChat {
    client: Client,
    config: ChatConfig,
}

impl OpenAiChat {
    /// Create a new backend with the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn error_from_response(response: Response) -> LlmError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(error) = serde_json::from_str::<OpenAiErrorResponse>(&body) {
            match status.as_u16() {
                401 => LlmError::Auth(error.error.message),
                429 => LlmError::RateLimit(error.error.message),
                500..=599 => LlmError::Backend(format!("server error: {}", error.error.message)),
                _ => LlmError::Backend(error.error.message),
            }
        } else {
            LlmError::Backend(format!("HTTP {status}: {body}"))
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiChat {
    async fn stream_completion(&self, request: CompletionRequest) -> Result<TokenStream> {
        let body = OpenAiChatRequest {
            model: self.config.model.clone(),
            messages: request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: true,
        };

        tracing::debug!(
            model = %body.model,
            messages = body.messages.len(),
            "Starting streaming chat completion"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(parse_sse_stream(response.bytes_stream()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiError {
    message: String,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiStreamChunk {
    id: String,
    model: String,
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiStreamChoice {
    delta: Option<OpenAiStreamDelta>,
    finish_reason: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiStreamDelta {
    content: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// SSE Streaming
// ─────────────────────────────────────────────────────────────────────────────

struct SseState {
    byte_stream: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    buffer: String,
    done: bool,
    started: bool,
    // Content carried by the chunk that produced Start, emitted next
    pending_token: Option<String>,
}

fn parse_sse_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> TokenStream {
    Box::pin(futures::stream::unfold(
        SseState {
            byte_stream: Box::pin(byte_stream),
            buffer: String::new(),
            done: false,
            started: false,
            pending_token: None,
        },
        |mut state| async move {
            if state.done {
                return None;
            }

            if let Some(content) = state.pending_token.take() {
                return Some((Ok(StreamEvent::Token(content)), state));
            }

            loop {
                // Process complete lines already buffered
                while let Some(line_end) = state.buffer.find('\n') {
                    let line = state.buffer[..line_end].trim().to_string();
                    state.buffer = state.buffer[line_end + 1..].to_string();

                    if line.is_empty() {
                        continue;
                    }

                    if let Some(data) = line.strip_prefix("data: ") {
                        if data == "[DONE]" {
                            state.done = true;
                            return Some((Ok(StreamEvent::Done), state));
                        }

                        if let Ok(chunk) = serde_json::from_str::<OpenAiStreamChunk>(data) {
                            if !state.started {
                                state.started = true;
                                // Usually a role-only delta, but some
                                // providers put content in the first chunk
                                state.pending_token = chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|c| c.delta)
                                    .and_then(|d| d.content)
                                    .filter(|c| !c.is_empty());
                                return Some((
                                    Ok(StreamEvent::Start {
                                        id: chunk.id,
                                        model: chunk.model,
                                    }),
                                    state,
                                ));
                            }

                            if let Some(choice) = chunk.choices.into_iter().next() {
                                if let Some(content) =
                                    choice.delta.and_then(|d| d.content).filter(|c| !c.is_empty())
                                {
                                    return Some((Ok(StreamEvent::Token(content)), state));
                                }
                                // finish_reason arrives on a contentless chunk;
                                // Done is emitted by the [DONE] sentinel.
                                let _ = choice.finish_reason;
                            }
                        }
                    }
                }

                // Need more bytes
                match state.byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        state.buffer.push_str(&String::from_utf8_lossy(&bytes));
                    }
                    Some(Err(e)) => {
                        state.done = true;
                        return Some((Err(LlmError::Network(e.to_string())), state));
                    }
                    None => {
                        if !state.done {
                            // Provider closed the stream without a [DONE] sentinel
                            state.done = true;
                            return Some((Ok(StreamEvent::Done), state));
                        }
                        return None;
                    }
                }
            }
        },
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Chat backend that replays a scripted token sequence.
///
/// Useful for exercising streaming consumers without network access.
#[derive(Debug, Clone)]
pub struct MockChat {
    tokens: Vec<String>,
    fail: bool,
}

impl MockChat {
    /// Create a mock that streams the given tokens then completes.
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            fail: false,
        }
    }

    /// Create a mock whose `stream_completion` always fails.
    pub fn failing() -> Self {
        Self {
            tokens: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ChatBackend for MockChat {
    async fn stream_completion(&self, _request: CompletionRequest) -> Result<TokenStream> {
        if self.fail {
            return Err(LlmError::Backend("mock backend failure".to_string()));
        }

        let mut events = vec![Ok(StreamEvent::Start {
            id: "mock-1".to_string(),
            model: "mock".to_string(),
        })];
        events.extend(self.tokens.iter().cloned().map(|t| Ok(StreamEvent::Token(t))));
        events.push(Ok(StreamEvent::Done));

        Ok(Box::pin(futures::stream::iter(events)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config() {
        let config = ChatConfig::new("sk-test", "gpt-3.5-turbo");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_OPENAI_BASE);
        assert_eq!(config.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_completions_url() {
        let backend = OpenAiChat::new(ChatConfig::new("k", "m")).unwrap();
        assert_eq!(
            backend.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let config = ChatConfig::new("k", "m").with_base_url("http://localhost:11434/v1");
        let backend = OpenAiChat::new(config).unwrap();
        assert_eq!(
            backend.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let body = OpenAiChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: None,
            temperature: None,
            stream: true,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert!(json.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_sse_stream_parsing() {
        let payload = concat!(
            "data: {\"id\":\"c1\",\"model\":\"gpt-3.5-turbo\",\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\n",
            "data: {\"id\":\"c1\",\"model\":\"gpt-3.5-turbo\",\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"id\":\"c1\",\"model\":\"gpt-3.5-turbo\",\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: {\"id\":\"c1\",\"model\":\"gpt-3.5-turbo\",\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );

        let bytes = Bytes::from_static(payload.as_bytes());
        let byte_stream = futures::stream::iter(vec![reqwest::Result::Ok(bytes)]);

        let mut stream = parse_sse_stream(byte_stream);
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event.unwrap());
        }

        assert_eq!(
            events,
            vec![
                StreamEvent::Start {
                    id: "c1".to_string(),
                    model: "gpt-3.5-turbo".to_string()
                },
                StreamEvent::Token("Hel".to_string()),
                StreamEvent::Token("lo".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_sse_stream_split_across_chunks() {
        // One SSE line delivered in two byte chunks
        let part1 = Bytes::from_static(
            b"data: {\"id\":\"c1\",\"model\":\"m\",\"choices\"",
        );
        let part2 = Bytes::from_static(
            b":[{\"delta\":{\"content\":\"A\"}}]}\n\ndata: [DONE]\n\n",
        );
        let byte_stream =
            futures::stream::iter(vec![reqwest::Result::Ok(part1), reqwest::Result::Ok(part2)]);

        let mut stream = parse_sse_stream(byte_stream);
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event.unwrap());
        }

        // First chunk yields Start plus its content; [DONE] terminates.
        assert_eq!(
            events,
            vec![
                StreamEvent::Start {
                    id: "c1".to_string(),
                    model: "m".to_string()
                },
                StreamEvent::Token("A".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_first_chunk_content_not_lost() {
        let payload = concat!(
            "data: {\"id\":\"c1\",\"model\":\"m\",\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"id\":\"c1\",\"model\":\"m\",\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        let bytes = Bytes::from_static(payload.as_bytes());
        let byte_stream = futures::stream::iter(vec![reqwest::Result::Ok(bytes)]);

        let mut stream = parse_sse_stream(byte_stream);
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event.unwrap());
        }

        assert_eq!(
            events,
            vec![
                StreamEvent::Start {
                    id: "c1".to_string(),
                    model: "m".to_string()
                },
                StreamEvent::Token("Hel".to_string()),
                StreamEvent::Token("lo".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_sse_stream_eof_without_done() {
        let bytes = Bytes::from_static(
            b"data: {\"id\":\"c1\",\"model\":\"m\",\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\n",
        );
        let byte_stream = futures::stream::iter(vec![reqwest::Result::Ok(bytes)]);

        let mut stream = parse_sse_stream(byte_stream);
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event.unwrap());
        }

        assert_eq!(events.last(), Some(&StreamEvent::Done));
    }

    #[tokio::test]
    async fn test_mock_chat_streams_script() {
        let mock = MockChat::new(["A", "B", "C"]);
        let mut stream = mock
            .stream_completion(CompletionRequest::from_user("q"))
            .await
            .unwrap();

        let mut tokens = Vec::new();
        let mut done = false;
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                StreamEvent::Token(t) => tokens.push(t),
                StreamEvent::Done => done = true,
                StreamEvent::Start { .. } => {}
            }
        }

        assert_eq!(tokens, vec!["A", "B", "C"]);
        assert!(done);
    }

    #[tokio::test]
    async fn test_mock_chat_failing() {
        let mock = MockChat::failing();
        let result = mock.stream_completion(CompletionRequest::from_user("q")).await;
        assert!(matches!(result, Err(LlmError::Backend(_))));
    }
}
