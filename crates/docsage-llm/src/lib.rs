//! OpenAI chat streaming and embedding clients for docsage.
//!
//! Two seams are exposed as traits so downstream code can run against mocks:
//!
//! - [`ChatBackend`] — streaming chat completions ([`OpenAiChat`] / [`MockChat`])
//! - [`Embedder`] — text embeddings ([`OpenAiEmbedder`] / [`MockEmbedder`])

pub mod chat;
pub mod embeddings;
pub mod error;

pub use chat::{
    ChatBackend, ChatConfig, ChatMessage, CompletionRequest, MockChat, OpenAiChat, Role,
    SharedChat, StreamEvent, TokenStream,
};
pub use embeddings::{Embedder, EmbedderConfig, MockEmbedder, OpenAiEmbedder, SharedEmbedder};
pub use error::{LlmError, Result};
