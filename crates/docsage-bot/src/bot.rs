//! Update handling: uploads, questions and the polling loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use docsage_config::{Config, is_within};
use docsage_ingest::verify_pdf;
use docsage_llm::{SharedChat, SharedEmbedder};
use docsage_rag::{PipelineOptions, RetrievalPipeline};
use docsage_session::{SessionStore, UserId};
use docsage_telegram::{BotClient, Document, Message, User};

use crate::dispatch::{Event, classify};
use crate::error::{BotError, Result};
use crate::messages;
use crate::relay::StreamingRelay;
use crate::transport::SharedTransport;

/// Long-poll hold time requested from the Bot API.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Back-off after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// File name used when the upload carries none.
const FALLBACK_DOCUMENT_NAME: &str = "document.pdf";

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// One user's active conversation state.
///
/// Holds the ingested document's identity plus its ready-to-answer pipeline.
/// Replaced wholesale when the user uploads a new document.
#[derive(Clone)]
pub struct Session {
    /// The user this session belongs to.
    pub owner: UserId,
    /// Display name of the ingested document.
    pub document_name: String,
    /// Where the document file lives on disk.
    pub document_path: PathBuf,
    /// The answer pipeline built over the document.
    pub pipeline: Arc<RetrievalPipeline>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Bot
// ─────────────────────────────────────────────────────────────────────────────

/// The document question-answering bot.
pub struct Bot {
    config: Config,
    transport: SharedTransport,
    embedder: SharedEmbedder,
    chat: SharedChat,
    sessions: SessionStore<UserId, Session>,
    options: PipelineOptions,
}

impl Bot {
    /// Assemble the bot from its collaborators.
    pub fn new(
        config: Config,
        transport: SharedTransport,
        embedder: SharedEmbedder,
        chat: SharedChat,
    ) -> Self {
        Self {
            config,
            transport,
            embedder,
            chat,
            sessions: SessionStore::new(),
            options: PipelineOptions::default(),
        }
    }

    /// Override retrieval tuning.
    pub fn with_pipeline_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of users with an active session.
    pub async fn active_sessions(&self) -> usize {
        self.sessions.len().await
    }

    /// Poll for updates forever, handling each message in its own task.
    pub async fn run(self: Arc<Self>, client: Arc<BotClient>) {
        tracing::info!("Bot is listening");

        let mut offset: Option<i64> = None;
        loop {
            let updates = match client.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "Polling failed, retrying");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                if let Some(message) = update.message {
                    let bot = Arc::clone(&self);
                    tokio::spawn(async move {
                        bot.handle_message(message).await;
                    });
                }
            }
        }
    }

    /// Dispatch one inbound message to its handler.
    pub async fn handle_message(&self, message: Message) {
        let chat_id = message.chat.id;
        let from = message.from.as_ref();

        let result = match classify(&message) {
            Event::Start => self.handle_start(chat_id, from).await,
            Event::PdfUpload(document) => match from {
                Some(user) => {
                    self.handle_upload(UserId::new(user.id), chat_id, &document)
                        .await
                }
                None => Ok(()),
            },
            Event::Question(question) => match from {
                Some(user) => {
                    self.handle_question(UserId::new(user.id), chat_id, &question)
                        .await
                }
                None => Ok(()),
            },
            Event::UnsupportedAttachment => self.send(chat_id, messages::WRONG_FILE).await,
            Event::Ignored => Ok(()),
        };

        if let Err(e) = result {
            tracing::error!(chat_id, error = %e, "Failed to handle message");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handlers
    // ─────────────────────────────────────────────────────────────────────────

    async fn handle_start(&self, chat_id: i64, from: Option<&User>) -> Result<()> {
        let name = from.map(User::full_name).unwrap_or_else(|| "there".to_string());
        self.send(chat_id, &messages::welcome(&name, self.config.max_pages))
            .await
    }

    /// Accept an uploaded PDF: download, validate, ingest, publish session.
    async fn handle_upload(&self, user: UserId, chat_id: i64, document: &Document) -> Result<()> {
        let file_name = sanitize_file_name(document.file_name.as_deref());
        let dest = self.config.document_path(user.raw(), &file_name);

        // Sanitization should make escape impossible; refuse to write if not
        let user_dir = self.config.user_dir(user.raw());
        if !is_within(&user_dir, &dest) {
            return Err(BotError::Internal(format!(
                "upload destination '{}' escapes '{}'",
                dest.display(),
                user_dir.display()
            )));
        }

        if let Err(e) = self
            .transport
            .download_document(&document.file_id, &dest)
            .await
        {
            tracing::error!(user = %user, error = %e, "Document download failed");
            return self.send(chat_id, messages::UPLOAD_FAILED).await;
        }

        let info = {
            let path = dest.clone();
            tokio::task::spawn_blocking(move || verify_pdf(path))
                .await
                .map_err(|e| BotError::Internal(format!("validation task failed: {e}")))?
        };

        let info = match info {
            Ok(info) => info,
            Err(e) => {
                tracing::info!(user = %user, error = %e, "Rejected invalid document");
                remove_file_logged(&dest).await;
                return self.send(chat_id, messages::INVALID_PDF).await;
            }
        };

        if info.page_count > self.config.max_pages {
            tracing::info!(
                user = %user,
                pages = info.page_count,
                max = self.config.max_pages,
                "Rejected oversized document"
            );
            remove_file_logged(&dest).await;
            return self
                .send(chat_id, &messages::too_many_pages(self.config.max_pages))
                .await;
        }

        self.send(chat_id, &messages::document_valid(info.page_count))
            .await?;

        let pipeline = match RetrievalPipeline::build(
            &dest,
            self.config.index_dir(user.raw()),
            self.embedder.clone(),
            self.chat.clone(),
            self.options.clone(),
        )
        .await
        {
            Ok(pipeline) => pipeline,
            Err(e) => {
                tracing::error!(user = %user, error = %e, "Ingestion failed");
                remove_file_logged(&dest).await;
                return self.send(chat_id, messages::UPLOAD_FAILED).await;
            }
        };

        let session = Session {
            owner: user,
            document_name: file_name.clone(),
            document_path: dest.clone(),
            pipeline: Arc::new(pipeline),
        };

        // The index was already truncated in place during the rebuild; the
        // previous document file is the only artifact left to reclaim.
        if let Some(replaced) = self.sessions.put(user, session).await {
            if replaced.document_path != dest {
                tracing::debug!(
                    user = %user,
                    old = %replaced.document_path.display(),
                    "Reclaiming replaced document"
                );
                remove_file_logged(&replaced.document_path).await;
            }
        }

        tracing::info!(user = %user, document = %file_name, pages = info.page_count, "Document ingested");
        self.send(chat_id, &messages::ready(&file_name)).await
    }

    /// Answer a question over the user's active document.
    async fn handle_question(&self, user: UserId, chat_id: i64, question: &str) -> Result<()> {
        let Some(session) = self.sessions.get(&user).await else {
            return self.send(chat_id, messages::NO_DOCUMENT_YET).await;
        };

        let placeholder_id = self
            .transport
            .send_message(chat_id, messages::THINKING_PLACEHOLDER)
            .await?;

        let mut relay = StreamingRelay::new(self.transport.clone(), chat_id, placeholder_id);
        if let Err(e) = session.pipeline.answer(question, &mut relay).await {
            tracing::error!(user = %user, error = %e, "Answer generation failed");
            // Never strand the placeholder on a failed answer
            self.transport
                .edit_message(chat_id, placeholder_id, messages::ANSWER_FAILED)
                .await?;
        }

        Ok(())
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        self.transport.send_message(chat_id, text).await?;
        Ok(())
    }
}

/// Reduce an upload's declared name to a bare file name.
///
/// Strips any path components so a crafted name cannot escape the user's
/// storage directory.
fn sanitize_file_name(declared: Option<&str>) -> String {
    declared
        .map(Path::new)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_DOCUMENT_NAME.to_string())
}

async fn remove_file_logged(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove file");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
