//! Retrieval pipeline: document → index, question → streamed answer.

use std::path::{Path, PathBuf};

use futures::StreamExt;

use docsage_index::DocumentIndex;
use docsage_ingest::{extract_text, split_text};
use docsage_llm::{CompletionRequest, SharedChat, SharedEmbedder, StreamEvent};

use crate::error::{RagError, Result};
use crate::prompt::{DEFAULT_MAX_CONTEXT_CHARS, build_prompt};
use crate::sink::AnswerSink;

/// Tuning knobs for pipeline construction and retrieval.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Chunk size in characters for document splitting.
    pub chunk_size: usize,

    /// Number of chunks retrieved per question.
    pub top_k: usize,

    /// Character budget for stuffed context.
    pub max_context_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_size: docsage_ingest::DEFAULT_CHUNK_SIZE,
            top_k: 4,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}

/// One document's retrieval-augmented answer pipeline.
///
/// Built once per accepted upload; `answer` may be called any number of
/// times afterwards. Distinct questions don't share mutable state, but the
/// pipeline is not designed for concurrent invocation by the same user —
/// the interleaving of two simultaneous answers into one chat is undefined.
pub struct RetrievalPipeline {
    index: DocumentIndex,
    embedder: SharedEmbedder,
    chat: SharedChat,
    options: PipelineOptions,
}

impl RetrievalPipeline {
    /// Ingest `document_path` into a fresh index under `index_dir` and
    /// return the ready-to-answer pipeline.
    ///
    /// Nothing is published to callers until every step has succeeded, so a
    /// failed build leaves no half-usable pipeline behind (the truncated
    /// index file on disk is overwritten by the next successful build).
    pub async fn build(
        document_path: impl Into<PathBuf>,
        index_dir: impl AsRef<Path>,
        embedder: SharedEmbedder,
        chat: SharedChat,
        options: PipelineOptions,
    ) -> Result<Self> {
        let document_path = document_path.into();

        // PDF parsing is CPU-bound; keep it off the async workers
        let text = tokio::task::spawn_blocking({
            let path = document_path.clone();
            move || extract_text(path)
        })
        .await
        .map_err(|e| RagError::Internal(format!("extraction task failed: {e}")))??;

        let chunks = split_text(&text, options.chunk_size);
        tracing::info!(
            document = %document_path.display(),
            chunks = chunks.len(),
            "Document split"
        );

        let chunk_refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = embedder.embed_batch(&chunk_refs).await?;

        let index = DocumentIndex::create(index_dir, embedder.dimensions())?;
        let indexed: Vec<(String, Vec<f32>)> = chunks.into_iter().zip(embeddings).collect();
        index.add_chunks(&indexed)?;

        Ok(Self {
            index,
            embedder,
            chat,
            options,
        })
    }

    /// Number of chunks in the underlying index.
    pub fn chunk_count(&self) -> Result<usize> {
        Ok(self.index.len()?)
    }

    /// Answer a question, streaming the generated text into `sink`.
    ///
    /// `on_complete` fires after the final fragment. On error the sink is
    /// left without a completion call and the caller decides how to surface
    /// the failure.
    pub async fn answer(&self, question: &str, sink: &mut dyn AnswerSink) -> Result<()> {
        let query_embedding = self.embedder.embed(question).await?;
        let hits = self.index.search(&query_embedding, self.options.top_k)?;

        tracing::debug!(question_chars = question.len(), retrieved = hits.len(), "Context retrieved");

        let context: Vec<String> = hits.into_iter().map(|hit| hit.content).collect();
        let prompt = build_prompt(&context, question, self.options.max_context_chars);

        let mut stream = self
            .chat
            .stream_completion(CompletionRequest::from_user(prompt))
            .await?;

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Token(token) => sink.on_fragment(&token).await,
                StreamEvent::Done => {
                    sink.on_complete().await;
                    return Ok(());
                }
                StreamEvent::Start { .. } => {}
            }
        }

        // Stream ended without an explicit Done
        sink.on_complete().await;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
