//! Streamed answer delivery by message editing.
//!
//! Chat platforms have no append API, so a streamed answer is surfaced by
//! repeatedly replacing the text of a placeholder message with the text
//! accumulated so far. Editing on every token would hit rate limits, so
//! intermediate edits happen on a fixed fragment cadence and a final edit
//! always delivers the complete answer.

use async_trait::async_trait;

use docsage_rag::AnswerSink;

use crate::transport::SharedTransport;

/// Fragments between intermediate edits.
pub const DEFAULT_EDIT_INTERVAL: usize = 4;

/// [`AnswerSink`] that edits a placeholder message as text accumulates.
///
/// Every `interval`-th fragment triggers an edit with the full accumulated
/// text; `on_complete` always edits once more so the tail that arrived after
/// the last cadence edit is never lost. Edit failures are logged and
/// swallowed: a dropped intermediate edit only delays what the next edit
/// delivers anyway.
pub struct StreamingRelay {
    transport: SharedTransport,
    chat_id: i64,
    message_id: i64,
    interval: usize,
    answer: String,
    fragments_seen: usize,
}

impl StreamingRelay {
    /// Create a relay that edits `message_id` in `chat_id`.
    pub fn new(transport: SharedTransport, chat_id: i64, message_id: i64) -> Self {
        Self {
            transport,
            chat_id,
            message_id,
            interval: DEFAULT_EDIT_INTERVAL,
            answer: String::new(),
            fragments_seen: 0,
        }
    }

    /// Override the edit cadence.
    pub fn with_edit_interval(mut self, interval: usize) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// The full text accumulated so far.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    async fn edit(&self) {
        if let Err(e) = self
            .transport
            .edit_message(self.chat_id, self.message_id, &self.answer)
            .await
        {
            tracing::warn!(
                chat_id = self.chat_id,
                message_id = self.message_id,
                error = %e,
                "Failed to edit streamed answer"
            );
        }
    }
}

#[async_trait]
impl AnswerSink for StreamingRelay {
    async fn on_fragment(&mut self, fragment: &str) {
        self.answer.push_str(fragment);
        self.fragments_seen += 1;

        if self.fragments_seen % self.interval == 0 {
            self.edit().await;
        }
    }

    async fn on_complete(&mut self) {
        // An empty edit is rejected by the platform, so a completion that
        // produced no text resolves the placeholder with a fallback instead
        if self.answer.is_empty() {
            tracing::warn!(
                chat_id = self.chat_id,
                message_id = self.message_id,
                "Completion produced no text"
            );
            self.answer.push_str(crate::messages::EMPTY_ANSWER);
        }
        self.edit().await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use std::sync::Arc;

    async fn run_relay(fragments: &[&str]) -> Vec<String> {
        let transport = Arc::new(MockTransport::new());
        let mut relay = StreamingRelay::new(transport.clone(), 1, 10);

        for fragment in fragments {
            relay.on_fragment(fragment).await;
        }
        relay.on_complete().await;

        transport.edited_texts()
    }

    #[tokio::test]
    async fn test_edits_every_fourth_fragment_plus_final() {
        let edits = run_relay(&["A", "B", "C", "D", "E"]).await;
        assert_eq!(edits, vec!["ABCD", "ABCDE"]);
    }

    #[tokio::test]
    async fn test_short_answer_gets_single_final_edit() {
        let edits = run_relay(&["A", "B"]).await;
        assert_eq!(edits, vec!["AB"]);
    }

    #[tokio::test]
    async fn test_exact_multiple_flushes_again_at_end() {
        // The cadence edit already showed everything; the final edit is
        // still issued and the client side deduplicates it.
        let edits = run_relay(&["A", "B", "C", "D"]).await;
        assert_eq!(edits, vec!["ABCD", "ABCD"]);
    }

    #[tokio::test]
    async fn test_long_answer_cadence() {
        let fragments: Vec<String> = (0..9).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = fragments.iter().map(String::as_str).collect();
        let edits = run_relay(&refs).await;

        assert_eq!(edits, vec!["0123", "01234567", "012345678"]);
    }

    #[tokio::test]
    async fn test_empty_answer_resolves_placeholder() {
        let edits = run_relay(&[]).await;
        assert_eq!(edits, vec![crate::messages::EMPTY_ANSWER]);
    }

    #[tokio::test]
    async fn test_custom_interval() {
        let transport = Arc::new(MockTransport::new());
        let mut relay = StreamingRelay::new(transport.clone(), 1, 10).with_edit_interval(2);

        for fragment in ["a", "b", "c"] {
            relay.on_fragment(fragment).await;
        }
        relay.on_complete().await;

        assert_eq!(transport.edited_texts(), vec!["ab", "abc"]);
        assert_eq!(relay.answer(), "abc");
    }
}
