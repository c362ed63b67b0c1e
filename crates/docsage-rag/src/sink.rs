//! Incremental answer delivery seam.
//!
//! The pipeline pushes generated text into an [`AnswerSink`] instead of
//! talking to the chat transport directly. This keeps throttling policy
//! (how often to surface partial answers) out of the generation code.

use async_trait::async_trait;

/// Consumer of incrementally generated answer text.
///
/// Fragments arrive strictly in producer order from a single task;
/// `on_complete` is called exactly once after the final fragment. Sinks own
/// their delivery failures — a sink that cannot surface a fragment should
/// log and carry on rather than abort generation.
#[async_trait]
pub trait AnswerSink: Send {
    /// Receive one fragment of answer text.
    async fn on_fragment(&mut self, fragment: &str);

    /// The producer finished; flush anything still buffered.
    async fn on_complete(&mut self);
}

/// Sink that buffers everything in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// All fragments in arrival order.
    pub fragments: Vec<String>,
    /// Whether `on_complete` has been observed.
    pub completed: bool,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenation of all received fragments.
    pub fn text(&self) -> String {
        self.fragments.concat()
    }
}

#[async_trait]
impl AnswerSink for CollectingSink {
    async fn on_fragment(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_string());
    }

    async fn on_complete(&mut self) {
        self.completed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collecting_sink() {
        let mut sink = CollectingSink::new();
        sink.on_fragment("Hel").await;
        sink.on_fragment("lo").await;
        assert_eq!(sink.text(), "Hello");
        assert!(!sink.completed);

        sink.on_complete().await;
        assert!(sink.completed);
    }
}
