//! Retrieval-augmented question answering over a single document.
//!
//! A [`RetrievalPipeline`] is built once per ingested document: the text is
//! extracted, chunked, embedded and stored in a per-document vector index.
//! Questions are then answered by retrieving the closest chunks, stuffing
//! them into a grounded prompt and streaming the completion into an
//! [`AnswerSink`].

mod error;
mod pipeline;
mod prompt;
mod sink;

pub use error::{RagError, Result};
pub use pipeline::{PipelineOptions, RetrievalPipeline};
pub use prompt::{DEFAULT_MAX_CONTEXT_CHARS, build_prompt};
pub use sink::{AnswerSink, CollectingSink};
