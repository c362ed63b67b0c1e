//! PDF validation, text extraction and chunk splitting.
//!
//! This crate covers the local half of document ingestion: deciding whether
//! an uploaded file is a usable PDF, pulling its text out, and cutting the
//! text into embedding-sized chunks. Embedding and indexing live in
//! `docsage-rag` / `docsage-index`.

mod error;
mod pdf;
mod splitter;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{IngestError, Result};
pub use pdf::{PdfInfo, extract_text, verify_pdf};
pub use splitter::{DEFAULT_CHUNK_SIZE, split_text};
