//! User-facing reply texts.

/// Greeting for `/start`.
pub fn welcome(full_name: &str, max_pages: usize) -> String {
    format!(
        "Hey, {full_name} 👋\n\n📄 Send me any PDF file you want me to analyze!\n\n❗Keep in mind, I'm working only with documents up to {max_pages} pages"
    )
}

/// Reply for a document that failed validation.
pub const INVALID_PDF: &str = "⚠️ This file is not a valid PDF document. I can't work with it 😞";

/// Reply for a document over the page bound.
pub fn too_many_pages(max_pages: usize) -> String {
    format!("⚠️ This document has more than {max_pages} pages. I can't work with it 😞")
}

/// Acknowledgement sent after validation, before ingestion.
pub fn document_valid(page_count: usize) -> String {
    format!(
        "👍 Document is valid (Pages: {page_count})\n\nNow give me some time to read it. I'll notify you when I'm done 😉"
    )
}

/// Confirmation that the document is ingested and questions can begin.
pub fn ready(document_name: &str) -> String {
    format!(
        "🎉 I'm ready to start talking with you about document {document_name}\n\n🔎 You can ask your questions now"
    )
}

/// Reply for any non-PDF attachment.
pub const WRONG_FILE: &str = "😞 I'm working only with PDF documents";

/// Reply for a question asked before any document was uploaded.
pub const NO_DOCUMENT_YET: &str =
    "🤔 I don't know what you are talking about yet. Send me the PDF document you want to talk about.";

/// Placeholder message edited as the answer streams in.
pub const THINKING_PLACEHOLDER: &str = "🕑";

/// Reply when ingestion failed after validation.
pub const UPLOAD_FAILED: &str =
    "⚠️ Something went wrong while reading this document. Please try again 😞";

/// Text the placeholder is edited to when answering failed.
pub const ANSWER_FAILED: &str =
    "⚠️ Something went wrong while answering your question. Please try again.";

/// Text the placeholder is edited to when generation finished without text.
pub const EMPTY_ANSWER: &str = "🤷 I don't have an answer for that one";
