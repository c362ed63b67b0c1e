//! Grounded prompt assembly.

/// Default cap on stuffed context, in characters.
///
/// Keeps the stuffed prompt within the completion model's context window
/// even when retrieved chunks are large.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 8192;

const INSTRUCTIONS: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Build the stuffed QA prompt from retrieved context pieces.
///
/// Pieces are included in retrieval order until the character budget is
/// exhausted; a piece that would overflow the budget is dropped whole.
pub fn build_prompt(context: &[String], question: &str, max_context_chars: usize) -> String {
    let mut stuffed = String::new();
    for piece in context {
        if stuffed.len() + piece.len() > max_context_chars {
            break;
        }
        if !stuffed.is_empty() {
            stuffed.push_str("\n\n");
        }
        stuffed.push_str(piece);
    }

    format!("{INSTRUCTIONS}\n{stuffed}\n\nQuestion: {question}\nAnswer: ")
}
