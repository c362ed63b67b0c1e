//! Character-based chunk splitting.
//!
//! Documents are split into fixed-size character chunks before embedding.
//! Paragraph boundaries (blank lines) are preferred split points; paragraphs
//! larger than the chunk size are split hard at character boundaries.

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Split `text` into chunks of at most `chunk_size` characters.
///
/// Whitespace-only paragraphs are dropped. Chunk boundaries never fall inside
/// a multi-byte character.
pub fn split_text(text: &str, chunk_size: usize) -> Vec<String> {
    assert!(chunk_size > 0, "chunk_size must be positive");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for piece in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let piece_chars = piece.chars().count();

        if piece_chars > chunk_size {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            hard_split(piece, chunk_size, &mut chunks);
            continue;
        }

        // Two chars for the rejoined paragraph separator
        let sep = if current.is_empty() { 0 } else { 2 };
        if current_chars + sep + piece_chars > chunk_size {
            chunks.push(std::mem::take(&mut current));
            current.push_str(piece);
            current_chars = piece_chars;
        } else {
            if sep > 0 {
                current.push_str("\n\n");
            }
            current.push_str(piece);
            current_chars += sep + piece_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn hard_split(piece: &str, chunk_size: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut count = 0usize;

    for ch in piece.chars() {
        current.push(ch);
        count += 1;
        if count == chunk_size {
            out.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(split_text("", 100).is_empty());
        assert!(split_text("  \n\n  \n\n", 100).is_empty());
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = split_text("hello world", 100);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_paragraphs_packed_together() {
        let chunks = split_text("one\n\ntwo\n\nthree", 100);
        assert_eq!(chunks, vec!["one\n\ntwo\n\nthree"]);
    }

    #[test]
    fn test_paragraphs_split_when_full() {
        // Each paragraph is 6 chars; 6 + 2 + 6 = 14 > 10 forces a new chunk
        let chunks = split_text("aaaaaa\n\nbbbbbb\n\ncccccc", 10);
        assert_eq!(chunks, vec!["aaaaaa", "bbbbbb", "cccccc"]);
    }

    #[test]
    fn test_oversized_paragraph_hard_split() {
        let text = "x".repeat(25);
        let chunks = split_text(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[1].len(), 10);
        assert_eq!(chunks[2].len(), 5);
    }

    #[test]
    fn test_multibyte_boundary_safety() {
        let text = "é".repeat(15);
        let chunks = split_text(&text, 10);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 10);
        assert_eq!(chunks[1].chars().count(), 5);
    }

    #[test]
    fn test_all_content_preserved() {
        let text = "alpha\n\nbeta\n\ngamma\n\ndelta";
        let chunks = split_text(text, 12);
        let rejoined: String = chunks.join("\n\n");
        assert_eq!(rejoined.replace("\n\n", " "), "alpha beta gamma delta");
    }
}
