//! Discord message size helpers
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Character-based truncation for select menu labels and embed titles
//! - 1.0.0: Line-aware chunking for reminder listings

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;
/// Discord embed title limit
pub const EMBED_TITLE_LIMIT: usize = 256;
/// Select menu option label/description limit
pub const SELECT_TEXT_LIMIT: usize = 100;

/// Split text into chunks of at most `max_chars` characters, breaking at newlines
///
/// A single line longer than the limit is split on character boundaries.
pub fn chunk_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Chunk text for message content
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_lines(text, MESSAGE_LIMIT)
}

/// Truncate to `max_chars` characters, ending with an ellipsis when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(chunk_lines("hello\nworld", 100), vec!["hello\nworld"]);
    }

    #[test]
    fn test_empty_text_single_empty_chunk() {
        assert_eq!(chunk_lines("", 100), vec![""]);
    }

    #[test]
    fn test_breaks_between_lines() {
        let chunks = chunk_lines("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn test_long_line_is_split() {
        let chunks = chunk_lines(&"x".repeat(25), 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn test_message_chunks_respect_limit() {
        let text = "🔔 reminder line\n".repeat(300);
        for chunk in chunk_for_message(&text) {
            assert!(chunk.chars().count() <= MESSAGE_LIMIT);
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        let cut = truncate_chars(&"é".repeat(150), SELECT_TEXT_LIMIT);
        assert_eq!(cut.chars().count(), SELECT_TEXT_LIMIT);
        assert!(cut.ends_with('…'));
    }
}
