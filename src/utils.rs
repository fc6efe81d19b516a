//! src/utils.rs
//! Shared utility functions used across the codebase

/// Truncate `text` to at most `max_chars` characters.
///
/// This is a hard cut on character count, not a word or sentence boundary.
/// Never splits a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
