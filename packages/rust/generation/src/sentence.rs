//! Character-level text helpers for the accumulation loop.
//!
//! Lengths are counted in `char`s, never bytes, so tails and prefixes never
//! split a UTF-8 sequence.

use std::sync::LazyLock;

use regex::Regex;

/// Longest prefix ending in sentence-terminal punctuation.
static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^.+[.!?]").expect("valid regex"));

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` characters of `text` (all of it when shorter).
pub fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Trim `text` to its last complete sentence.
///
/// Returns `None` when no `.`, `!` or `?` follows at least one character.
pub fn complete_prefix(text: &str) -> Option<&str> {
    SENTENCE_RE.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_shorter_than_text() {
        assert_eq!(tail_chars("hello world", 5), "world");
    }

    #[test]
    fn tail_longer_than_text() {
        assert_eq!(tail_chars("abc", 10), "abc");
        assert_eq!(tail_chars("", 3), "");
    }

    #[test]
    fn tail_respects_multibyte_chars() {
        assert_eq!(tail_chars("naïve café", 4), "café");
        assert_eq!(char_len("café"), 4);
    }

    #[test]
    fn prefix_ends_at_last_terminal() {
        let text = "First one. Second one! Third is cut";
        assert_eq!(complete_prefix(text), Some("First one. Second one!"));
    }

    #[test]
    fn prefix_spans_newlines() {
        let text = "Line one.\nLine two?\ntrailing";
        assert_eq!(complete_prefix(text), Some("Line one.\nLine two?"));
    }

    #[test]
    fn prefix_keeps_text_already_complete() {
        assert_eq!(complete_prefix("All done."), Some("All done."));
    }

    #[test]
    fn no_terminal_punctuation() {
        assert_eq!(complete_prefix("no punctuation at all"), None);
        assert_eq!(complete_prefix(""), None);
    }

    #[test]
    fn lone_terminal_is_not_a_sentence() {
        assert_eq!(complete_prefix("."), None);
        assert_eq!(complete_prefix("!abc"), None);
    }
}
