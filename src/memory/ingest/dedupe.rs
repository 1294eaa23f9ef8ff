//! Exact-text deduplication within one import run.

use std::collections::HashSet;

/// Number of leading characters that identify a message body.
pub const DEDUPE_KEY_CHARS: usize = 4000;

/// Dedupe key for `text`: the first [`DEDUPE_KEY_CHARS`] characters, trimmed first.
#[must_use]
pub fn dedupe_key(text: &str) -> &str {
    let text = text.trim();
    match text.char_indices().nth(DEDUPE_KEY_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Run-scoped set of message bodies already seen.
///
/// One instance lives for exactly one import run and is never persisted.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    rejected: usize,
}

impl Deduplicator {
    /// Create an empty deduplicator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `text` and return `true` the first time its key is seen.
    pub fn admit(&mut self, text: &str) -> bool {
        let key = dedupe_key(text);
        if self.seen.contains(key) {
            self.rejected += 1;
            return false;
        }
        self.seen.insert(key.to_string());
        true
    }

    /// Number of distinct keys admitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been admitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Number of duplicates turned away.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_then_reject() {
        let mut dedupe = Deduplicator::new();
        assert!(dedupe.admit("book flights"));
        assert!(!dedupe.admit("book flights"));
        assert!(!dedupe.admit("  book flights\n"));
        assert_eq!(dedupe.len(), 1);
        assert_eq!(dedupe.rejected(), 2);
    }

    #[test]
    fn test_case_differences_are_distinct() {
        let mut dedupe = Deduplicator::new();
        assert!(dedupe.admit("Hello"));
        assert!(dedupe.admit("hello"));
        assert_eq!(dedupe.rejected(), 0);
    }

    #[test]
    fn test_texts_differing_past_key_length_collide() {
        let prefix = "z".repeat(DEDUPE_KEY_CHARS);
        let mut dedupe = Deduplicator::new();
        assert!(dedupe.admit(&format!("{prefix}first tail")));
        assert!(!dedupe.admit(&format!("{prefix}second tail")));
    }

    #[test]
    fn test_texts_differing_inside_key_are_distinct() {
        let prefix = "z".repeat(DEDUPE_KEY_CHARS - 1);
        let mut dedupe = Deduplicator::new();
        assert!(dedupe.admit(&format!("{prefix}a")));
        assert!(dedupe.admit(&format!("{prefix}b")));
    }

    #[test]
    fn test_key_counts_characters() {
        let text = "ü".repeat(DEDUPE_KEY_CHARS + 10);
        assert_eq!(dedupe_key(&text).chars().count(), DEDUPE_KEY_CHARS);
        assert_eq!(dedupe_key("  short "), "short");
    }

    #[test]
    fn test_fresh_instance_is_empty() {
        let dedupe = Deduplicator::new();
        assert!(dedupe.is_empty());
        assert_eq!(dedupe.rejected(), 0);
    }
}
