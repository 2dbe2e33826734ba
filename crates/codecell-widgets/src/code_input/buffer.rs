#![forbid(unsafe_code)]

//! The code value and its validation.
//!
//! Length is measured in grapheme clusters, so a cell always holds one
//! user-perceived character.

use unicode_segmentation::UnicodeSegmentation;

/// Result of a [`CodeBuffer::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// Length before the submission.
    pub previous_len: usize,
    /// Length after the submission.
    pub len: usize,
    /// The value is exactly `code_length` long.
    pub fulfilled: bool,
}

impl Submission {
    /// A character was added (not removed, not a no-op).
    pub fn grew(&self) -> bool {
        self.len > self.previous_len
    }
}

/// Owns the current code.
///
/// # Invariants
///
/// 1. `len() <= code_length()` at all times.
/// 2. With `numeric_only`, every character is an ASCII digit.
#[derive(Debug, Clone)]
pub struct CodeBuffer {
    value: String,
    code_length: usize,
    numeric_only: bool,
}

impl CodeBuffer {
    /// An empty buffer. `code_length` of zero is treated as one.
    pub fn new(code_length: usize, numeric_only: bool) -> Self {
        Self {
            value: String::new(),
            code_length: code_length.max(1),
            numeric_only,
        }
    }

    /// The current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Length in grapheme clusters.
    pub fn len(&self) -> usize {
        self.value.graphemes(true).count()
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Maximum length.
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Whether every cell is filled.
    pub fn is_full(&self) -> bool {
        self.len() >= self.code_length
    }

    /// Index of the next cell to fill, `None` when full.
    pub fn active_index(&self) -> Option<usize> {
        let len = self.len();
        (len < self.code_length).then_some(len)
    }

    /// Characters of the value, one per filled cell.
    pub fn chars(&self) -> impl Iterator<Item = &str> {
        self.value.graphemes(true)
    }

    /// Apply digit filtering and the length limit to raw surface text.
    pub fn normalize(&self, raw: &str) -> String {
        let filtered: String = if self.numeric_only {
            raw.chars().filter(char::is_ascii_digit).collect()
        } else {
            raw.to_string()
        };
        filtered.graphemes(true).take(self.code_length).collect()
    }

    /// Accept text from the entry surface.
    pub fn submit(&mut self, raw: &str) -> Submission {
        let previous_len = self.len();
        self.value = self.normalize(raw);
        let len = self.len();
        codecell_core::trace!(previous_len, len, "code submitted");
        Submission {
            previous_len,
            len,
            fulfilled: len == self.code_length,
        }
    }

    /// Replace the value without reporting a submission.
    pub fn replace(&mut self, raw: &str) {
        self.value = self.normalize(raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_filter_strips_non_digits() {
        let mut buffer = CodeBuffer::new(4, true);
        buffer.submit("12a3");
        assert_eq!(buffer.value(), "123");
    }

    #[test]
    fn numeric_filter_rejects_non_ascii_digits() {
        let mut buffer = CodeBuffer::new(4, true);
        buffer.submit("١2٣4");
        assert_eq!(buffer.value(), "24");
    }

    #[test]
    fn unrestricted_keeps_letters() {
        let mut buffer = CodeBuffer::new(4, false);
        buffer.submit("a1B2");
        assert_eq!(buffer.value(), "a1B2");
    }

    #[test]
    fn oversized_text_is_truncated() {
        let mut buffer = CodeBuffer::new(4, false);
        let sub = buffer.submit("123456");
        assert_eq!(buffer.value(), "1234");
        assert!(sub.fulfilled);
    }

    #[test]
    fn length_counts_graphemes() {
        let mut buffer = CodeBuffer::new(3, false);
        buffer.submit("e\u{301}x");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.chars().collect::<Vec<_>>(), vec!["e\u{301}", "x"]);
    }

    #[test]
    fn submission_reports_growth() {
        let mut buffer = CodeBuffer::new(4, false);
        assert!(buffer.submit("1").grew());
        assert!(buffer.submit("12").grew());
        assert!(!buffer.submit("12").grew());
        assert!(!buffer.submit("1").grew());
    }

    #[test]
    fn filtered_no_op_does_not_grow() {
        let mut buffer = CodeBuffer::new(4, true);
        buffer.submit("1");
        let sub = buffer.submit("1x");
        assert!(!sub.grew());
        assert_eq!(buffer.value(), "1");
    }

    #[test]
    fn active_index_tracks_length() {
        let mut buffer = CodeBuffer::new(2, false);
        assert_eq!(buffer.active_index(), Some(0));
        buffer.submit("1");
        assert_eq!(buffer.active_index(), Some(1));
        buffer.submit("12");
        assert_eq!(buffer.active_index(), None);
        assert!(buffer.is_full());
    }

    #[test]
    fn fulfilled_only_at_full_length() {
        let mut buffer = CodeBuffer::new(3, false);
        assert!(!buffer.submit("12").fulfilled);
        assert!(buffer.submit("123").fulfilled);
        assert!(!buffer.submit("12").fulfilled);
        assert!(buffer.submit("124").fulfilled);
    }

    #[test]
    fn zero_code_length_is_clamped() {
        let mut buffer = CodeBuffer::new(0, false);
        buffer.submit("99");
        assert_eq!(buffer.code_length(), 1);
        assert_eq!(buffer.value(), "9");
    }
}
