//! Text buffer abstraction for editor storage.
//!
//! The editor addresses content by char offset (selection spans, cursor),
//! so splicing goes through a rope rather than byte-indexed `String` surgery.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// A text buffer that supports efficient editing and offset conversion.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in bytes (UTF-8).
    fn len_bytes(&self) -> usize;

    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Get character at offset. Returns None if out of bounds.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;
}

/// Ropey-backed text buffer.
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Get a reference to the underlying rope (for advanced operations).
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }

    /// Replace `char_range` with `text`, or return false without touching
    /// the buffer if the range is reversed or runs past the end.
    pub fn try_replace(&mut self, char_range: Range<usize>, text: &str) -> bool {
        if char_range.start > char_range.end || char_range.end > self.rope.len_chars() {
            return false;
        }
        self.replace(char_range, text);
        true
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl TextBuffer for EditorRope {
    fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.rope.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut rope = EditorRope::from_str("hello");
        rope.insert(5, " world");
        assert_eq!(rope.to_string(), "hello world");
        rope.delete(0..6);
        assert_eq!(rope.to_string(), "world");
    }

    #[test]
    fn test_replace_multibyte() {
        let mut rope = EditorRope::from_str("añejo ron");
        rope.replace(0..5, "viejo");
        assert_eq!(rope.to_string(), "viejo ron");
        assert_eq!(rope.len_chars(), 9);
    }

    #[test]
    fn test_try_replace_rejects_bad_ranges() {
        let mut rope = EditorRope::from_str("abc");
        assert!(!rope.try_replace(1..10, "x"));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert!(!rope.try_replace(reversed, "x"));
        assert_eq!(rope.to_string(), "abc");
        assert!(rope.try_replace(1..2, "x"));
        assert_eq!(rope.to_string(), "axc");
    }

    #[test]
    fn test_char_at_bounds() {
        let rope = EditorRope::from_str("ñ");
        assert_eq!(rope.char_at(0), Some('ñ'));
        assert_eq!(rope.char_at(1), None);
    }
}
