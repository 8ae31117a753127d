//! Text storage for the reference surface.
//!
//! The `TextBuffer` trait keeps the surface implementation independent of
//! the concrete storage; `EditorRope` is the ropey-backed default. All
//! offsets are in Unicode scalar values (chars), not bytes.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

/// A text buffer supporting efficient random-access editing.
pub trait TextBuffer {
    /// Total length in chars.
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete a char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace a char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if the range is out of bounds.
    ///
    /// SmolStr keeps short slices inline and Arc's longer ones, so handing
    /// slices around stays cheap.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Character at offset. None if out of bounds.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    /// Whole buffer as a String.
    fn to_string(&self) -> String;

    /// Count occurrences of a char inside a range.
    fn count_char(&self, char_range: Range<usize>, needle: char) -> usize;
}

/// Ropey-backed text buffer.
///
/// O(log n) edits and slicing; `Clone` is cheap (structural sharing), which
/// the surface's snapshot history relies on.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Char offset of the start of the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        self.rope.line_to_char(line)
    }

    /// Char offset of the end of the line containing `offset` (the position
    /// of the terminating newline, or end of buffer).
    pub fn line_end(&self, offset: usize) -> usize {
        let len = self.rope.len_chars();
        let offset = offset.min(len);
        let line = self.rope.char_to_line(offset);
        if line + 1 < self.rope.len_lines() {
            // Line ends just before its newline terminator.
            self.rope.line_to_char(line + 1) - 1
        } else {
            len
        }
    }
}

impl TextBuffer for EditorRope {
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
        if char_range.end > self.rope.len_chars() || char_range.start > char_range.end {
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

    fn count_char(&self, char_range: Range<usize>, needle: char) -> usize {
        if char_range.end > self.rope.len_chars() || char_range.start > char_range.end {
            return 0;
        }
        self.rope
            .slice(char_range)
            .chars()
            .filter(|&c| c == needle)
            .count()
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}
