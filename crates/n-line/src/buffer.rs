//! Text buffer — the line being edited.
//!
//! A `TextBuffer` wraps a [`ropey::Rope`] and exposes an offset-based API:
//! every position is an absolute char offset `0..=len`. Logical lines are
//! separated by `\n` only (ropey is built without its CR/Unicode line
//! break features, so its line indexing agrees with this).
//!
//! # Clamping
//!
//! `insert` and `delete` never panic on out-of-range input:
//! offsets are clamped to `[0, len]` first. Callers that care about the
//! effective range get it back from the method.
//!
//! # Line helpers
//!
//! - [`line_start`](TextBuffer::line_start): offset of the first char of a line
//! - [`line_end`](TextBuffer::line_end): offset of the line's `\n` (or `len`
//!   on the last line), i.e. one past the last content char
//! - [`first_non_blank`](TextBuffer::first_non_blank): the `^` target

use std::fmt;

use ropey::Rope;

use crate::position::{LineCol, Span};

/// A rope-backed text buffer addressed by char offsets.
#[derive(Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope. Cloning it is cheap (shared nodes), which is
    /// what makes whole-buffer undo snapshots affordable.
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Total number of chars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer holds no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The char at `offset`, or `None` at or past the end.
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.len()).then(|| self.rope.char(offset))
    }

    /// The text inside `span` (clamped to the buffer).
    #[must_use]
    pub fn slice(&self, span: Span) -> String {
        let span = span.clamped(self.len());
        self.rope.slice(span.start..span.end).to_string()
    }

    /// The whole buffer as a `String`.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Clamp an offset to `[0, len]`.
    #[inline]
    #[must_use]
    pub fn clamp(&self, offset: usize) -> usize {
        offset.min(self.len())
    }

    // -- Lines --------------------------------------------------------------

    /// Number of logical lines. An empty buffer has one (empty) line, and a
    /// trailing `\n` starts a new empty line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line.
    #[inline]
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// The logical line containing `offset` (clamped).
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.rope.char_to_line(self.clamp(offset))
    }

    /// Offset of the first char of `line` (clamped to the last line).
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_char(line.min(self.last_line()))
    }

    /// Offset one past the last content char of `line`: the position of its
    /// `\n`, or `len` for the last line.
    #[must_use]
    pub fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.last_line());
        let start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let total = slice.len_chars();
        if total > 0 && slice.char(total - 1) == '\n' {
            start + total - 1
        } else {
            start + total
        }
    }

    /// Number of content chars on `line` (excluding the `\n`).
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> usize {
        self.line_end(line) - self.line_start(line)
    }

    /// Span covering the content of `line` (excluding the `\n`).
    #[must_use]
    pub fn line_span(&self, line: usize) -> Span {
        Span::new(self.line_start(line), self.line_end(line))
    }

    /// Offset of the first non-blank char on `line`, or the line end if the
    /// line is empty or all blanks.
    #[must_use]
    pub fn first_non_blank(&self, line: usize) -> usize {
        let span = self.line_span(line);
        (span.start..span.end)
            .find(|&i| !matches!(self.rope.char(i), ' ' | '\t'))
            .unwrap_or(span.end)
    }

    /// Convert an offset into a (line, col) pair.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = self.clamp(offset);
        let line = self.rope.char_to_line(offset);
        LineCol::new(line, offset - self.rope.line_to_char(line))
    }

    /// Convert a (line, col) pair into an offset, clamping the line to the
    /// buffer and the column to the line end.
    #[must_use]
    pub fn offset_of(&self, pos: LineCol) -> usize {
        let start = self.line_start(pos.line);
        (start + pos.col).min(self.line_end(pos.line))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `offset` (clamped). Returns the offset actually used.
    pub fn insert(&mut self, offset: usize, text: &str) -> usize {
        let at = self.clamp(offset);
        self.rope.insert(at, text);
        at
    }

    /// Delete `span` (clamped) and return the removed text.
    pub fn delete(&mut self, span: Span) -> String {
        let span = span.clamped(self.len());
        if span.is_empty() {
            return String::new();
        }
        let removed = self.rope.slice(span.start..span.end).to_string();
        self.rope.remove(span.start..span.end);
        removed
    }

    /// Replace the entire contents.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Restore a previously captured rope.
    pub(crate) fn restore(&mut self, rope: Rope) {
        self.rope = rope;
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for TextBuffer {}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Construction / access ----------------------------------------------

    #[test]
    fn empty_buffer_has_one_line() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_end(0), 0);
    }

    #[test]
    fn char_at_and_slice() {
        let buf = TextBuffer::from_text("café\nbar");
        assert_eq!(buf.char_at(3), Some('é'));
        assert_eq!(buf.char_at(7), Some('r'));
        assert_eq!(buf.char_at(8), None);
        assert_eq!(buf.slice(Span::new(2, 7)), "fé\nba");
        assert_eq!(buf.slice(Span::new(5, 100)), "bar");
    }

    // -- Lines --------------------------------------------------------------

    #[test]
    fn line_boundaries() {
        let buf = TextBuffer::from_text("abc\n\ndef");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_end(0), 3);
        assert_eq!(buf.line_start(1), 4);
        assert_eq!(buf.line_end(1), 4);
        assert_eq!(buf.line_start(2), 5);
        assert_eq!(buf.line_end(2), 8);
        assert_eq!(buf.line_content_len(2), 3);
    }

    #[test]
    fn trailing_newline_starts_empty_line() {
        let buf = TextBuffer::from_text("abc\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_start(1), 4);
        assert_eq!(buf.line_end(1), 4);
    }

    #[test]
    fn carriage_return_is_not_a_line_break() {
        let buf = TextBuffer::from_text("a\rb");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_end(0), 3);
    }

    #[test]
    fn line_of_offsets() {
        let buf = TextBuffer::from_text("ab\ncd");
        assert_eq!(buf.line_of(0), 0);
        assert_eq!(buf.line_of(2), 0); // the '\n' belongs to line 0
        assert_eq!(buf.line_of(3), 1);
        assert_eq!(buf.line_of(5), 1);
        assert_eq!(buf.line_of(99), 1);
    }

    #[test]
    fn line_index_clamps() {
        let buf = TextBuffer::from_text("ab\ncd");
        assert_eq!(buf.line_start(9), 3);
        assert_eq!(buf.line_end(9), 5);
    }

    #[test]
    fn first_non_blank() {
        let buf = TextBuffer::from_text("  \tfoo\n   \nbar");
        assert_eq!(buf.first_non_blank(0), 3);
        assert_eq!(buf.first_non_blank(1), 10); // all blank → line end
        assert_eq!(buf.first_non_blank(2), 11);
    }

    #[test]
    fn line_col_round_trip_points() {
        let buf = TextBuffer::from_text("ab\ncde");
        assert_eq!(buf.line_col(4), LineCol::new(1, 1));
        assert_eq!(buf.offset_of(LineCol::new(1, 1)), 4);
        assert_eq!(buf.offset_of(LineCol::new(0, 10)), 2);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_clamps_offset() {
        let mut buf = TextBuffer::from_text("ab");
        assert_eq!(buf.insert(99, "c"), 2);
        assert_eq!(buf.text(), "abc");
        buf.insert(0, "_");
        assert_eq!(buf.text(), "_abc");
    }

    #[test]
    fn delete_returns_removed_text() {
        let mut buf = TextBuffer::from_text("hello world");
        assert_eq!(buf.delete(Span::new(5, 11)), " world");
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn delete_out_of_range_is_clamped() {
        let mut buf = TextBuffer::from_text("abc");
        assert_eq!(buf.delete(Span::new(1, 50)), "bc");
        assert_eq!(buf.delete(Span::new(10, 20)), "");
        assert_eq!(buf.text(), "a");
    }

    #[test]
    fn set_text_and_equality() {
        let mut a = TextBuffer::from_text("one");
        let b = TextBuffer::from_text("two");
        assert_ne!(a, b);
        a.set_text("two");
        assert_eq!(a, b);
    }
}
