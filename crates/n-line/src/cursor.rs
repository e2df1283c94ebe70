//! Cursor — an offset with a sticky column and an optional selection anchor.
//!
//! # Limits
//!
//! Movement methods take a `past_end: bool` rather than a mode, the caller
//! decides:
//!
//! - **Command / Visual**: `past_end = false`. The cursor sits *on* a char,
//!   so its range on a line is `[line_start, max(line_start, line_end - 1)]`.
//! - **Insert / Replace / emacs**: `past_end = true`. The cursor may sit on
//!   the line end, so its range is `[line_start, line_end]`.
//!
//! # Sticky column
//!
//! Vertical moves (`j`/`k` in a multi-line buffer) remember the column they
//! started from, so passing through a short line and back onto a long one
//! restores it. Any other move resets the sticky column.
//!
//! # Selection
//!
//! Visual mode sets an anchor. The selection is *inclusive* of both the
//! anchor and the cursor char, which is what `d`/`c`/`y` act on.

use crate::buffer::TextBuffer;
use crate::position::Span;

/// A cursor in a [`TextBuffer`]. Does not hold the buffer; methods take it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    offset: usize,
    sticky_col: usize,
    anchor: Option<usize>,
}

impl Cursor {
    /// A cursor at offset 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offset: 0,
            sticky_col: 0,
            anchor: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current absolute offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The selection anchor, if Visual mode set one.
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// The inclusive selection between anchor and cursor as a half-open
    /// span: `[min, max + 1)`, clamped to the buffer.
    #[must_use]
    pub fn selection(&self, buf: &TextBuffer) -> Option<Span> {
        self.anchor.map(|anchor| {
            let lo = anchor.min(self.offset);
            let hi = anchor.max(self.offset);
            Span::new(lo, (hi + 1).min(buf.len()))
        })
    }

    // -- Selection control --------------------------------------------------

    /// Anchor a selection at the current offset.
    pub const fn set_anchor(&mut self) {
        self.anchor = Some(self.offset);
    }

    /// Anchor a selection at `offset`.
    pub const fn set_anchor_at(&mut self, offset: usize) {
        self.anchor = Some(offset);
    }

    /// Drop the selection.
    pub const fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    // -- Movement -----------------------------------------------------------

    /// Move to `offset`, clamped to the limit of the line it falls on.
    pub fn set_offset(&mut self, offset: usize, buf: &TextBuffer, past_end: bool) {
        self.offset = clamp(buf, offset, past_end);
        self.sticky_col = buf.line_col(self.offset).col;
    }

    /// Re-clamp after the buffer or the mode changed under the cursor.
    pub fn clamp(&mut self, buf: &TextBuffer, past_end: bool) {
        self.offset = clamp(buf, self.offset, past_end);
    }

    /// Move down `count` logical lines, keeping the sticky column. Stops on
    /// the last line. Returns the number of lines actually moved.
    pub fn move_down(&mut self, count: usize, buf: &TextBuffer, past_end: bool) -> usize {
        let line = buf.line_of(self.offset);
        let target = line.saturating_add(count).min(buf.last_line());
        self.goto_line(target, buf, past_end);
        target - line
    }

    /// Move up `count` logical lines, keeping the sticky column. Stops on
    /// the first line. Returns the number of lines actually moved.
    pub fn move_up(&mut self, count: usize, buf: &TextBuffer, past_end: bool) -> usize {
        let line = buf.line_of(self.offset);
        let target = line.saturating_sub(count);
        self.goto_line(target, buf, past_end);
        line - target
    }

    fn goto_line(&mut self, line: usize, buf: &TextBuffer, past_end: bool) {
        // sticky_col survives: a short line pulls the offset left, not the wish.
        let start = buf.line_start(line);
        self.offset = (start + self.sticky_col).min(max_offset(buf, line, past_end));
    }
}

/// Clamp `offset` to the cursor limit of its logical line.
#[must_use]
pub fn clamp(buf: &TextBuffer, offset: usize, past_end: bool) -> usize {
    let offset = buf.clamp(offset);
    let line = buf.line_of(offset);
    offset.min(max_offset(buf, line, past_end))
}

/// Rightmost offset the cursor may occupy on `line`.
#[must_use]
pub fn max_offset(buf: &TextBuffer, line: usize, past_end: bool) -> usize {
    let start = buf.line_start(line);
    let end = buf.line_end(line);
    if past_end { end } else { end.saturating_sub(1).max(start) }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TextBuffer {
        TextBuffer::from_text("hello world\nhi\n\nlast line here")
    }

    #[test]
    fn new_at_origin() {
        let c = Cursor::new();
        assert_eq!(c.offset(), 0);
        assert_eq!(c.anchor(), None);
        assert_eq!(c, Cursor::default());
    }

    // -- Limits -------------------------------------------------------------

    #[test]
    fn command_limit_stops_on_last_char() {
        let buf = sample();
        assert_eq!(clamp(&buf, 11, false), 10);
        assert_eq!(clamp(&buf, 11, true), 11);
    }

    #[test]
    fn empty_line_limit_is_line_start() {
        let buf = sample();
        // line 2 is empty, starts at 15
        assert_eq!(max_offset(&buf, 2, false), 15);
        assert_eq!(max_offset(&buf, 2, true), 15);
    }

    #[test]
    fn empty_buffer_limit_is_zero() {
        let buf = TextBuffer::new();
        assert_eq!(clamp(&buf, 5, false), 0);
        assert_eq!(clamp(&buf, 5, true), 0);
    }

    #[test]
    fn set_offset_clamps_past_buffer() {
        let buf = TextBuffer::from_text("abc");
        let mut c = Cursor::new();
        c.set_offset(99, &buf, false);
        assert_eq!(c.offset(), 2);
        c.set_offset(99, &buf, true);
        assert_eq!(c.offset(), 3);
    }

    #[test]
    fn reclamp_after_mode_change() {
        let buf = TextBuffer::from_text("abc");
        let mut c = Cursor::new();
        c.set_offset(3, &buf, true);
        c.clamp(&buf, false);
        assert_eq!(c.offset(), 2);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn move_down_keeps_sticky_column() {
        let buf = sample();
        let mut c = Cursor::new();
        c.set_offset(8, &buf, false);
        assert_eq!(c.move_down(1, &buf, false), 1);
        assert_eq!(c.offset(), 13); // "hi" clamps to 'i'
        assert_eq!(c.move_down(1, &buf, false), 1);
        assert_eq!(c.offset(), 15); // empty line
        assert_eq!(c.move_down(1, &buf, false), 1);
        assert_eq!(c.offset(), 16 + 8);
    }

    #[test]
    fn move_down_stops_on_last_line() {
        let buf = sample();
        let mut c = Cursor::new();
        assert_eq!(c.move_down(10, &buf, false), 3);
        assert_eq!(buf.line_of(c.offset()), 3);
        assert_eq!(c.move_down(1, &buf, false), 0);
    }

    #[test]
    fn move_up_stops_on_first_line() {
        let buf = sample();
        let mut c = Cursor::new();
        c.set_offset(13, &buf, false);
        assert_eq!(c.move_up(5, &buf, false), 1);
        assert_eq!(c.offset(), 1);
        assert_eq!(c.move_up(1, &buf, false), 0);
    }

    // -- Selection ----------------------------------------------------------

    #[test]
    fn selection_is_inclusive_and_ordered() {
        let buf = TextBuffer::from_text("abcdef");
        let mut c = Cursor::new();
        c.set_offset(4, &buf, false);
        c.set_anchor();
        c.set_offset(1, &buf, false);
        assert_eq!(c.selection(&buf), Some(Span::new(1, 5)));
    }

    #[test]
    fn single_char_selection() {
        let buf = TextBuffer::from_text("abc");
        let mut c = Cursor::new();
        c.set_offset(2, &buf, false);
        c.set_anchor();
        assert_eq!(c.selection(&buf), Some(Span::new(2, 3)));
        c.clear_anchor();
        assert_eq!(c.selection(&buf), None);
    }

    #[test]
    fn anchor_at_explicit_offset() {
        let buf = TextBuffer::from_text("abc");
        let mut c = Cursor::new();
        c.set_anchor_at(2);
        assert_eq!(c.anchor(), Some(2));
        assert_eq!(c.selection(&buf), Some(Span::new(0, 3)));
    }
}
