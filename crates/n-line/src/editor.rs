//! LineEditor — the state of one line being edited, and the only way to
//! change it.
//!
//! Both dispatchers (vi and emacs) and outside collaborators (history
//! recall, completion) go through the same small set of operations:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`insert_text`](LineEditor::insert_text) | insert at an offset |
//! | [`delete_range`](LineEditor::delete_range) | remove a span, returning it |
//! | [`move_to`](LineEditor::move_to) | move the cursor (clamped for the mode) |
//! | [`set_selection`](LineEditor::set_selection) | set or clear the Visual selection |
//! | [`undo`](LineEditor::undo) / [`redo`](LineEditor::redo) | walk the undo stack |
//! | [`switch_mode`](LineEditor::switch_mode) | change mode, re-clamping the cursor |
//! | [`replace_contents`](LineEditor::replace_contents) | swap the whole buffer as one undo step |
//!
//! # Transactions
//!
//! Mutations open an undo transaction if none is open. The dispatcher
//! decides when it ends by calling [`commit_edit`](LineEditor::commit_edit):
//! after each Command-mode command, on Escape from Insert, or when an emacs
//! self-insert run is broken.

use tracing::debug;

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;
use crate::error::{EditError, EditResult};
use crate::history::UndoStack;
use crate::mode::Mode;
use crate::position::Span;
use crate::register::{Register, RegisterKind};

/// Buffer, cursor, mode, register, and undo history of one editor.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: TextBuffer,
    cursor: Cursor,
    mode: Mode,
    register: Register,
    undo: UndoStack,
}

impl LineEditor {
    /// An empty editor in Insert mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty editor keeping at most `levels` undo frames.
    #[must_use]
    pub fn with_undo_levels(levels: usize) -> Self {
        Self {
            undo: UndoStack::new(levels),
            ..Self::default()
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The buffer text.
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Cursor offset.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor.offset()
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn register(&self) -> &Register {
        &self.register
    }

    /// The inclusive Visual selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Span> {
        self.cursor.selection(&self.buffer)
    }

    /// Logical line of the cursor.
    #[must_use]
    pub fn cursor_line(&self) -> usize {
        self.buffer.line_of(self.cursor())
    }

    // -- Seams --------------------------------------------------------------

    /// Insert `text` at `offset` (clamped). Returns the offset just past the
    /// inserted text. The cursor is not moved.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> usize {
        self.undo.begin(&self.buffer, self.cursor());
        let at = self.buffer.insert(offset, text);
        at + text.chars().count()
    }

    /// Delete `span` (clamped) and return the removed text. The cursor is
    /// kept inside the buffer but not otherwise moved.
    pub fn delete_range(&mut self, span: Span) -> String {
        if span.clamped(self.buffer.len()).is_empty() {
            return String::new();
        }
        self.undo.begin(&self.buffer, self.cursor());
        let removed = self.buffer.delete(span);
        self.cursor.clamp(&self.buffer, true);
        removed
    }

    /// Move the cursor to `offset`, clamped to the current mode's limit.
    pub fn move_to(&mut self, offset: usize) {
        self.cursor
            .set_offset(offset, &self.buffer, self.mode.cursor_past_end());
    }

    /// Vertical move keeping the sticky column. Returns lines moved.
    pub fn move_lines(&mut self, down: bool, count: usize) -> usize {
        let past_end = self.mode.cursor_past_end();
        if down {
            self.cursor.move_down(count, &self.buffer, past_end)
        } else {
            self.cursor.move_up(count, &self.buffer, past_end)
        }
    }

    /// Select `span` (anchor at its start, cursor on its last char), or
    /// clear the selection with `None`.
    pub fn set_selection(&mut self, span: Option<Span>) {
        match span {
            Some(span) => {
                self.cursor.set_anchor_at(span.start);
                self.cursor
                    .set_offset(span.end.saturating_sub(1).max(span.start), &self.buffer, false);
            }
            None => self.cursor.clear_anchor(),
        }
    }

    /// Undo one step.
    ///
    /// # Errors
    ///
    /// [`EditError::NothingToUndo`] when the history is exhausted.
    pub fn undo(&mut self) -> EditResult<()> {
        let cursor = self.cursor();
        let restored = self
            .undo
            .undo(&mut self.buffer, cursor)
            .ok_or(EditError::NothingToUndo)?;
        self.move_to(restored);
        debug!(cursor = restored, "undo");
        Ok(())
    }

    /// Redo one step.
    ///
    /// # Errors
    ///
    /// [`EditError::NothingToRedo`] when nothing has been undone.
    pub fn redo(&mut self) -> EditResult<()> {
        let restored = self
            .undo
            .redo(&mut self.buffer)
            .ok_or(EditError::NothingToRedo)?;
        self.move_to(restored);
        debug!(cursor = restored, "redo");
        Ok(())
    }

    /// Enter `mode`. Leaving Visual drops the selection, entering it
    /// anchors one at the cursor. The cursor is re-clamped for the new mode.
    pub fn switch_mode(&mut self, mode: Mode) {
        if mode.is_visual() && !self.mode.is_visual() {
            self.cursor.set_anchor();
        } else if !mode.is_visual() {
            self.cursor.clear_anchor();
        }
        self.mode = mode;
        self.cursor.clamp(&self.buffer, mode.cursor_past_end());
    }

    /// Replace the whole buffer with `text` as exactly one undo step, so
    /// that undo returns the line as it was before. Any open transaction is
    /// committed first. The cursor goes to the end.
    pub fn replace_contents(&mut self, text: &str) {
        self.commit_edit();
        self.undo.begin(&self.buffer, self.cursor());
        self.buffer.set_text(text);
        self.move_to(self.buffer.len());
        self.undo.commit_always(&self.buffer, self.cursor());
        debug!(chars = self.buffer.len(), "buffer replaced");
    }

    // -- Transactions -------------------------------------------------------

    /// Open an undo transaction at the current state (no-op if open).
    pub fn begin_edit(&mut self) {
        self.undo.begin(&self.buffer, self.cursor());
    }

    /// Close the open transaction; unchanged text leaves no frame.
    pub fn commit_edit(&mut self) {
        self.undo.commit(&self.buffer, self.cursor());
    }

    /// True while an undo transaction is open.
    #[must_use]
    pub const fn edit_pending(&self) -> bool {
        self.undo.is_pending()
    }

    // -- Register -----------------------------------------------------------

    /// Overwrite the register.
    pub fn store_register(&mut self, text: String, kind: RegisterKind) {
        if !text.is_empty() {
            self.register.store(text, kind);
        }
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Change the undo limit.
    pub fn set_undo_levels(&mut self, levels: usize) {
        self.undo.set_limit(levels);
    }

    /// Hand over the finished line and start a fresh one in `mode`. The
    /// register survives; everything else is cleared.
    pub fn take_line(&mut self, mode: Mode) -> String {
        let text = self.buffer.text();
        self.reset(mode);
        text
    }

    /// Clear the buffer, cursor, selection, and undo history.
    pub fn reset(&mut self, mode: Mode) {
        self.buffer = TextBuffer::new();
        self.cursor = Cursor::new();
        self.undo.clear();
        self.mode = mode;
    }

    /// An editor holding `text` with no undo history.
    #[cfg(test)]
    pub(crate) fn loaded(text: &str, cursor: usize, mode: Mode) -> Self {
        let mut ed = Self::new();
        ed.buffer.set_text(text);
        ed.mode = mode;
        ed.move_to(cursor);
        ed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor_with(text: &str, cursor: usize, mode: Mode) -> LineEditor {
        LineEditor::loaded(text, cursor, mode)
    }

    #[test]
    fn new_editor_is_empty_in_insert() {
        let ed = LineEditor::new();
        assert_eq!(ed.text(), "");
        assert_eq!(ed.cursor(), 0);
        assert_eq!(ed.mode(), Mode::Insert);
        assert!(ed.register().is_empty());
    }

    #[test]
    fn insert_returns_end_offset() {
        let mut ed = LineEditor::new();
        assert_eq!(ed.insert_text(0, "héllo"), 5);
        assert_eq!(ed.insert_text(99, "!"), 6);
        assert_eq!(ed.text(), "héllo!");
    }

    #[test]
    fn move_to_clamps_per_mode() {
        let mut ed = editor_with("abc", 0, Mode::Command);
        ed.move_to(10);
        assert_eq!(ed.cursor(), 2);
        ed.switch_mode(Mode::Insert);
        ed.move_to(10);
        assert_eq!(ed.cursor(), 3);
        ed.switch_mode(Mode::Command);
        assert_eq!(ed.cursor(), 2);
    }

    #[test]
    fn delete_range_returns_text_and_clamps_cursor() {
        let mut ed = editor_with("hello world", 10, Mode::Command);
        assert_eq!(ed.delete_range(Span::new(5, 11)), " world");
        assert_eq!(ed.text(), "hello");
        assert!(ed.cursor() <= 5);
    }

    #[test]
    fn empty_delete_opens_no_transaction() {
        let mut ed = editor_with("abc", 0, Mode::Command);
        assert_eq!(ed.delete_range(Span::point(1)), "");
        assert!(!ed.edit_pending());
    }

    #[test]
    fn undo_and_redo_round_trip() {
        let mut ed = editor_with("abc", 1, Mode::Command);
        ed.delete_range(Span::new(1, 2));
        ed.commit_edit();
        assert_eq!(ed.text(), "ac");
        ed.undo().unwrap();
        assert_eq!(ed.text(), "abc");
        assert_eq!(ed.cursor(), 1);
        ed.redo().unwrap();
        assert_eq!(ed.text(), "ac");
        assert_eq!(ed.redo(), Err(EditError::NothingToRedo));
    }

    #[test]
    fn undo_with_nothing_is_an_error() {
        let mut ed = LineEditor::new();
        assert_eq!(ed.undo(), Err(EditError::NothingToUndo));
    }

    #[test]
    fn replace_contents_is_one_undo_step() {
        let mut ed = editor_with("", 0, Mode::Insert);
        ed.insert_text(0, "ec");
        ed.move_to(2);
        // Typing still in progress when history recall happens.
        ed.replace_contents("echo hello");
        assert_eq!(ed.text(), "echo hello");
        assert_eq!(ed.cursor(), 10);
        ed.undo().unwrap();
        assert_eq!(ed.text(), "ec");
        ed.undo().unwrap();
        assert_eq!(ed.text(), "");
    }

    #[test]
    fn selection_seam() {
        let mut ed = editor_with("abcdef", 0, Mode::Command);
        ed.switch_mode(Mode::Visual);
        ed.set_selection(Some(Span::new(1, 4)));
        assert_eq!(ed.selection(), Some(Span::new(1, 4)));
        assert_eq!(ed.cursor(), 3);
        ed.set_selection(None);
        assert_eq!(ed.selection(), None);
    }

    #[test]
    fn visual_mode_anchors_and_clears() {
        let mut ed = editor_with("abcdef", 2, Mode::Command);
        ed.switch_mode(Mode::Visual);
        assert_eq!(ed.selection(), Some(Span::new(2, 3)));
        ed.move_to(4);
        assert_eq!(ed.selection(), Some(Span::new(2, 5)));
        ed.switch_mode(Mode::Command);
        assert_eq!(ed.selection(), None);
    }

    #[test]
    fn take_line_resets_but_keeps_register() {
        let mut ed = editor_with("ls -la", 0, Mode::Command);
        ed.store_register("ls".into(), RegisterKind::Char);
        assert_eq!(ed.take_line(Mode::Insert), "ls -la");
        assert_eq!(ed.text(), "");
        assert_eq!(ed.cursor(), 0);
        assert_eq!(ed.mode(), Mode::Insert);
        assert_eq!(ed.register().content(), "ls");
        assert_eq!(ed.undo(), Err(EditError::NothingToUndo));
    }

    #[test]
    fn empty_text_does_not_clobber_register() {
        let mut ed = LineEditor::new();
        ed.store_register("keep".into(), RegisterKind::Char);
        ed.store_register(String::new(), RegisterKind::Char);
        assert_eq!(ed.register().content(), "keep");
    }

    #[test]
    fn vertical_moves() {
        let mut ed = editor_with("abc\nde", 2, Mode::Command);
        assert_eq!(ed.move_lines(true, 1), 1);
        assert_eq!(ed.cursor(), 5);
        assert_eq!(ed.move_lines(true, 1), 0);
        assert_eq!(ed.move_lines(false, 3), 1);
        assert_eq!(ed.cursor(), 2);
    }
}
