//! Undo/redo history — snapshot frames grouped into transactions.
//!
//! Each [`UndoFrame`] holds the whole buffer (and cursor) as it was before
//! and after one logically atomic edit. Rope clones share structure, so a
//! snapshot costs a few pointer bumps rather than a copy of the text.
//!
//! A transaction is the atomic unit of undo/redo:
//!
//! - **Command mode**: each command (`x`, `dw`, `p`) is one transaction.
//! - **Insert mode**: everything from entering Insert (including the delete
//!   done by `c`) until Escape.
//! - **Emacs**: each command, with runs of self-inserted chars grouped.
//!
//! # Usage
//!
//! ```text
//! undo.begin(&buffer, cursor);   // no-op if a transaction is already open
//! // mutate the buffer any number of times
//! undo.commit(&buffer, cursor);  // frame pushed only if the text changed
//! ```
//!
//! New frames clear the redo stack. When more than `limit` frames are kept,
//! the oldest is dropped.

use std::collections::VecDeque;

use ropey::Rope;

use crate::buffer::TextBuffer;

/// Default number of undo frames kept.
pub const DEFAULT_UNDO_LEVELS: usize = 1000;

// ---------------------------------------------------------------------------
// UndoFrame
// ---------------------------------------------------------------------------

/// Buffer contents plus cursor at one instant.
#[derive(Debug, Clone)]
struct Snapshot {
    rope: Rope,
    cursor: usize,
}

impl Snapshot {
    fn take(buf: &TextBuffer, cursor: usize) -> Self {
        Self {
            rope: buf.rope().clone(),
            cursor,
        }
    }
}

/// One undoable step.
#[derive(Debug, Clone)]
pub struct UndoFrame {
    before: Snapshot,
    after: Snapshot,
}

// ---------------------------------------------------------------------------
// UndoStack
// ---------------------------------------------------------------------------

/// Undo and redo stacks plus at most one open transaction.
#[derive(Debug)]
pub struct UndoStack {
    undo: VecDeque<UndoFrame>,
    redo: Vec<UndoFrame>,
    pending: Option<Snapshot>,
    limit: usize,
}

impl UndoStack {
    /// An empty history keeping at most `limit` frames.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            pending: None,
            limit,
        }
    }

    /// Change the frame limit, dropping the oldest frames if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        while self.undo.len() > limit {
            self.undo.pop_front();
        }
    }

    /// Open a transaction, capturing the state before the first edit.
    ///
    /// If one is already open this does nothing: the open transaction just
    /// grows to cover the next edits too.
    pub fn begin(&mut self, buf: &TextBuffer, cursor: usize) {
        if self.pending.is_none() {
            self.pending = Some(Snapshot::take(buf, cursor));
        }
    }

    /// True while a transaction is open.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Close the open transaction. The frame is discarded when the text did
    /// not change. Returns `true` if a frame was pushed.
    pub fn commit(&mut self, buf: &TextBuffer, cursor: usize) -> bool {
        let Some(before) = self.pending.take() else {
            return false;
        };
        if before.rope == *buf.rope() {
            return false;
        }
        self.push(UndoFrame {
            before,
            after: Snapshot::take(buf, cursor),
        });
        true
    }

    /// Close the open transaction and push its frame even if the text is
    /// unchanged. Used for whole-buffer replacement, which must always be
    /// exactly one undo step.
    pub fn commit_always(&mut self, buf: &TextBuffer, cursor: usize) {
        let before = self
            .pending
            .take()
            .unwrap_or_else(|| Snapshot::take(buf, cursor));
        self.push(UndoFrame {
            before,
            after: Snapshot::take(buf, cursor),
        });
    }

    fn push(&mut self, frame: UndoFrame) {
        self.redo.clear();
        if self.limit == 0 {
            return;
        }
        self.undo.push_back(frame);
        if self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Undo the latest frame, restoring the buffer. Commits an open
    /// transaction first so it can be undone. Returns the cursor to
    /// restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, buf: &mut TextBuffer, cursor: usize) -> Option<usize> {
        self.commit(buf, cursor);
        let frame = self.undo.pop_back()?;
        buf.restore(frame.before.rope.clone());
        let restored = frame.before.cursor;
        self.redo.push(frame);
        Some(restored)
    }

    /// Re-apply the most recently undone frame. Returns the cursor to
    /// restore, or `None` if there is nothing to redo.
    pub fn redo(&mut self, buf: &mut TextBuffer) -> Option<usize> {
        let frame = self.redo.pop()?;
        buf.restore(frame.after.rope.clone());
        let restored = frame.after.cursor;
        self.undo.push_back(frame);
        Some(restored)
    }

    /// Forget everything, e.g. when a new line starts.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.pending = None;
    }

    /// Number of frames that can be undone.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of frames that can be redone.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LEVELS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
