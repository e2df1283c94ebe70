//! Renderer contract.
//!
//! After every key the session hands a [`LineState`] to its [`Renderer`].
//! That snapshot is all a renderer sees; it never touches the editor.
//! Layout (wrapping, scrolling, prompt placement) is the renderer's business.
//! The helpers here only translate char offsets into display cells.

use std::io;

use unicode_width::UnicodeWidthChar;

use crate::buffer::TextBuffer;
use crate::editor::LineEditor;
use crate::mode::Mode;
use crate::options::BellStyle;
use crate::position::{LineCol, Span};

/// What the line looks like right now.
#[derive(Debug, Clone, Copy)]
pub struct LineState<'a> {
    pub buffer: &'a TextBuffer,
    pub cursor: usize,
    pub selection: Option<Span>,
    pub mode: Mode,
}

impl<'a> LineState<'a> {
    /// Snapshot `editor`.
    #[must_use]
    pub fn of(editor: &'a LineEditor) -> Self {
        Self {
            buffer: editor.buffer(),
            cursor: editor.cursor(),
            selection: editor.selection(),
            mode: editor.mode(),
        }
    }

    /// The text of each logical line, without its `\n`.
    pub fn lines(&self) -> impl Iterator<Item = String> + 'a {
        let buffer = self.buffer;
        (0..buffer.line_count()).map(move |line| buffer.slice(buffer.line_span(line)))
    }

    /// Logical line and display column of the cursor. Columns count
    /// terminal cells, so wide chars take two.
    #[must_use]
    pub fn cursor_cell(&self) -> LineCol {
        let pos = self.buffer.line_col(self.cursor);
        let start = self.buffer.line_start(pos.line);
        let before = self.buffer.slice(Span::new(start, self.cursor));
        LineCol::new(pos.line, display_width(&before))
    }
}

/// Terminal cells `text` occupies.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Something that can show a line being edited.
pub trait Renderer {
    /// Redraw the line.
    ///
    /// # Errors
    ///
    /// Any error writing to the output.
    fn render(&mut self, state: &LineState<'_>) -> io::Result<()>;

    /// Signal a failed command.
    ///
    /// # Errors
    ///
    /// Any error writing to the output.
    fn ding(&mut self, style: BellStyle) -> io::Result<()>;

    /// Clear the screen before the next redraw.
    ///
    /// # Errors
    ///
    /// Any error writing to the output.
    fn clear_screen(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// The line is over (accepted, aborted, or end of input): leave the
    /// output positioned after it.
    ///
    /// # Errors
    ///
    /// Any error writing to the output.
    fn finish(&mut self) -> io::Result<()>;
}
