// SPDX-License-Identifier: MIT
//
// Inline terminal renderer.
//
// Draws the prompt and the line being edited below whatever the shell
// printed last, without taking over the screen. Every redraw goes back to
// the first row of the previous drawing, clears to the bottom, and paints
// the whole line again; the line is short, so there is no diffing.
//
// Continuation lines are indented to the prompt's width. Soft wrapping of
// rows wider than the terminal is not accounted for.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use n_line::mode::{self, Mode};
use n_line::position::Span;
use n_line::render::{self, LineState};
use n_line::{BellStyle, Renderer};
use n_term::ansi::{self, CursorShape};

const FLASH: Duration = Duration::from_millis(60);

fn cursor_shape(mode: Mode) -> CursorShape {
    match mode.cursor_shape() {
        mode::CursorShape::SteadyBlock => CursorShape::SteadyBlock,
        mode::CursorShape::SteadyBar => CursorShape::SteadyBar,
        mode::CursorShape::SteadyUnderline => CursorShape::SteadyUnderline,
    }
}

fn cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Renders to `W` (stdout in the shell, a `Vec<u8>` in tests).
#[derive(Debug)]
pub struct TermRenderer<W: Write> {
    out: W,
    prompt: String,
    prompt_width: usize,
    /// Rows in the last drawing.
    rows: usize,
    /// Row of the last drawing the terminal cursor was left on.
    cursor_row: usize,
}

impl<W: Write> TermRenderer<W> {
    pub fn new(out: W, prompt: &str) -> Self {
        Self {
            out,
            prompt: prompt.to_string(),
            prompt_width: render::display_width(prompt),
            rows: 1,
            cursor_row: 0,
        }
    }

    /// Print `text` on its own lines below the prompt. Raw mode needs
    /// explicit carriage returns.
    pub fn println(&mut self, text: &str) -> io::Result<()> {
        for line in text.split('\n') {
            write!(self.out, "{line}\r\n")?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }

    /// Paint one logical line, reversing the part inside `selection`.
    fn paint(&mut self, state: &LineState<'_>, line: usize) -> io::Result<()> {
        let span = state.buffer.line_span(line);
        let Some(selection) = state
            .selection
            .filter(|s| s.start <= span.end && s.end > span.start)
        else {
            return write!(self.out, "{}", state.buffer.slice(span));
        };

        let lo = selection.start.clamp(span.start, span.end);
        let hi = selection.end.clamp(span.start, span.end);
        write!(self.out, "{}", state.buffer.slice(Span::new(span.start, lo)))?;
        ansi::reverse_on(&mut self.out)?;
        let selected = state.buffer.slice(Span::new(lo, hi));
        // An empty line inside a selection still shows one cell.
        write!(self.out, "{}", if selected.is_empty() { " " } else { selected.as_str() })?;
        ansi::reverse_off(&mut self.out)?;
        write!(self.out, "{}", state.buffer.slice(Span::new(hi, span.end)))
    }
}

impl<W: Write> Renderer for TermRenderer<W> {
    fn render(&mut self, state: &LineState<'_>) -> io::Result<()> {
        ansi::cursor_hide(&mut self.out)?;
        ansi::cursor_up(&mut self.out, cells(self.cursor_row))?;
        ansi::cursor_column(&mut self.out, 0)?;
        ansi::clear_below(&mut self.out)?;

        let lines = state.buffer.line_count();
        for line in 0..lines {
            if line == 0 {
                write!(self.out, "{}", self.prompt)?;
            } else {
                write!(self.out, "\r\n{:width$}", "", width = self.prompt_width)?;
            }
            self.paint(state, line)?;
        }

        let cell = state.cursor_cell();
        ansi::cursor_up(&mut self.out, cells(lines - 1 - cell.line))?;
        ansi::cursor_column(&mut self.out, cells(self.prompt_width + cell.col))?;
        ansi::set_cursor_shape(&mut self.out, cursor_shape(state.mode))?;
        ansi::cursor_show(&mut self.out)?;
        self.rows = lines;
        self.cursor_row = cell.line;
        self.out.flush()
    }

    fn ding(&mut self, style: BellStyle) -> io::Result<()> {
        match style {
            BellStyle::Audible => ansi::bell(&mut self.out)?,
            BellStyle::Visible => {
                ansi::flash_begin(&mut self.out)?;
                self.out.flush()?;
                thread::sleep(FLASH);
                ansi::flash_end(&mut self.out)?;
            }
            BellStyle::None => {}
        }
        self.out.flush()
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        ansi::clear_screen(&mut self.out)?;
        self.rows = 1;
        self.cursor_row = 0;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        ansi::cursor_down(&mut self.out, cells(self.rows - 1 - self.cursor_row))?;
        write!(self.out, "\r\n")?;
        ansi::set_cursor_shape(&mut self.out, CursorShape::Default)?;
        self.rows = 1;
        self.cursor_row = 0;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n_line::LineEditor;
    use pretty_assertions::assert_eq;

    fn text(renderer: &TermRenderer<Vec<u8>>) -> String {
        String::from_utf8_lossy(renderer.output()).into_owned()
    }

    fn editor(line: &str, cursor: usize) -> LineEditor {
        let mut ed = LineEditor::new();
        ed.insert_text(0, line);
        ed.move_to(cursor);
        ed
    }

    #[test]
    fn draws_prompt_line_and_cursor() {
        let mut r = TermRenderer::new(Vec::new(), "$ ");
        r.render(&LineState::of(&editor("ls", 2))).unwrap();
        let out = text(&r);
        assert!(out.starts_with("\x1b[?25l\x1b[1G\x1b[J$ ls"));
        // Column 4, 0-indexed, after "$ ls"; bar cursor in Insert mode.
        assert!(out.ends_with("\x1b[5G\x1b[6 q\x1b[?25h"));
    }

    #[test]
    fn redraw_returns_to_first_row() {
        let mut r = TermRenderer::new(Vec::new(), "> ");
        let ed = editor("a\nb\nc", 0);
        r.render(&LineState::of(&ed)).unwrap();
        assert!(text(&r).contains("a\r\n  b\r\n  c\x1b[2A"));
        let mut ed = ed;
        ed.move_to(4);
        r.render(&LineState::of(&ed)).unwrap();
        // Cursor was left on row 0, so no move up before clearing.
        let second = text(&r).rsplit_once("\x1b[?25l").unwrap().1.to_string();
        assert!(second.starts_with("\x1b[1G\x1b[J"));
        r.render(&LineState::of(&ed)).unwrap();
        let third = text(&r).rsplit_once("\x1b[?25l").unwrap().1.to_string();
        assert!(third.starts_with("\x1b[2A\x1b[1G"));
    }

    #[test]
    fn wide_chars_take_two_cells() {
        let mut r = TermRenderer::new(Vec::new(), "");
        r.render(&LineState::of(&editor("日本", 2))).unwrap();
        assert!(text(&r).contains("\x1b[5G"));
    }

    #[test]
    fn selection_is_reversed() {
        let mut ed = editor("hello", 1);
        ed.switch_mode(Mode::Visual);
        ed.move_to(3);
        let mut r = TermRenderer::new(Vec::new(), "");
        r.render(&LineState::of(&ed)).unwrap();
        assert!(text(&r).contains("h\x1b[7mell\x1b[27mo"));
    }

    #[test]
    fn bells() {
        let mut r = TermRenderer::new(Vec::new(), "");
        r.ding(BellStyle::Audible).unwrap();
        r.ding(BellStyle::None).unwrap();
        assert_eq!(text(&r), "\x07");
        r.ding(BellStyle::Visible).unwrap();
        assert_eq!(text(&r), "\x07\x1b[?5h\x1b[?5l");
    }

    #[test]
    fn finish_moves_below_the_line() {
        let mut r = TermRenderer::new(Vec::new(), "");
        r.render(&LineState::of(&editor("a\nb", 0))).unwrap();
        r.finish().unwrap();
        assert!(text(&r).ends_with("\x1b[1B\r\n\x1b[0 q"));
    }

    #[test]
    fn println_uses_crlf() {
        let mut r = TermRenderer::new(Vec::new(), "");
        r.println("one\ntwo").unwrap();
        assert_eq!(text(&r), "one\r\ntwo\r\n");
    }
}
