//! Emacs dispatcher — every key maps straight to one action.
//!
//! There is no pending state: no counts, no prefixes. The editor stays in
//! [`Mode::Insert`] for the whole line. Typed characters accumulate in one
//! open undo transaction; any other key commits it first, and then commits
//! its own change, so a run of typing undoes as one step.

use n_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use tracing::{debug, trace};

use crate::buffer::TextBuffer;
use crate::editor::LineEditor;
use crate::error::{EditError, EditResult};
use crate::mode::Mode;
use crate::position::Span;
use crate::register::RegisterKind;
use crate::session::{Direction, Outcome};
use crate::word::{self, WordKind};

/// Flat (emacs) dispatcher over a [`LineEditor`].
#[derive(Debug)]
pub struct EmacsDispatcher {
    editor: LineEditor,
}

impl Default for EmacsDispatcher {
    fn default() -> Self {
        Self::new(LineEditor::new())
    }
}

/// End of the word at or after `offset` (`Alt-F`, `Alt-D`).
fn forward_word_end(buf: &TextBuffer, offset: usize) -> usize {
    let rope = buf.rope();
    let total = buf.len();
    let classify = |i: usize| WordKind::Word.classify(rope.char(i));

    let mut idx = offset;
    while idx < total && !classify(idx).is_token() {
        idx += 1;
    }
    if idx < total {
        let class = classify(idx);
        while idx < total && classify(idx) == class {
            idx += 1;
        }
    }
    idx
}

impl EmacsDispatcher {
    #[must_use]
    pub fn new(mut editor: LineEditor) -> Self {
        editor.reset(Mode::Insert);
        Self { editor }
    }

    #[must_use]
    pub const fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub const fn editor_mut(&mut self) -> &mut LineEditor {
        &mut self.editor
    }

    /// Drop the current line.
    pub fn reset(&mut self) {
        self.editor.reset(Mode::Insert);
    }

    /// Feed one event.
    pub fn handle(&mut self, event: &Event) -> Outcome {
        let result = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                let cursor = self.editor.cursor();
                let end = self.editor.insert_text(cursor, text);
                self.editor.move_to(end);
                Ok(Outcome::Continue)
            }
        };
        result.unwrap_or_else(|err| {
            debug!(%err, "ding");
            Outcome::Ding
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EditResult<Outcome> {
        trace!(?key, "key");
        if let Some(ch) = key.printable() {
            let mut utf8 = [0; 4];
            let cursor = self.editor.cursor();
            let end = self.editor.insert_text(cursor, ch.encode_utf8(&mut utf8));
            self.editor.move_to(end);
            return Ok(Outcome::Continue);
        }

        // Anything but typing closes the current run.
        self.editor.commit_edit();
        let outcome = self.command(key);
        self.editor.commit_edit();
        outcome
    }

    fn command(&mut self, key: &KeyEvent) -> EditResult<Outcome> {
        let buf = self.editor.buffer();
        let cursor = self.editor.cursor();
        let line = buf.line_of(cursor);
        let len = buf.len();

        if key.modifiers == Modifiers::CTRL {
            let KeyCode::Char(ch) = key.code else {
                return Err(EditError::Unbound);
            };
            return match ch {
                'a' => self.goto(buf.line_start(line)),
                'e' => self.goto(buf.line_end(line)),
                'b' => self.goto(cursor.saturating_sub(1)),
                'f' => self.goto((cursor + 1).min(len)),
                'd' if len == 0 => {
                    self.reset();
                    Ok(Outcome::Eof)
                }
                'd' => self.delete(Span::new(cursor, (cursor + 1).min(len))),
                'k' => {
                    let end = buf.line_end(line);
                    // At the end of a line, kill the line break.
                    let end = if end == cursor { (end + 1).min(len) } else { end };
                    self.kill(Span::new(cursor, end))
                }
                'u' => self.kill(Span::new(buf.line_start(line), cursor)),
                'w' => self.kill(Span::new(
                    word::rubout_start(buf, cursor, WordKind::BigWord),
                    cursor,
                )),
                'y' => self.yank(),
                't' => self.transpose(),
                '_' => {
                    self.editor.undo()?;
                    Ok(Outcome::Continue)
                }
                'p' => Ok(self.vertical(false)),
                'n' => Ok(self.vertical(true)),
                'l' => Ok(Outcome::ClearScreen),
                'c' => {
                    self.reset();
                    Ok(Outcome::Abort)
                }
                _ => Err(EditError::Unbound),
            };
        }

        if key.modifiers == Modifiers::ALT {
            return match key.code {
                KeyCode::Char('b') => self.goto(word::prev_word_start(buf, cursor, WordKind::Word)),
                KeyCode::Char('f') => self.goto(forward_word_end(buf, cursor)),
                KeyCode::Char('d') => self.kill(Span::new(cursor, forward_word_end(buf, cursor))),
                KeyCode::Enter => {
                    let end = self.editor.insert_text(cursor, "\n");
                    self.editor.move_to(end);
                    Ok(Outcome::Continue)
                }
                _ => Err(EditError::Unbound),
            };
        }

        if !key.modifiers.is_empty() {
            return Err(EditError::Unbound);
        }

        match key.code {
            KeyCode::Enter => {
                let line = self.editor.take_line(Mode::Insert);
                Ok(Outcome::Accept(line))
            }
            KeyCode::Home => self.goto(buf.line_start(line)),
            KeyCode::End => self.goto(buf.line_end(line)),
            KeyCode::Left => self.goto(cursor.saturating_sub(1)),
            KeyCode::Right => self.goto((cursor + 1).min(len)),
            KeyCode::Up => Ok(self.vertical(false)),
            KeyCode::Down => Ok(self.vertical(true)),
            KeyCode::Backspace => self.delete(Span::new(cursor.saturating_sub(1), cursor)),
            KeyCode::Delete => self.delete(Span::new(cursor, (cursor + 1).min(len))),
            KeyCode::Tab | KeyCode::Escape => Ok(Outcome::Continue),
            _ => Err(EditError::Unbound),
        }
    }

    fn goto(&mut self, offset: usize) -> EditResult<Outcome> {
        self.editor.move_to(offset);
        Ok(Outcome::Continue)
    }

    fn delete(&mut self, span: Span) -> EditResult<Outcome> {
        self.editor.delete_range(span);
        self.editor.move_to(span.start);
        Ok(Outcome::Continue)
    }

    /// Delete `span` into the register.
    fn kill(&mut self, span: Span) -> EditResult<Outcome> {
        let killed = self.editor.delete_range(span);
        self.editor.store_register(killed, RegisterKind::Char);
        self.editor.move_to(span.start);
        Ok(Outcome::Continue)
    }

    fn yank(&mut self) -> EditResult<Outcome> {
        let register = self.editor.register();
        if register.is_empty() {
            return Err(EditError::EmptyRegister);
        }
        let text = register.content().to_string();
        let cursor = self.editor.cursor();
        let end = self.editor.insert_text(cursor, &text);
        self.editor.move_to(end);
        Ok(Outcome::Continue)
    }

    /// Swap the chars around the cursor and step past them. At the end of a
    /// line, swap the last two.
    fn transpose(&mut self) -> EditResult<Outcome> {
        let buf = self.editor.buffer();
        let cursor = self.editor.cursor();
        let span = buf.line_span(buf.line_of(cursor));
        if span.len() < 2 || cursor == span.start {
            return Err(EditError::NotEnoughChars {
                available: span.len(),
            });
        }

        let right = if cursor == span.end { cursor - 1 } else { cursor };
        let pair = Span::new(right - 1, right + 1);
        let swapped: String = buf.slice(pair).chars().rev().collect();
        self.editor.delete_range(pair);
        self.editor.insert_text(pair.start, &swapped);
        self.editor.move_to(pair.end);
        Ok(Outcome::Continue)
    }

    /// Up/Down: move between logical lines, or ask for history at the edge.
    fn vertical(&mut self, down: bool) -> Outcome {
        if self.editor.move_lines(down, 1) > 0 {
            return Outcome::Continue;
        }
        Outcome::Recall(if down {
            Direction::Newer
        } else {
            Direction::Older
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vi::tests::keys;
    use pretty_assertions::assert_eq;

    fn emacs_with(text: &str, cursor: usize) -> EmacsDispatcher {
        let mut emacs = EmacsDispatcher::default();
        emacs.editor = LineEditor::loaded(text, cursor, Mode::Insert);
        emacs
    }

    fn feed(emacs: &mut EmacsDispatcher, notation: &str) -> Outcome {
        let mut last = Outcome::Continue;
        for event in keys(notation) {
            last = emacs.handle(&event);
        }
        last
    }

    fn state(emacs: &EmacsDispatcher) -> (String, usize) {
        (emacs.editor().text(), emacs.editor().cursor())
    }

    #[test]
    fn typing_and_accept() {
        let mut emacs = EmacsDispatcher::default();
        assert_eq!(feed(&mut emacs, "ls -la"), Outcome::Continue);
        assert_eq!(state(&emacs), ("ls -la".to_string(), 6));
        assert_eq!(feed(&mut emacs, "<CR>"), Outcome::Accept("ls -la".to_string()));
        assert_eq!(emacs.editor().text(), "");
        assert_eq!(emacs.editor().mode(), Mode::Insert);
    }

    #[test]
    fn cursor_keys() {
        let mut emacs = emacs_with("echo hello world", 16);
        feed(&mut emacs, "<C-a>");
        assert_eq!(emacs.editor().cursor(), 0);
        feed(&mut emacs, "<C-e>");
        assert_eq!(emacs.editor().cursor(), 16);
        feed(&mut emacs, "<C-b><C-b><Left>");
        assert_eq!(emacs.editor().cursor(), 13);
        feed(&mut emacs, "<C-f><Right>");
        assert_eq!(emacs.editor().cursor(), 15);
        feed(&mut emacs, "<Home>");
        assert_eq!(emacs.editor().cursor(), 0);
        feed(&mut emacs, "<End><C-f>");
        assert_eq!(emacs.editor().cursor(), 16);
    }

    #[test]
    fn word_motions() {
        let mut emacs = emacs_with("git commit -m", 0);
        feed(&mut emacs, "<M-f>");
        assert_eq!(emacs.editor().cursor(), 3);
        feed(&mut emacs, "<M-f>");
        assert_eq!(emacs.editor().cursor(), 10);
        feed(&mut emacs, "<M-b>");
        assert_eq!(emacs.editor().cursor(), 4);
    }

    #[test]
    fn kills_share_the_register() {
        let mut emacs = emacs_with("echo foo bar", 5);
        feed(&mut emacs, "<C-k>");
        assert_eq!(state(&emacs), ("echo ".to_string(), 5));
        assert_eq!(emacs.editor().register().content(), "foo bar");
        feed(&mut emacs, "<C-u>");
        assert_eq!(state(&emacs), (String::new(), 0));
        assert_eq!(emacs.editor().register().content(), "echo ");
        feed(&mut emacs, "<C-y><C-y>");
        assert_eq!(state(&emacs), ("echo echo ".to_string(), 10));
    }

    #[test]
    fn ctrl_k_at_line_end_kills_line_break() {
        let mut emacs = emacs_with("ab\ncd", 2);
        feed(&mut emacs, "<C-k>");
        assert_eq!(state(&emacs), ("abcd".to_string(), 2));
        assert_eq!(emacs.editor().register().content(), "\n");
    }

    #[test]
    fn ctrl_w_kills_a_big_word() {
        let mut emacs = emacs_with("cd ~/src/n-shell", 16);
        feed(&mut emacs, "<C-w>");
        assert_eq!(state(&emacs), ("cd ".to_string(), 3));
        assert_eq!(emacs.editor().register().content(), "~/src/n-shell");
    }

    #[test]
    fn alt_d_kills_next_word() {
        let mut emacs = emacs_with("rm -rf build", 6);
        feed(&mut emacs, "<M-d>");
        assert_eq!(state(&emacs), ("rm -rf".to_string(), 6));
        assert_eq!(emacs.editor().register().content(), " build");
    }

    #[test]
    fn yank_with_empty_register_dings() {
        let mut emacs = EmacsDispatcher::default();
        assert_eq!(feed(&mut emacs, "<C-y>"), Outcome::Ding);
    }

    #[test]
    fn deleting() {
        let mut emacs = emacs_with("abcd", 2);
        feed(&mut emacs, "<BS>");
        assert_eq!(state(&emacs), ("acd".to_string(), 1));
        feed(&mut emacs, "<C-d>");
        assert_eq!(state(&emacs), ("ad".to_string(), 1));
        feed(&mut emacs, "<Del>");
        assert_eq!(state(&emacs), ("a".to_string(), 1));
        assert_eq!(feed(&mut emacs, "<C-d>"), Outcome::Continue);
        assert_eq!(emacs.editor().text(), "a");
    }

    #[test]
    fn ctrl_d_on_empty_line_is_eof() {
        let mut emacs = EmacsDispatcher::default();
        assert_eq!(feed(&mut emacs, "<C-d>"), Outcome::Eof);
    }

    #[test]
    fn typing_run_is_one_undo_step() {
        let mut emacs = EmacsDispatcher::default();
        feed(&mut emacs, "echo<C-a>sudo ");
        assert_eq!(emacs.editor().text(), "sudo echo");
        feed(&mut emacs, "<C-_>");
        assert_eq!(emacs.editor().text(), "echo");
        feed(&mut emacs, "<C-_>");
        assert_eq!(emacs.editor().text(), "");
        assert_eq!(feed(&mut emacs, "<C-_>"), Outcome::Ding);
    }

    #[test]
    fn kill_is_its_own_undo_step() {
        let mut emacs = EmacsDispatcher::default();
        feed(&mut emacs, "make all<C-w>");
        assert_eq!(emacs.editor().text(), "make ");
        feed(&mut emacs, "<C-_>");
        assert_eq!(emacs.editor().text(), "make all");
    }

    #[test]
    fn transpose_chars() {
        let mut emacs = emacs_with("sl", 1);
        feed(&mut emacs, "<C-t>");
        assert_eq!(state(&emacs), ("ls".to_string(), 2));
        feed(&mut emacs, "<C-t>");
        assert_eq!(state(&emacs), ("sl".to_string(), 2));
        let mut emacs = emacs_with("x", 1);
        assert_eq!(feed(&mut emacs, "<C-t>"), Outcome::Ding);
    }

    #[test]
    fn history_keys_request_recall() {
        let mut emacs = EmacsDispatcher::default();
        assert_eq!(feed(&mut emacs, "<C-p>"), Outcome::Recall(Direction::Older));
        assert_eq!(feed(&mut emacs, "<Up>"), Outcome::Recall(Direction::Older));
        assert_eq!(feed(&mut emacs, "<C-n>"), Outcome::Recall(Direction::Newer));
        assert_eq!(feed(&mut emacs, "<Down>"), Outcome::Recall(Direction::Newer));
    }

    #[test]
    fn up_moves_within_multiline_buffer() {
        let mut emacs = EmacsDispatcher::default();
        feed(&mut emacs, "a<M-CR>b");
        assert_eq!(emacs.editor().text(), "a\nb");
        assert_eq!(feed(&mut emacs, "<Up>"), Outcome::Continue);
        assert_eq!(emacs.editor().cursor(), 1);
        assert_eq!(feed(&mut emacs, "<Up>"), Outcome::Recall(Direction::Older));
    }

    #[test]
    fn line_level_keys() {
        let mut emacs = emacs_with("abc", 3);
        assert_eq!(feed(&mut emacs, "<C-l>"), Outcome::ClearScreen);
        assert_eq!(feed(&mut emacs, "<C-c>"), Outcome::Abort);
        assert_eq!(emacs.editor().text(), "");
        assert_eq!(feed(&mut emacs, "<C-g>"), Outcome::Ding);
        assert_eq!(feed(&mut emacs, "<Tab>"), Outcome::Continue);
    }

    #[test]
    fn paste_inserts_verbatim() {
        let mut emacs = EmacsDispatcher::default();
        emacs.handle(&Event::Paste("for x in 1 2\ndo echo $x; done".into()));
        assert_eq!(emacs.editor().text(), "for x in 1 2\ndo echo $x; done");
        assert_eq!(emacs.editor().cursor(), 29);
    }
}
