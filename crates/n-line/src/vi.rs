//! Vi interpreter — modal key dispatch over a [`LineEditor`].
//!
//! # Grammar
//!
//! ```text
//! [count] command
//! [count] operator [count] motion      d3w, 2dw, 2d3w (= 6 words)
//! [count] operator operator            dd, cc, yy
//! operator i|a object                  di', ca(, yiw
//! f|F|t|T char, r char                 the char is an argument, not a key
//! ```
//!
//! `0` is a motion unless a count is already being typed. Counts multiply
//! and saturate at [`MAX_COUNT`].
//!
//! # State between keys
//!
//! An operator waiting for its motion, a command waiting for its char
//! argument, and a half-typed count all live in [`Pending`]. Escape clears
//! it. So does any failed command: on error the buffer, cursor, register,
//! and undo stack are left exactly as they were and the caller gets
//! [`Outcome::Ding`].

use n_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use tracing::{debug, trace};

use crate::editor::LineEditor;
use crate::error::{EditError, EditResult, Target};
use crate::mode::Mode;
use crate::motion::{self, CharSearch, Landing, Motion, MotionContext, MotionKind};
use crate::position::{LineCol, Span};
use crate::register::RegisterKind;
use crate::session::{Direction, Outcome};
use crate::text_object::Object;
use crate::word::{self, WordKind};

/// Counts are capped so `99999999x` cannot spin.
pub const MAX_COUNT: usize = 99_999;

// ---------------------------------------------------------------------------
// Pending state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Delete,
    Change,
    Yank,
}

impl Operator {
    const fn from_key(ch: char) -> Option<Self> {
        match ch {
            'd' => Some(Self::Delete),
            'c' => Some(Self::Change),
            'y' => Some(Self::Yank),
            _ => None,
        }
    }

    const fn key(self) -> char {
        match self {
            Self::Delete => 'd',
            Self::Change => 'c',
            Self::Yank => 'y',
        }
    }
}

/// A command that takes the next key as a literal char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharCommand {
    Find { forward: bool, till: bool },
    Replace,
}

/// Partial command state carried across key reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Pending {
    /// Digits typed so far.
    count: Option<usize>,
    /// Operator and the effective count typed so far.
    operator: Option<(Operator, usize)>,
    char_command: Option<CharCommand>,
    /// Waiting for a text object key; `true` for `i`, `false` for `a`.
    object: Option<bool>,
}

/// What a motion key parses to.
enum Parsed {
    Motion(Motion),
    Find { forward: bool, till: bool },
}

fn parse_motion(key: &KeyEvent) -> Option<Parsed> {
    if let Some(ch) = key.printable() {
        let find = |forward, till| Some(Parsed::Find { forward, till });
        let motion = match ch {
            'h' => Motion::Left,
            'l' | ' ' => Motion::Right,
            '0' => Motion::LineStart,
            '^' => Motion::FirstNonBlank,
            '$' => Motion::LineEnd,
            '|' => Motion::Column,
            'w' => Motion::WordForward(WordKind::Word),
            'W' => Motion::WordForward(WordKind::BigWord),
            'b' => Motion::WordBackward(WordKind::Word),
            'B' => Motion::WordBackward(WordKind::BigWord),
            'e' => Motion::WordEnd(WordKind::Word),
            'E' => Motion::WordEnd(WordKind::BigWord),
            ';' => Motion::RepeatFind { reverse: false },
            ',' => Motion::RepeatFind { reverse: true },
            '%' => Motion::MatchBracket,
            'j' | '+' => Motion::LineDown,
            'k' | '-' => Motion::LineUp,
            'f' => return find(true, false),
            'F' => return find(false, false),
            't' => return find(true, true),
            'T' => return find(false, true),
            _ => return None,
        };
        return Some(Parsed::Motion(motion));
    }
    if !key.modifiers.is_empty() {
        return None;
    }
    let motion = match key.code {
        KeyCode::Left | KeyCode::Backspace => Motion::Left,
        KeyCode::Right => Motion::Right,
        KeyCode::Home => Motion::LineStart,
        KeyCode::End => Motion::LineEnd,
        KeyCode::Down => Motion::LineDown,
        KeyCode::Up => Motion::LineUp,
        _ => return None,
    };
    Some(Parsed::Motion(motion))
}

fn effective_count(before: usize, after: Option<usize>) -> usize {
    before.saturating_mul(after.unwrap_or(1)).min(MAX_COUNT)
}

fn char_arg(key: &KeyEvent) -> Option<char> {
    if key.modifiers.is_empty() {
        match key.code {
            KeyCode::Enter => return Some('\n'),
            KeyCode::Tab => return Some('\t'),
            _ => {}
        }
    }
    key.printable()
}

// ---------------------------------------------------------------------------
// ViInterpreter
// ---------------------------------------------------------------------------

/// Modal (vi) dispatcher. Owns the editor and every piece of state a vi
/// command can remember: pending operator and count, the last char search,
/// and the Replace-mode log used to undo overwrites with Backspace.
#[derive(Debug)]
pub struct ViInterpreter {
    editor: LineEditor,
    pending: Pending,
    last_search: Option<CharSearch>,
    /// One entry per char typed in Replace mode: the char it overwrote, or
    /// `None` if it was appended.
    replace_log: Vec<Option<char>>,
    start_mode: Mode,
}

impl Default for ViInterpreter {
    fn default() -> Self {
        Self::new(LineEditor::new(), true)
    }
}

impl ViInterpreter {
    /// Wrap `editor`. Lines start in Insert mode when `start_insert` is set,
    /// otherwise in Command mode.
    #[must_use]
    pub fn new(mut editor: LineEditor, start_insert: bool) -> Self {
        let start_mode = if start_insert {
            Mode::Insert
        } else {
            Mode::Command
        };
        editor.reset(start_mode);
        Self {
            editor,
            pending: Pending::default(),
            last_search: None,
            replace_log: Vec::new(),
            start_mode,
        }
    }

    #[must_use]
    pub const fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// The editor, for collaborators that use its public seams.
    pub const fn editor_mut(&mut self) -> &mut LineEditor {
        &mut self.editor
    }

    /// True while a command is half typed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending != Pending::default()
    }

    /// Drop the current line and any pending command.
    pub fn reset(&mut self) {
        self.pending = Pending::default();
        self.replace_log.clear();
        self.editor.reset(self.start_mode);
    }

    /// Feed one event.
    pub fn handle(&mut self, event: &Event) -> Outcome {
        let result = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => self.paste_event(text),
        };
        result.unwrap_or_else(|err| {
            debug!(%err, mode = %self.editor.mode(), "ding");
            self.pending = Pending::default();
            Outcome::Ding
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EditResult<Outcome> {
        trace!(?key, mode = %self.editor.mode(), "key");
        if key.is_ctrl('c') {
            return Ok(self.finish(false));
        }
        if key.is_ctrl('l') {
            return Ok(Outcome::ClearScreen);
        }
        match self.editor.mode() {
            Mode::Insert | Mode::Replace => self.input_key(key),
            Mode::Command | Mode::Visual => self.command_key(key),
        }
    }

    /// Hand the line over (`accept`) or throw it away, and start afresh.
    fn finish(&mut self, accept: bool) -> Outcome {
        self.pending = Pending::default();
        self.replace_log.clear();
        let line = self.editor.take_line(self.start_mode);
        if accept {
            Outcome::Accept(line)
        } else {
            Outcome::Abort
        }
    }

    fn end_of_input(&mut self) -> EditResult<Outcome> {
        if !self.editor.buffer().is_empty() {
            return Err(EditError::Unbound);
        }
        self.reset();
        Ok(Outcome::Eof)
    }

    fn take_count(&mut self) -> usize {
        self.pending.count.take().unwrap_or(1)
    }

    fn context(&self, count: usize, for_operator: bool) -> MotionContext<'_> {
        MotionContext {
            buf: self.editor.buffer(),
            cursor: self.editor.cursor(),
            count,
            for_operator,
            last_search: self.last_search,
        }
    }

    // -- Command and Visual modes -------------------------------------------

    fn command_key(&mut self, key: &KeyEvent) -> EditResult<Outcome> {
        if key.code == KeyCode::Escape {
            self.pending = Pending::default();
            if self.editor.mode().is_visual() {
                self.editor.switch_mode(Mode::Command);
            }
            return Ok(Outcome::Continue);
        }

        if let Some(command) = self.pending.char_command.take() {
            return self.char_argument(command, key);
        }
        if let Some(inner) = self.pending.object.take() {
            return self.object_argument(inner, key);
        }

        if let Some(digit) = key.printable().and_then(|ch| ch.to_digit(10)) {
            if digit != 0 || self.pending.count.is_some() {
                let typed = self.pending.count.unwrap_or(0);
                self.pending.count = Some(
                    typed
                        .saturating_mul(10)
                        .saturating_add(digit as usize)
                        .min(MAX_COUNT),
                );
                return Ok(Outcome::Continue);
            }
        }

        if let Some((op, count)) = self.pending.operator.take() {
            return self.operator_argument(op, count, key);
        }

        if key.code == KeyCode::Enter && key.modifiers.is_empty() {
            return Ok(self.finish(true));
        }

        if let Some(parsed) = parse_motion(key) {
            return match parsed {
                Parsed::Motion(motion) => {
                    let count = self.take_count();
                    self.move_by(motion, count)
                }
                Parsed::Find { forward, till } => {
                    self.pending.char_command = Some(CharCommand::Find { forward, till });
                    Ok(Outcome::Continue)
                }
            };
        }

        if self.editor.mode().is_visual() {
            self.visual_key(key)
        } else {
            self.normal_key(key)
        }
    }

    fn normal_key(&mut self, key: &KeyEvent) -> EditResult<Outcome> {
        if key.printable() == Some('r') {
            self.pending.char_command = Some(CharCommand::Replace);
            return Ok(Outcome::Continue);
        }
        if let Some(op) = key.printable().and_then(Operator::from_key) {
            let count = self.take_count();
            self.pending.operator = Some((op, count));
            return Ok(Outcome::Continue);
        }

        let count = self.take_count();
        if key.is_ctrl('r') {
            return self.redo(count);
        }
        if key.is_ctrl('d') {
            return self.end_of_input();
        }
        if key.code == KeyCode::Delete && key.modifiers.is_empty() {
            return self.operate(Operator::Delete, Motion::Right, count);
        }

        let Some(ch) = key.printable() else {
            return Err(EditError::Unbound);
        };
        let buf = self.editor.buffer();
        let cursor = self.editor.cursor();
        let line = buf.line_of(cursor);

        match ch {
            'x' => self.operate(Operator::Delete, Motion::Right, count),
            'X' => self.operate(Operator::Delete, Motion::Left, count),
            'D' => self.operate(Operator::Delete, Motion::LineEnd, count),
            'C' => self.operate(Operator::Change, Motion::LineEnd, count),
            's' => self.operate(Operator::Change, Motion::Right, count),
            'S' => self.whole_lines(Operator::Change, count),
            'Y' => self.whole_lines(Operator::Yank, count),
            '~' => self.toggle_case(count),
            'J' => self.join(count),
            'p' => self.put(true, count),
            'P' => self.put(false, count),
            'u' => self.undo(count),
            'i' => self.enter_input(cursor, Mode::Insert),
            'a' => self.enter_input((cursor + 1).min(buf.line_end(line)), Mode::Insert),
            'I' => self.enter_input(buf.first_non_blank(line), Mode::Insert),
            'A' => self.enter_input(buf.line_end(line), Mode::Insert),
            'o' => {
                let at = buf.line_end(line);
                self.editor.begin_edit();
                self.editor.insert_text(at, "\n");
                self.enter_input(at + 1, Mode::Insert)
            }
            'O' => {
                let at = buf.line_start(line);
                self.editor.begin_edit();
                self.editor.insert_text(at, "\n");
                self.enter_input(at, Mode::Insert)
            }
            'R' => self.enter_input(cursor, Mode::Replace),
            'v' => {
                self.editor.switch_mode(Mode::Visual);
                Ok(Outcome::Continue)
            }
            _ => Err(EditError::Unbound),
        }
    }

    fn visual_key(&mut self, key: &KeyEvent) -> EditResult<Outcome> {
        if key.code == KeyCode::Delete && key.modifiers.is_empty() {
            return self.visual_operate(Operator::Delete);
        }
        self.pending.count = None;
        match key.printable() {
            Some('v') => {
                self.editor.switch_mode(Mode::Command);
                Ok(Outcome::Continue)
            }
            Some(ch @ ('i' | 'a')) => {
                self.pending.object = Some(ch == 'i');
                Ok(Outcome::Continue)
            }
            Some('d' | 'x') => self.visual_operate(Operator::Delete),
            Some('c' | 's') => self.visual_operate(Operator::Change),
            Some('y') => self.visual_operate(Operator::Yank),
            _ => Err(EditError::Unbound),
        }
    }

    /// The key after `d`/`c`/`y`.
    fn operator_argument(&mut self, op: Operator, before: usize, key: &KeyEvent) -> EditResult<Outcome> {
        let count = effective_count(before, self.pending.count.take());

        match key.printable() {
            Some(ch) if ch == op.key() => return self.whole_lines(op, count),
            Some(ch @ ('i' | 'a')) => {
                self.pending.operator = Some((op, count));
                self.pending.object = Some(ch == 'i');
                return Ok(Outcome::Continue);
            }
            _ => {}
        }

        match parse_motion(key) {
            Some(Parsed::Motion(motion)) => self.operate(op, motion, count),
            Some(Parsed::Find { forward, till }) => {
                self.pending.operator = Some((op, count));
                self.pending.char_command = Some(CharCommand::Find { forward, till });
                Ok(Outcome::Continue)
            }
            None => Err(EditError::InvalidMotionForOperator),
        }
    }

    /// The char after `f`/`F`/`t`/`T`/`r`.
    fn char_argument(&mut self, command: CharCommand, key: &KeyEvent) -> EditResult<Outcome> {
        let operator = self.pending.operator.take();
        let count = operator.map_or_else(|| self.take_count(), |(_, count)| count);
        let Some(ch) = char_arg(key) else {
            return Err(if operator.is_some() {
                EditError::InvalidMotionForOperator
            } else {
                EditError::Unbound
            });
        };

        match command {
            CharCommand::Replace => self.replace_chars(ch, count),
            CharCommand::Find { forward, till } => {
                let search = CharSearch { ch, forward, till };
                self.last_search = Some(search);
                let motion = Motion::Find(search);
                match operator {
                    Some((op, _)) => self.operate(op, motion, count),
                    None => self.move_by(motion, count),
                }
            }
        }
    }

    /// The key after `i`/`a` in operator-pending or Visual mode.
    fn object_argument(&mut self, inner: bool, key: &KeyEvent) -> EditResult<Outcome> {
        let operator = self.pending.operator.take();
        let Some(object) = key.printable().and_then(Object::from_key) else {
            return Err(if operator.is_some() {
                EditError::InvalidMotionForOperator
            } else {
                EditError::Unbound
            });
        };
        let motion = Motion::TextObject { object, inner };

        if let Some((op, count)) = operator {
            return self.operate(op, motion, count);
        }
        let landing = motion::resolve(motion, &self.context(1, true))?;
        if let Landing::Span(span) = landing {
            if !span.is_empty() {
                self.editor.set_selection(Some(span));
            }
        }
        Ok(Outcome::Continue)
    }

    // -- Motions ------------------------------------------------------------

    fn move_by(&mut self, motion: Motion, count: usize) -> EditResult<Outcome> {
        match motion {
            Motion::LineDown | Motion::LineUp => {
                let down = motion == Motion::LineDown;
                let line = self.editor.cursor_line();
                let at_edge = if down {
                    line == self.editor.buffer().last_line()
                } else {
                    line == 0
                };
                if !at_edge {
                    self.editor.move_lines(down, count);
                    return Ok(Outcome::Continue);
                }
                if self.editor.mode().is_visual() {
                    return Ok(Outcome::Continue);
                }
                Ok(Outcome::Recall(if down {
                    Direction::Newer
                } else {
                    Direction::Older
                }))
            }
            _ => {
                let landing = motion::resolve(motion, &self.context(count, false))?;
                let overshoot = motion == Motion::Column
                    && motion::column_overshoots(self.editor.buffer(), self.editor.cursor(), count);
                if let Landing::Point { target, .. } = landing {
                    self.editor.move_to(target);
                }
                Ok(if overshoot {
                    Outcome::Ding
                } else {
                    Outcome::Continue
                })
            }
        }
    }

    // -- Operators ----------------------------------------------------------

    fn operate(&mut self, op: Operator, motion: Motion, count: usize) -> EditResult<Outcome> {
        let buf = self.editor.buffer();
        let cursor = self.editor.cursor();

        // `cw` on a non-blank changes to the end of the word, like `ce`.
        let landing = match motion {
            Motion::WordForward(kind)
                if op == Operator::Change
                    && buf.char_at(cursor).is_some_and(|ch| kind.classify(ch).is_token()) =>
            {
                Landing::Point {
                    target: motion::change_word_end(buf, cursor, count, kind),
                    kind: MotionKind::Inclusive,
                }
            }
            _ => motion::resolve(motion, &self.context(count, true))?,
        };

        match landing {
            Landing::Lines { first, last } => self.lines(op, first, last),
            _ => {
                let span = landing.span(self.editor.buffer(), cursor);
                self.apply(op, span)
            }
        }
    }

    /// Run `op` over a char span.
    fn apply(&mut self, op: Operator, span: Span) -> EditResult<Outcome> {
        match op {
            Operator::Yank => {
                let text = self.editor.buffer().slice(span);
                self.editor.store_register(text, RegisterKind::Char);
                self.editor.move_to(span.start);
            }
            Operator::Delete => {
                if span.is_empty() {
                    return Ok(Outcome::Continue);
                }
                self.editor.begin_edit();
                let removed = self.editor.delete_range(span);
                self.editor.store_register(removed, RegisterKind::Char);
                self.editor.move_to(span.start);
                self.editor.commit_edit();
            }
            Operator::Change => {
                self.editor.begin_edit();
                let removed = self.editor.delete_range(span);
                self.editor.store_register(removed, RegisterKind::Char);
                self.editor.switch_mode(Mode::Insert);
                self.editor.move_to(span.start);
                self.replace_log.clear();
            }
        }
        Ok(Outcome::Continue)
    }

    /// `dd`, `cc`, `yy`, `S`, `Y`: `count` lines from the cursor's.
    fn whole_lines(&mut self, op: Operator, count: usize) -> EditResult<Outcome> {
        let first = self.editor.cursor_line();
        let last = first
            .saturating_add(count - 1)
            .min(self.editor.buffer().last_line());
        self.lines(op, first, last)
    }

    /// Run `op` over logical lines `first..=last`.
    fn lines(&mut self, op: Operator, first: usize, last: usize) -> EditResult<Outcome> {
        let buf = self.editor.buffer();
        let content_span = Span::new(buf.line_start(first), buf.line_end(last));
        let content = buf.slice(content_span);

        match op {
            Operator::Yank => {
                let col = buf.line_col(self.editor.cursor()).col;
                let target = if first < self.editor.cursor_line() {
                    buf.offset_of(LineCol::new(first, col))
                } else {
                    self.editor.cursor()
                };
                self.editor.store_register(content, RegisterKind::Line);
                self.editor.move_to(target);
            }
            Operator::Delete => {
                // Take a line break with the lines: the following one if
                // there is a following line, else the preceding one.
                let span = if last < buf.last_line() {
                    Span::new(buf.line_start(first), buf.line_start(last + 1))
                } else if first > 0 {
                    Span::new(buf.line_end(first - 1), buf.line_end(last))
                } else {
                    content_span
                };
                self.editor.begin_edit();
                self.editor.delete_range(span);
                self.editor.store_register(content, RegisterKind::Line);
                let buf = self.editor.buffer();
                let line = first.min(buf.last_line());
                self.editor.move_to(buf.first_non_blank(line));
                self.editor.commit_edit();
            }
            Operator::Change => {
                self.editor.begin_edit();
                self.editor.delete_range(content_span);
                self.editor.store_register(content, RegisterKind::Line);
                self.editor.switch_mode(Mode::Insert);
                self.editor.move_to(content_span.start);
                self.replace_log.clear();
            }
        }
        Ok(Outcome::Continue)
    }

    fn visual_operate(&mut self, op: Operator) -> EditResult<Outcome> {
        let span = self
            .editor
            .selection()
            .unwrap_or_else(|| Span::point(self.editor.cursor()));
        self.editor.switch_mode(Mode::Command);
        self.apply(op, span)
    }

    // -- Simple commands ----------------------------------------------------

    /// `r{c}`: overwrite `count` chars. `r<Enter>` turns them into a single
    /// line break.
    fn replace_chars(&mut self, ch: char, count: usize) -> EditResult<Outcome> {
        let cursor = self.editor.cursor();
        let available = self.editor.buffer().line_end(self.editor.cursor_line()) - cursor;
        if count > available {
            return Err(EditError::NotEnoughChars { available });
        }

        let span = Span::new(cursor, cursor + count);
        self.editor.begin_edit();
        self.editor.delete_range(span);
        if ch == '\n' {
            self.editor.insert_text(cursor, "\n");
            self.editor.move_to(cursor + 1);
        } else {
            let text: String = std::iter::repeat_n(ch, count).collect();
            self.editor.insert_text(cursor, &text);
            self.editor.move_to(cursor + count - 1);
        }
        self.editor.commit_edit();
        Ok(Outcome::Continue)
    }

    /// `~`: toggle the case of `count` chars and move past them.
    fn toggle_case(&mut self, count: usize) -> EditResult<Outcome> {
        let buf = self.editor.buffer();
        let cursor = self.editor.cursor();
        let stop = cursor
            .saturating_add(count)
            .min(buf.line_end(buf.line_of(cursor)));
        if stop == cursor {
            return Ok(Outcome::Continue);
        }

        let mut toggled = String::new();
        for ch in buf.slice(Span::new(cursor, stop)).chars() {
            if ch.is_lowercase() {
                toggled.extend(ch.to_uppercase());
            } else if ch.is_uppercase() {
                toggled.extend(ch.to_lowercase());
            } else {
                toggled.push(ch);
            }
        }

        self.editor.begin_edit();
        self.editor.delete_range(Span::new(cursor, stop));
        let end = self.editor.insert_text(cursor, &toggled);
        self.editor.move_to(end);
        self.editor.commit_edit();
        Ok(Outcome::Continue)
    }

    /// `J`: join the next line onto this one with a single space, dropping
    /// its indent. A count of N joins N lines (at least two).
    fn join(&mut self, count: usize) -> EditResult<Outcome> {
        let line = self.editor.cursor_line();
        if line >= self.editor.buffer().last_line() {
            return Err(EditError::NotFound(Target::Line));
        }

        self.editor.begin_edit();
        let mut at = self.editor.cursor();
        for _ in 0..count.saturating_sub(1).max(1) {
            let buf = self.editor.buffer();
            if line >= buf.last_line() {
                break;
            }
            let start = buf.line_start(line);
            let end = buf.line_end(line);
            let indent_end = buf.first_non_blank(line + 1);
            let next_blank = indent_end == buf.line_end(line + 1);
            let ends_blank = end > start && matches!(buf.char_at(end - 1), Some(' ' | '\t'));
            let separator = if next_blank || ends_blank || end == start {
                ""
            } else {
                " "
            };
            self.editor.delete_range(Span::new(end, indent_end));
            self.editor.insert_text(end, separator);
            at = end;
        }
        self.editor.move_to(at);
        self.editor.commit_edit();
        Ok(Outcome::Continue)
    }

    /// `p` / `P`: paste the register `count` times.
    fn put(&mut self, after: bool, count: usize) -> EditResult<Outcome> {
        let register = self.editor.register();
        if register.is_empty() {
            return Err(EditError::EmptyRegister);
        }
        let content = register.content().to_string();
        let kind = register.kind();

        let cursor = self.editor.cursor();
        let line = self.editor.cursor_line();
        let line_start = self.editor.buffer().line_start(line);
        let line_end = self.editor.buffer().line_end(line);

        self.editor.begin_edit();
        match kind {
            RegisterKind::Char => {
                let at = if after {
                    (cursor + 1).min(line_end)
                } else {
                    cursor
                };
                let end = self.editor.insert_text(at, &content.repeat(count));
                self.editor.move_to(end - 1);
            }
            RegisterKind::Line => {
                let body = content.strip_suffix('\n').unwrap_or(&content);
                let block = vec![body; count].join("\n");
                let target_line = if after {
                    self.editor.insert_text(line_end, &format!("\n{block}"));
                    line + 1
                } else {
                    self.editor.insert_text(line_start, &format!("{block}\n"));
                    line
                };
                let target = self.editor.buffer().first_non_blank(target_line);
                self.editor.move_to(target);
            }
        }
        self.editor.commit_edit();
        Ok(Outcome::Continue)
    }

    fn undo(&mut self, count: usize) -> EditResult<Outcome> {
        for done in 0..count {
            if let Err(err) = self.editor.undo() {
                if done == 0 {
                    return Err(err);
                }
                break;
            }
        }
        Ok(Outcome::Continue)
    }

    fn redo(&mut self, count: usize) -> EditResult<Outcome> {
        for done in 0..count {
            if let Err(err) = self.editor.redo() {
                if done == 0 {
                    return Err(err);
                }
                break;
            }
        }
        Ok(Outcome::Continue)
    }

    // -- Insert and Replace modes -------------------------------------------

    fn enter_input(&mut self, at: usize, mode: Mode) -> EditResult<Outcome> {
        self.editor.begin_edit();
        self.editor.switch_mode(mode);
        self.editor.move_to(at);
        self.replace_log.clear();
        Ok(Outcome::Continue)
    }

    fn leave_input(&mut self) -> EditResult<Outcome> {
        self.editor.commit_edit();
        self.replace_log.clear();
        let cursor = self.editor.cursor();
        let start = self.editor.buffer().line_start(self.editor.cursor_line());
        self.editor.switch_mode(Mode::Command);
        self.editor.move_to(if cursor > start { cursor - 1 } else { cursor });
        Ok(Outcome::Continue)
    }

    fn input_key(&mut self, key: &KeyEvent) -> EditResult<Outcome> {
        if let Some(ch) = key.printable() {
            self.type_char(ch);
            return Ok(Outcome::Continue);
        }
        if key.is_ctrl('w') {
            let cursor = self.editor.cursor();
            let start = word::rubout_start(self.editor.buffer(), cursor, WordKind::Word);
            return Ok(self.erase_back_to(start));
        }
        if key.is_ctrl('u') {
            let start = self.editor.buffer().line_start(self.editor.cursor_line());
            return Ok(self.erase_back_to(start));
        }
        if key.is_ctrl('d') {
            return self.end_of_input();
        }
        if key.code == KeyCode::Enter && key.modifiers == Modifiers::ALT {
            let cursor = self.editor.cursor();
            let end = self.editor.insert_text(cursor, "\n");
            self.editor.move_to(end);
            self.replace_log.clear();
            return Ok(Outcome::Continue);
        }
        if !key.modifiers.is_empty() {
            return Err(EditError::Unbound);
        }

        let buf = self.editor.buffer();
        let cursor = self.editor.cursor();
        let line = buf.line_of(cursor);
        let (start, end) = (buf.line_start(line), buf.line_end(line));

        match key.code {
            KeyCode::Escape => return self.leave_input(),
            KeyCode::Enter => return Ok(self.finish(true)),
            KeyCode::Tab => return Ok(Outcome::Continue),
            KeyCode::Backspace => {
                self.backspace();
                return Ok(Outcome::Continue);
            }
            KeyCode::Delete => {
                self.editor.delete_range(Span::new(cursor, cursor + 1));
                self.editor.move_to(cursor);
                return Ok(Outcome::Continue);
            }
            KeyCode::Up | KeyCode::Down => {
                let down = key.code == KeyCode::Down;
                if (down && line == buf.last_line()) || (!down && line == 0) {
                    return Ok(Outcome::Recall(if down {
                        Direction::Newer
                    } else {
                        Direction::Older
                    }));
                }
                self.editor.move_lines(down, 1);
            }
            KeyCode::Left if cursor > start => self.editor.move_to(cursor - 1),
            KeyCode::Right if cursor < end => self.editor.move_to(cursor + 1),
            KeyCode::Home => self.editor.move_to(start),
            KeyCode::End => self.editor.move_to(end),
            KeyCode::Left | KeyCode::Right => {}
            _ => return Err(EditError::Unbound),
        }
        self.replace_log.clear();
        Ok(Outcome::Continue)
    }

    fn type_char(&mut self, ch: char) {
        let mut utf8 = [0; 4];
        let text = ch.encode_utf8(&mut utf8);
        let cursor = self.editor.cursor();
        let line_end = self.editor.buffer().line_end(self.editor.cursor_line());

        if self.editor.mode() == Mode::Replace {
            let overwritten = (cursor < line_end)
                .then(|| self.editor.delete_range(Span::new(cursor, cursor + 1)))
                .and_then(|old| old.chars().next());
            self.replace_log.push(overwritten);
        }
        let end = self.editor.insert_text(cursor, text);
        self.editor.move_to(end);
    }

    fn backspace(&mut self) {
        let cursor = self.editor.cursor();
        if cursor == 0 {
            return;
        }
        let before = Span::new(cursor - 1, cursor);

        if self.editor.mode() == Mode::Replace {
            match self.replace_log.pop() {
                Some(Some(old)) => {
                    self.editor.delete_range(before);
                    let mut utf8 = [0; 4];
                    self.editor.insert_text(before.start, old.encode_utf8(&mut utf8));
                }
                Some(None) => {
                    self.editor.delete_range(before);
                }
                // Before the entry point: only move.
                None => {
                    let start = self.editor.buffer().line_start(self.editor.cursor_line());
                    if cursor == start {
                        return;
                    }
                }
            }
        } else {
            self.editor.delete_range(before);
        }
        self.editor.move_to(before.start);
    }

    fn erase_back_to(&mut self, start: usize) -> Outcome {
        let cursor = self.editor.cursor();
        self.editor.delete_range(Span::new(start, cursor));
        self.editor.move_to(start);
        self.replace_log.clear();
        Outcome::Continue
    }

    fn paste_event(&mut self, text: &str) -> EditResult<Outcome> {
        if text.is_empty() {
            return Ok(Outcome::Continue);
        }
        self.pending = Pending::default();
        if self.editor.mode().is_visual() {
            self.editor.switch_mode(Mode::Command);
        }
        let cursor = self.editor.cursor();
        let end = self.editor.insert_text(cursor, text);
        if self.editor.mode().is_input() {
            self.editor.move_to(end);
        } else {
            self.editor.move_to(end - 1);
            self.editor.commit_edit();
        }
        Ok(Outcome::Continue)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
