//! Session — the blocking read-one-line loop.
//!
//! ```text
//! KeySource ──event──▶ Dispatcher (vi | emacs) ──Outcome──▶ Session
//!                                                            │
//!                      HistorySource ◀──recall───────────────┤
//!                      Renderer      ◀──LineState / ding ────┘
//! ```
//!
//! One key is read, fed to the dispatcher, and fully handled before the
//! next is read. The renderer sees the line after every key.

use std::io;

use n_term::input::Event;
use n_term::reader::{ByteSource, KeyReader};
use tracing::debug;

use crate::editor::LineEditor;
use crate::emacs::EmacsDispatcher;
use crate::error::{OptionError, ReadError};
use crate::options::{BellStyle, EditMode, Options};
use crate::render::{LineState, Renderer};
use crate::vi::ViInterpreter;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Which way to walk history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Older,
    Newer,
}

/// What a dispatcher tells the session after one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading.
    Continue,
    /// The key failed; nothing changed.
    Ding,
    /// The line is done.
    Accept(String),
    /// Ctrl-C: the line is thrown away.
    Abort,
    /// Ctrl-D on an empty line.
    Eof,
    /// Replace the line with a history entry.
    Recall(Direction),
    /// Ctrl-L.
    ClearScreen,
}

/// How [`Session::read_line`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
}

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Blocking source of key events. `None` means the input is closed.
pub trait KeySource {
    /// # Errors
    ///
    /// Any error reading the underlying input.
    fn next_event(&mut self) -> io::Result<Option<Event>>;
}

impl<S: ByteSource> KeySource for KeyReader<S> {
    fn next_event(&mut self) -> io::Result<Option<Event>> {
        Self::next_event(self)
    }
}

/// Where recalled lines come from. The core never stores history itself.
pub trait HistorySource {
    /// The entry one step in `direction`, given the line being edited.
    /// `None` when there is nothing further that way.
    fn recall(&mut self, direction: Direction, current: &str) -> Option<String>;

    /// A new line is starting; forget any walk in progress.
    fn begin_line(&mut self) {}

    /// A line was accepted.
    fn add(&mut self, _line: &str) {}
}

/// No history at all.
impl HistorySource for () {
    fn recall(&mut self, _direction: Direction, _current: &str) -> Option<String> {
        None
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// The key dispatcher a session runs: modal or flat.
#[derive(Debug)]
pub enum Dispatcher {
    Vi(ViInterpreter),
    Emacs(EmacsDispatcher),
}

impl Dispatcher {
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let editor = LineEditor::with_undo_levels(options.undo_levels);
        match options.edit_mode {
            EditMode::Vi => Self::Vi(ViInterpreter::new(editor, options.start_insert)),
            EditMode::Emacs => Self::Emacs(EmacsDispatcher::new(editor)),
        }
    }

    pub fn handle(&mut self, event: &Event) -> Outcome {
        match self {
            Self::Vi(vi) => vi.handle(event),
            Self::Emacs(emacs) => emacs.handle(event),
        }
    }

    #[must_use]
    pub const fn editor(&self) -> &LineEditor {
        match self {
            Self::Vi(vi) => vi.editor(),
            Self::Emacs(emacs) => emacs.editor(),
        }
    }

    pub const fn editor_mut(&mut self) -> &mut LineEditor {
        match self {
            Self::Vi(vi) => vi.editor_mut(),
            Self::Emacs(emacs) => emacs.editor_mut(),
        }
    }

    /// Start a fresh line. The register survives.
    pub fn reset(&mut self) {
        match self {
            Self::Vi(vi) => vi.reset(),
            Self::Emacs(emacs) => emacs.reset(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Reads lines from `K`, drawing through `R`, recalling from `H`.
#[derive(Debug)]
pub struct Session<K, H, R> {
    keys: K,
    history: H,
    renderer: R,
    dispatcher: Dispatcher,
    options: Options,
}

impl<K: KeySource, H: HistorySource, R: Renderer> Session<K, H, R> {
    pub fn new(keys: K, history: H, renderer: R, options: Options) -> Self {
        Self {
            keys,
            history,
            renderer,
            dispatcher: Dispatcher::from_options(&options),
            options,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub const fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Apply `:set`-style directives. Changing the edit mode or the
    /// starting mode swaps in a new dispatcher.
    ///
    /// # Errors
    ///
    /// The first rejected directive; earlier ones stay applied.
    pub fn set(&mut self, directives: &str) -> Result<Vec<String>, OptionError> {
        let before = self.options.clone();
        let result = self.options.apply_all(directives);
        if self.options.edit_mode != before.edit_mode
            || self.options.start_insert != before.start_insert
        {
            self.dispatcher = Dispatcher::from_options(&self.options);
        } else if self.options.undo_levels != before.undo_levels {
            self.dispatcher
                .editor_mut()
                .set_undo_levels(self.options.undo_levels);
        }
        result
    }

    /// Edit one line until it is accepted, aborted, or input ends.
    ///
    /// # Errors
    ///
    /// [`ReadError::Io`] if reading keys or drawing fails.
    pub fn read_line(&mut self) -> Result<ReadOutcome, ReadError> {
        self.dispatcher.reset();
        self.history.begin_line();
        self.draw()?;

        loop {
            let Some(event) = self.keys.next_event()? else {
                debug!("key source closed");
                self.dispatcher.reset();
                self.renderer.finish()?;
                return Ok(ReadOutcome::Eof);
            };

            let finished = match self.dispatcher.handle(&event) {
                Outcome::Continue => None,
                Outcome::Ding => {
                    self.ding()?;
                    None
                }
                Outcome::ClearScreen => {
                    self.renderer.clear_screen()?;
                    None
                }
                Outcome::Recall(direction) => {
                    self.recall(direction)?;
                    None
                }
                Outcome::Accept(line) => {
                    self.history.add(&line);
                    Some(ReadOutcome::Line(line))
                }
                Outcome::Abort => Some(ReadOutcome::Interrupted),
                Outcome::Eof => Some(ReadOutcome::Eof),
            };

            if let Some(outcome) = finished {
                self.renderer.finish()?;
                return Ok(outcome);
            }
            self.draw()?;
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let state = LineState::of(self.dispatcher.editor());
        self.renderer.render(&state)
    }

    fn ding(&mut self) -> io::Result<()> {
        if self.options.bell == BellStyle::None {
            return Ok(());
        }
        self.renderer.ding(self.options.bell)
    }

    fn recall(&mut self, direction: Direction) -> io::Result<()> {
        let current = self.dispatcher.editor().text();
        match self.history.recall(direction, &current) {
            Some(entry) => {
                debug!(?direction, chars = entry.chars().count(), "recall");
                self.dispatcher.editor_mut().replace_contents(&entry);
                Ok(())
            }
            None => self.ding(),
        }
    }
}
