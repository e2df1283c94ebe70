//! # n-line — Line editing core for n-shell
//!
//! Everything between "a key arrived" and "here is the finished line":
//!
//! - **[`position`]** — char offsets, half-open `Span`, `LineCol` for display
//! - **[`buffer`]** — `TextBuffer` over a rope; logical lines split on `\n`
//! - **[`cursor`]** — cursor with sticky column and Visual anchor
//! - **[`word`]** — word/WORD classification and motions
//! - **[`motion`]** — the `Motion` enum and span resolution
//! - **[`text_object`]** — quote, bracket, and word objects
//! - **[`register`]** — the single unnamed register
//! - **[`history`]** — snapshot undo/redo
//! - **[`mode`]** — Insert, Command, Replace, Visual
//! - **[`editor`]** — `LineEditor`, the public editing seams
//! - **[`vi`]** — modal dispatcher: counts, operators, motions
//! - **[`emacs`]** — flat dispatcher: one key, one action
//! - **[`render`]** — the renderer contract
//! - **[`session`]** — the blocking read-one-line loop
//! - **[`options`]** — `:set`-style configuration
//! - **[`error`]** — error types
//!
//! The crate never writes to the terminal. Keys come in through a
//! [`KeySource`], frames go out through a [`Renderer`], and recalled lines
//! through a [`HistorySource`].

pub mod buffer;
pub mod cursor;
pub mod editor;
pub mod emacs;
pub mod error;
pub mod history;
pub mod mode;
pub mod motion;
pub mod options;
pub mod position;
pub mod register;
pub mod render;
pub mod session;
pub mod text_object;
pub mod vi;
pub mod word;

pub use editor::LineEditor;
pub use error::{EditError, OptionError, ReadError};
pub use mode::Mode;
pub use options::{BellStyle, EditMode, Options};
pub use render::{LineState, Renderer};
pub use session::{Direction, HistorySource, KeySource, Outcome, ReadOutcome, Session};
