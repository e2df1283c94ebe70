//! Error types for the editing core.
//!
//! Every editing command either succeeds or fails *before* it touches the
//! buffer, cursor, register, or undo stack. The dispatchers turn an
//! [`EditError`] into a ding; nothing here is fatal.
//!
//! Boundary clamps are not errors: a motion that would run past the line
//! or buffer stops at the limit silently.

use std::fmt;
use std::io;

use thiserror::Error;

/// What a failed lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `f`/`F`/`t`/`T` for this character.
    Char(char),
    /// A bracket under or after the cursor, or its partner (`%`).
    Bracket,
    /// A text object delimited by this character (`i'`, `a(`, `iw`...).
    TextObject(char),
    /// `;`/`,` with no earlier character search.
    PreviousSearch,
    /// A line above or below the cursor.
    Line,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "character {ch:?}"),
            Self::Bracket => f.write_str("matching bracket"),
            Self::TextObject(ch) => write!(f, "text object {ch:?}"),
            Self::PreviousSearch => f.write_str("previous character search"),
            Self::Line => f.write_str("line"),
        }
    }
}

/// A failed editing command. State is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// A search, bracket match, or text object found nothing.
    #[error("no {0} found")]
    NotFound(Target),

    /// The key after an operator is not a motion (or the motion could not
    /// produce a span).
    #[error("not a motion for a pending operator")]
    InvalidMotionForOperator,

    /// `r` with a count larger than the characters left on the line.
    #[error("only {available} characters left to replace")]
    NotEnoughChars { available: usize },

    /// Nothing on the undo stack.
    #[error("already at oldest change")]
    NothingToUndo,

    /// Nothing on the redo stack.
    #[error("already at newest change")]
    NothingToRedo,

    /// Paste with an empty register.
    #[error("register is empty")]
    EmptyRegister,

    /// A key with no binding in the current mode.
    #[error("no command bound to this key")]
    Unbound,
}

/// Shorthand for editing results.
pub type EditResult<T> = Result<T, EditError>;

/// A rejected option directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// Not a known option name or abbreviation.
    #[error("unknown option: {0}")]
    Unknown(String),

    /// `name=value` with a value the option does not accept.
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    /// `noname` / `name!` on an option that is not boolean.
    #[error("{0} is not a boolean option")]
    NotBoolean(String),
}

/// Failure of the blocking read loop. Only the key source and the
/// renderer can fail; the editing core itself cannot.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Reading keys or drawing failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
