//! Editing modes.
//!
//! The vi interpreter is always in exactly one [`Mode`]. The emacs
//! dispatcher stays in [`Mode::Insert`] for the whole line.
//!
//! | Mode      | Cursor shape | Cursor limit                 | Purpose              |
//! |-----------|--------------|------------------------------|----------------------|
//! | Insert    | Bar          | `line_start..=line_end`      | Typing text          |
//! | Command   | Block        | `line_start..=line_end - 1`  | Motions, operators   |
//! | Replace   | Underline    | `line_start..=line_end`      | Overwriting text     |
//! | Visual    | Block        | `line_start..=line_end - 1`  | Selecting text       |

use std::fmt;

/// The current editing mode. Pure data; key handling lives in the
/// dispatchers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Text entry. A shell line starts here.
    #[default]
    Insert,
    /// Keys are commands, not text.
    Command,
    /// `R`: continuous overwrite until Escape.
    Replace,
    /// `v`: char-wise selection; motions extend it.
    Visual,
}

impl Mode {
    /// Short name for a mode indicator.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
            Self::Replace => "REPLACE",
            Self::Visual => "VISUAL",
        }
    }

    /// The terminal cursor shape for this mode.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Command | Self::Visual => CursorShape::SteadyBlock,
            Self::Insert => CursorShape::SteadyBar,
            Self::Replace => CursorShape::SteadyUnderline,
        }
    }

    /// True if the cursor may sit one past the last char of a line.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }

    /// True if printable keys produce text.
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }

    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// CursorShape
// ---------------------------------------------------------------------------

/// Cursor shape for display. The renderer maps it onto
/// `n_term::ansi::CursorShape`; the core only names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    SteadyBlock,
    SteadyBar,
    SteadyUnderline,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
