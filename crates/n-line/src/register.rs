//! Register — the single slot for yanked and deleted text.
//!
//! Every yank (`y`), delete (`d`, `x`, `dd`), change (`c`), and emacs kill
//! (`Ctrl-K`, `Ctrl-U`, `Ctrl-W`, `Alt-D`) overwrites the slot. It never
//! appends. Paste (`p`, `P`, `Ctrl-Y`) reads it.
//!
//! The slot remembers how the text was captured, because paste differs:
//!
//! - **Char-wise**: inserted inline after/before the cursor.
//! - **Line-wise**: inserted as whole lines below/above the cursor line.
//!   Line-wise content always ends with `\n`.
//!
//! The register belongs to one editor and outlives accepted lines, so text
//! deleted while editing one command can be pasted into the next.

/// How the register content was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterKind {
    /// Inline text (`dw`, `x`, Visual selection, emacs kills).
    #[default]
    Char,
    /// Whole logical lines (`dd`, `yy`, `j`/`k` motions).
    Line,
}

/// The single register slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    content: String,
    kind: RegisterKind,
}

impl Register {
    /// An empty register.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
            kind: RegisterKind::Char,
        }
    }

    /// Replace the content. Line-wise text gets a trailing `\n` if missing.
    pub fn store(&mut self, mut text: String, kind: RegisterKind) {
        if kind == RegisterKind::Line && !text.ends_with('\n') {
            text.push('\n');
        }
        self.content = text;
        self.kind = kind;
    }

    /// The stored text; empty if nothing has been stored.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// How the text was captured.
    #[must_use]
    pub const fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// True if there is nothing to paste.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
