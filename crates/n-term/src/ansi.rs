// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. The line
// renderer draws inline, below whatever the shell printed before, so this
// module only knows relative cursor movement, erase-in-display, a couple
// of SGR toggles for selections, bracketed paste, the bell, and the cursor
// shape used to show the editing mode.
//
// All functions return `io::Result` propagated from the underlying writer.
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor up `n` rows (CUU). `n == 0` writes nothing, since
/// terminals treat a zero parameter as one.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD). `n == 0` writes nothing.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}B")
}

/// Move the cursor to column `x` of the current row (CHA).
///
/// Our columns are 0-indexed; CHA is 1-indexed.
#[inline]
pub fn cursor_column(w: &mut impl Write, x: u16) -> io::Result<()> {
    write!(w, "\x1b[{}G", x + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Erase ───────────────────────────────────────────────────────────────────

/// Erase from the cursor to the end of the screen (ED 0).
#[inline]
pub fn clear_below(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[J")
}

/// Clear the entire screen and home the cursor (ED 2 + CUP 1;1).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J\x1b[H")
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Turn reverse video on (SGR 7). Used to paint a visual selection.
#[inline]
pub fn reverse_on(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

/// Turn reverse video off (SGR 27).
#[inline]
pub fn reverse_off(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[27m")
}

// ─── Bell ────────────────────────────────────────────────────────────────────

/// Ring the terminal bell (BEL).
#[inline]
pub fn bell(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x07")
}

/// Start a visible bell: swap the screen to reverse video (DECSCNM set).
/// Pair with [`flash_end`] after a short pause.
#[inline]
pub fn flash_begin(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?5h")
}

/// End a visible bell (DECSCNM reset).
#[inline]
pub fn flash_end(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?5l")
}

// ─── Bracketed Paste ────────────────────────────────────────────────────────

/// Enable bracketed paste mode (DEC 2004).
///
/// Pasted text is wrapped with `\x1b[200~` / `\x1b[201~`, so a pasted
/// newline inserts a line break instead of accepting the line.
#[inline]
pub fn enable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

/// Disable bracketed paste mode.
#[inline]
pub fn disable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

// ─── Cursor Shape ───────────────────────────────────────────────────────────

/// Terminal cursor shape (DECSCUSR — Set Cursor Style).
///
/// Used for mode indication:
/// - Command mode → [`SteadyBlock`](CursorShape::SteadyBlock)
/// - Insert mode → [`SteadyBar`](CursorShape::SteadyBar)
/// - Replace mode → [`SteadyUnderline`](CursorShape::SteadyUnderline)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Terminal default (usually blinking block).
    #[default]
    Default,
    /// Steady (non-blinking) block cursor.
    SteadyBlock,
    /// Steady underline cursor.
    SteadyUnderline,
    /// Steady bar (I-beam) cursor.
    SteadyBar,
}

/// Set the cursor shape using DECSCUSR.
#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n: u8 = match shape {
        CursorShape::Default => 0,
        CursorShape::SteadyBlock => 2,
        CursorShape::SteadyUnderline => 4,
        CursorShape::SteadyBar => 6,
    };
    write!(w, "\x1b[{n} q")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_up_writes_count() {
        assert_eq!(emit(|w| cursor_up(w, 3)), "\x1b[3A");
    }

    #[test]
    fn cursor_up_zero_is_silent() {
        assert_eq!(emit(|w| cursor_up(w, 0)), "");
    }

    #[test]
    fn cursor_down_writes_count() {
        assert_eq!(emit(|w| cursor_down(w, 2)), "\x1b[2B");
        assert_eq!(emit(|w| cursor_down(w, 0)), "");
    }

    #[test]
    fn cursor_column_is_one_based() {
        assert_eq!(emit(|w| cursor_column(w, 0)), "\x1b[1G");
        assert_eq!(emit(|w| cursor_column(w, 41)), "\x1b[42G");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Erase / attributes ──────────────────────────────────────────────

    #[test]
    fn erase_sequences() {
        assert_eq!(emit(|w| clear_below(w)), "\x1b[J");
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J\x1b[H");
    }

    #[test]
    fn reverse_video_pair() {
        assert_eq!(emit(|w| reverse_on(w)), "\x1b[7m");
        assert_eq!(emit(|w| reverse_off(w)), "\x1b[27m");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    // ── Bell ────────────────────────────────────────────────────────────

    #[test]
    fn audible_and_visible_bell() {
        assert_eq!(emit(|w| bell(w)), "\x07");
        assert_eq!(emit(|w| flash_begin(w)), "\x1b[?5h");
        assert_eq!(emit(|w| flash_end(w)), "\x1b[?5l");
    }

    // ── Paste ───────────────────────────────────────────────────────────

    #[test]
    fn bracketed_paste_toggle() {
        assert_eq!(emit(|w| enable_bracketed_paste(w)), "\x1b[?2004h");
        assert_eq!(emit(|w| disable_bracketed_paste(w)), "\x1b[?2004l");
    }

    // ── Cursor shape ────────────────────────────────────────────────────

    #[test]
    fn cursor_shapes() {
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::Default)), "\x1b[0 q");
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::SteadyBlock)), "\x1b[2 q");
        assert_eq!(
            emit(|w| set_cursor_shape(w, CursorShape::SteadyUnderline)),
            "\x1b[4 q"
        );
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::SteadyBar)), "\x1b[6 q");
    }

    #[test]
    fn cursor_shape_default_variant() {
        assert_eq!(CursorShape::default(), CursorShape::Default);
    }
}
