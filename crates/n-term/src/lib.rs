// SPDX-License-Identifier: MIT
//
// n-term — Terminal plumbing for n-shell.
//
// The thin layer between a byte-oriented tty and the line editor: raw
// mode with panic-safe restore, a parser that turns escape sequences into
// key events, a blocking reader that resolves the lone-ESC ambiguity with
// a short poll, and the handful of ANSI sequences an inline renderer
// needs. No TUI framework; every byte sent to the terminal is written
// here or by the renderer that calls into `ansi`.

pub mod ansi;
pub mod input;
pub mod reader;
pub mod terminal;
