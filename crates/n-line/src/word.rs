//! Word classification and word/WORD motions.
//!
//! | Function | Key | Lands on |
//! |----------|-----|----------|
//! | [`next_word_start`] | `w` / `W` | first char of the next word |
//! | [`prev_word_start`] | `b` / `B` | first char of the previous word |
//! | [`word_end`] | `e` / `E` | last char of the current or next word |
//!
//! # Words vs WORDs
//!
//! A **word** is a run of word characters (letters, digits, underscore) or a
//! run of other non-blank characters (punctuation): `012.456` holds three
//! words. A **WORD** is any run of non-blanks; only whitespace separates
//! WORDs, so `012.456` is one WORD.
//!
//! An empty logical line counts as a word: `w` and `b` stop on it.
//!
//! All functions take and return absolute char offsets.

use crate::buffer::TextBuffer;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters.
    Punctuation,
    /// Whitespace within a line.
    Blank,
    /// The logical line separator `\n`.
    Newline,
}

impl CharClass {
    /// Word or punctuation, i.e. something a word motion can land on.
    #[inline]
    #[must_use]
    pub const fn is_token(self) -> bool {
        matches!(self, Self::Word | Self::Punctuation)
    }
}

/// Which word definition a motion uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordKind {
    /// `w` `b` `e`: letters/digits/underscore vs punctuation.
    Word,
    /// `W` `B` `E`: whitespace-separated.
    BigWord,
}

impl WordKind {
    /// Classify `ch` under this word definition.
    #[must_use]
    pub fn classify(self, ch: char) -> CharClass {
        if ch == '\n' {
            CharClass::Newline
        } else if ch.is_whitespace() {
            CharClass::Blank
        } else if self == Self::BigWord || ch.is_alphanumeric() || ch == '_' {
            CharClass::Word
        } else {
            CharClass::Punctuation
        }
    }
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// `w` / `W` — start of the next word.
///
/// 1. Skip the current token.
/// 2. Skip blanks and line breaks, stopping on an empty line.
/// 3. Land on the first char of the next token.
///
/// With no next word the result is the buffer length; callers in Command
/// mode clamp that back onto the last char.
#[must_use]
pub fn next_word_start(buf: &TextBuffer, offset: usize, kind: WordKind) -> usize {
    let total = buf.len();
    let rope = buf.rope();
    if offset >= total {
        return total;
    }

    let mut idx = offset;
    let start_class = kind.classify(rope.char(idx));

    if start_class.is_token() {
        while idx < total && kind.classify(rope.char(idx)) == start_class {
            idx += 1;
        }
    }

    while idx < total {
        match kind.classify(rope.char(idx)) {
            CharClass::Word | CharClass::Punctuation => break,
            CharClass::Blank => idx += 1,
            CharClass::Newline => {
                idx += 1;
                // Two breaks in a row: an empty line.
                if idx < total && rope.char(idx) == '\n' {
                    break;
                }
            }
        }
    }

    idx
}

/// `b` / `B` — start of the previous word. Stops at 0.
#[must_use]
pub fn prev_word_start(buf: &TextBuffer, offset: usize, kind: WordKind) -> usize {
    let rope = buf.rope();
    let offset = buf.clamp(offset);
    if offset == 0 {
        return 0;
    }

    let mut idx = offset - 1;

    loop {
        match kind.classify(rope.char(idx)) {
            CharClass::Word | CharClass::Punctuation => break,
            CharClass::Newline => {
                let line = buf.line_of(idx);
                if buf.line_content_len(line) == 0 {
                    return buf.line_start(line);
                }
                if idx == 0 {
                    return 0;
                }
                idx -= 1;
            }
            CharClass::Blank => {
                if idx == 0 {
                    return 0;
                }
                idx -= 1;
            }
        }
    }

    let class = kind.classify(rope.char(idx));
    while idx > 0 && kind.classify(rope.char(idx - 1)) == class {
        idx -= 1;
    }
    idx
}

/// `e` / `E` — last char of the current or next word.
///
/// Always moves at least one char when it can. With no word ahead the
/// offset is returned unchanged.
#[must_use]
pub fn word_end(buf: &TextBuffer, offset: usize, kind: WordKind) -> usize {
    let rope = buf.rope();
    let total = buf.len();
    if total == 0 || offset + 1 >= total {
        return offset.min(total.saturating_sub(1));
    }
    let last = total - 1;

    let mut idx = offset + 1;
    while idx < total && !kind.classify(rope.char(idx)).is_token() {
        idx += 1;
    }
    if idx >= total {
        return offset;
    }

    let class = kind.classify(rope.char(idx));
    while idx < last && kind.classify(rope.char(idx + 1)) == class {
        idx += 1;
    }
    idx
}

/// True if `offset` is on a token whose next char belongs to another class
/// (or is the end of the buffer).
#[must_use]
pub fn is_word_end(buf: &TextBuffer, offset: usize, kind: WordKind) -> bool {
    let Some(ch) = buf.char_at(offset) else {
        return false;
    };
    let class = kind.classify(ch);
    class.is_token()
        && buf
            .char_at(offset + 1)
            .is_none_or(|next| kind.classify(next) != class)
}

/// Start of the word that ends just before `offset`, skipping blanks first.
/// This is the span `Ctrl-W` kills in Insert mode and the emacs dispatcher.
/// Unlike `b`, it never crosses into the previous logical line.
#[must_use]
pub fn rubout_start(buf: &TextBuffer, offset: usize, kind: WordKind) -> usize {
    let rope = buf.rope();
    let offset = buf.clamp(offset);
    let floor = buf.line_start(buf.line_of(offset));

    let mut idx = offset;
    while idx > floor && kind.classify(rope.char(idx - 1)) == CharClass::Blank {
        idx -= 1;
    }
    if idx == floor {
        return idx;
    }
    let class = kind.classify(rope.char(idx - 1));
    while idx > floor && kind.classify(rope.char(idx - 1)) == class {
        idx -= 1;
    }
    idx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(text: &str) -> TextBuffer {
        TextBuffer::from_text(text)
    }

    // -- Classification -----------------------------------------------------

    #[test]
    fn classify_small_word() {
        let k = WordKind::Word;
        assert_eq!(k.classify('a'), CharClass::Word);
        assert_eq!(k.classify('9'), CharClass::Word);
        assert_eq!(k.classify('_'), CharClass::Word);
        assert_eq!(k.classify('é'), CharClass::Word);
        assert_eq!(k.classify('.'), CharClass::Punctuation);
        assert_eq!(k.classify('('), CharClass::Punctuation);
        assert_eq!(k.classify(' '), CharClass::Blank);
        assert_eq!(k.classify('\t'), CharClass::Blank);
        assert_eq!(k.classify('\n'), CharClass::Newline);
    }

    #[test]
    fn classify_big_word() {
        let k = WordKind::BigWord;
        assert_eq!(k.classify('.'), CharClass::Word);
        assert_eq!(k.classify('a'), CharClass::Word);
        assert_eq!(k.classify(' '), CharClass::Blank);
        assert_eq!(k.classify('\n'), CharClass::Newline);
    }

    #[test]
    fn carriage_return_is_blank() {
        assert_eq!(WordKind::Word.classify('\r'), CharClass::Blank);
    }

    // -- w / W --------------------------------------------------------------

    #[test]
    fn w_moves_to_next_word() {
        let b = buf("hello world");
        assert_eq!(next_word_start(&b, 0, WordKind::Word), 6);
        assert_eq!(next_word_start(&b, 3, WordKind::Word), 6);
    }

    #[test]
    fn w_stops_at_punctuation() {
        let b = buf("foo.bar baz");
        assert_eq!(next_word_start(&b, 0, WordKind::Word), 3);
        assert_eq!(next_word_start(&b, 3, WordKind::Word), 4);
        assert_eq!(next_word_start(&b, 0, WordKind::BigWord), 8);
    }

    #[test]
    fn w_past_last_word_reaches_buffer_end() {
        let b = buf("abc def");
        assert_eq!(next_word_start(&b, 4, WordKind::Word), 7);
        assert_eq!(next_word_start(&b, 7, WordKind::Word), 7);
    }

    #[test]
    fn w_crosses_line_break() {
        let b = buf("abc\ndef");
        assert_eq!(next_word_start(&b, 1, WordKind::Word), 4);
    }

    #[test]
    fn w_stops_on_empty_line() {
        let b = buf("abc\n\ndef");
        assert_eq!(next_word_start(&b, 0, WordKind::Word), 4);
        assert_eq!(next_word_start(&b, 4, WordKind::Word), 5);
    }

    // -- b / B --------------------------------------------------------------

    #[test]
    fn b_visits_punctuation_boundaries() {
        let b = buf("012.456.890");
        let mut at = 10;
        let mut visited = Vec::new();
        for _ in 0..5 {
            at = prev_word_start(&b, at, WordKind::Word);
            visited.push(at);
        }
        assert_eq!(visited, vec![8, 7, 4, 3, 0]);
    }

    #[test]
    fn big_b_ignores_punctuation() {
        let b = buf("012.456.890");
        assert_eq!(prev_word_start(&b, 10, WordKind::BigWord), 0);
    }

    #[test]
    fn b_at_start_stays() {
        let b = buf("abc");
        assert_eq!(prev_word_start(&b, 0, WordKind::Word), 0);
    }

    #[test]
    fn b_skips_leading_blanks() {
        let b = buf("   abc");
        assert_eq!(prev_word_start(&b, 3, WordKind::Word), 0);
    }

    #[test]
    fn b_stops_on_empty_line() {
        let b = buf("abc\n\ndef");
        assert_eq!(prev_word_start(&b, 5, WordKind::Word), 4);
        assert_eq!(prev_word_start(&b, 4, WordKind::Word), 0);
    }

    // -- e / E --------------------------------------------------------------

    #[test]
    fn e_moves_to_word_end() {
        let b = buf("abc def");
        assert_eq!(word_end(&b, 0, WordKind::Word), 2);
        assert_eq!(word_end(&b, 2, WordKind::Word), 6);
    }

    #[test]
    fn e_with_punctuation() {
        let b = buf("foo.bar");
        assert_eq!(word_end(&b, 0, WordKind::Word), 2);
        assert_eq!(word_end(&b, 2, WordKind::Word), 3);
        assert_eq!(word_end(&b, 0, WordKind::BigWord), 6);
    }

    #[test]
    fn e_at_last_word_end_stays() {
        let b = buf("abc  ");
        assert_eq!(word_end(&b, 2, WordKind::Word), 2);
    }

    #[test]
    fn is_word_end_checks_next_class() {
        let b = buf("ab.c");
        assert!(!is_word_end(&b, 0, WordKind::Word));
        assert!(is_word_end(&b, 1, WordKind::Word));
        assert!(is_word_end(&b, 2, WordKind::Word));
        assert!(is_word_end(&b, 3, WordKind::Word));
        assert!(!is_word_end(&b, 1, WordKind::BigWord));
    }

    // -- rubout -------------------------------------------------------------

    #[test]
    fn rubout_skips_blanks_then_word() {
        let b = buf("git commit  ");
        assert_eq!(rubout_start(&b, 12, WordKind::Word), 4);
        assert_eq!(rubout_start(&b, 4, WordKind::Word), 0);
    }

    #[test]
    fn rubout_big_word_eats_punctuation() {
        let b = buf("cd ../src");
        assert_eq!(rubout_start(&b, 9, WordKind::BigWord), 3);
        assert_eq!(rubout_start(&b, 9, WordKind::Word), 6);
    }

    #[test]
    fn rubout_stops_at_line_start() {
        let b = buf("abc\n  def");
        assert_eq!(rubout_start(&b, 6, WordKind::Word), 4);
    }
}
