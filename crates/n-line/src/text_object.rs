//! Text objects — regions of text chosen by structure, not by motion.
//!
//! ```text
//! operator + text-object = action
//! d        + iw          = delete inner word
//! c        + i"          = change inside quotes
//! y        + a(          = yank around parentheses
//! ```
//!
//! [`select`] takes a buffer, a cursor offset, and an [`Object`], returning
//! the half-open span of the object or `None` when there is no such object
//! around or after the cursor.
//!
//! | Inner    | Around   | Description                              |
//! |----------|----------|------------------------------------------|
//! | `iw`     | `aw`     | word (letters, digits, `_`)              |
//! | `iW`     | `aW`     | WORD (non-blank characters)              |
//! | `i"`     | `a"`     | double-quoted string on the current line |
//! | `i'`     | `a'`     | single-quoted string on the current line |
//! | `` i` `` | `` a` `` | backtick-quoted string                   |
//! | `i(` `ib`| `a(` `ab`| parenthesized block                      |
//! | `i[`     | `a[`     | square-bracketed block                   |
//! | `i{` `iB`| `a{` `aB`| curly-braced block                       |
//! | `i<`     | `a<`     | angle-bracketed block                    |

use crate::buffer::TextBuffer;
use crate::position::Span;
use crate::word::{CharClass, WordKind};

/// A text object family, named by the key typed after `i`/`a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object {
    Word(WordKind),
    Quote(char),
    Bracket { open: char, close: char },
}

impl Object {
    /// The object selected by `key`, if any.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        Some(match key {
            'w' => Self::Word(WordKind::Word),
            'W' => Self::Word(WordKind::BigWord),
            '\'' | '"' | '`' => Self::Quote(key),
            '(' | ')' | 'b' => Self::Bracket { open: '(', close: ')' },
            '[' | ']' => Self::Bracket { open: '[', close: ']' },
            '{' | '}' | 'B' => Self::Bracket { open: '{', close: '}' },
            '<' | '>' => Self::Bracket { open: '<', close: '>' },
            _ => return None,
        })
    }

    /// The char reported when the object is not found.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Word(WordKind::Word) => 'w',
            Self::Word(WordKind::BigWord) => 'W',
            Self::Quote(q) => q,
            Self::Bracket { open, .. } => open,
        }
    }
}

/// Span of `object` at `offset`. `inner` selects the `i` form, otherwise
/// the `a` form.
#[must_use]
pub fn select(buf: &TextBuffer, offset: usize, object: Object, inner: bool) -> Option<Span> {
    match (object, inner) {
        (Object::Word(kind), true) => inner_word(buf, offset, kind),
        (Object::Word(kind), false) => a_word(buf, offset, kind),
        (Object::Quote(q), true) => {
            let (open, close) = find_quote_pair(buf, offset, q)?;
            Some(Span::new(open + 1, close))
        }
        (Object::Quote(q), false) => {
            let (open, close) = find_quote_pair(buf, offset, q)?;
            Some(Span::new(open, close + 1))
        }
        (Object::Bracket { open, close }, true) => {
            let (o, c) = find_bracket_pair(buf, offset, open, close)?;
            Some(Span::new(o + 1, c))
        }
        (Object::Bracket { open, close }, false) => {
            let (o, c) = find_bracket_pair(buf, offset, open, close)?;
            Some(Span::new(o, c + 1))
        }
    }
}

// ---------------------------------------------------------------------------
// Word objects
// ---------------------------------------------------------------------------

/// `iw` / `iW` — the run of same-class chars under the cursor. On blanks,
/// the blank run; on a line break, just the break.
fn inner_word(buf: &TextBuffer, offset: usize, kind: WordKind) -> Option<Span> {
    let rope = buf.rope();
    let total = buf.len();
    if offset >= total {
        return None;
    }

    let class = kind.classify(rope.char(offset));
    if class == CharClass::Newline {
        return Some(Span::new(offset, offset + 1));
    }

    let mut s = offset;
    while s > 0 && kind.classify(rope.char(s - 1)) == class {
        s -= 1;
    }
    let mut e = offset + 1;
    while e < total && kind.classify(rope.char(e)) == class {
        e += 1;
    }
    Some(Span::new(s, e))
}

/// `aw` / `aW` — the inner word plus surrounding blanks: trailing blanks
/// first, leading if there are none. On blanks, the blanks plus the
/// following word.
fn a_word(buf: &TextBuffer, offset: usize, kind: WordKind) -> Option<Span> {
    let rope = buf.rope();
    let total = buf.len();
    let inner = inner_word(buf, offset, kind)?;
    let is_blank = |i: usize| kind.classify(rope.char(i)) == CharClass::Blank;

    match kind.classify(rope.char(offset)) {
        CharClass::Word | CharClass::Punctuation => {
            let mut end = inner.end;
            while end < total && is_blank(end) {
                end += 1;
            }
            if end > inner.end {
                return Some(Span::new(inner.start, end));
            }
            let mut start = inner.start;
            while start > 0 && is_blank(start - 1) {
                start -= 1;
            }
            Some(Span::new(start, inner.end))
        }
        CharClass::Blank => {
            let mut end = inner.end;
            if end < total {
                let next = kind.classify(rope.char(end));
                if next.is_token() {
                    while end < total && kind.classify(rope.char(end)) == next {
                        end += 1;
                    }
                }
            }
            Some(Span::new(inner.start, end))
        }
        CharClass::Newline => Some(inner),
    }
}

// ---------------------------------------------------------------------------
// Quote objects
// ---------------------------------------------------------------------------

/// Offsets of the quote pair on the cursor's line that contains the cursor,
/// or else the next pair after it.
///
/// Quotes pair up left to right: 1st with 2nd, 3rd with 4th. A trailing
/// unmatched quote belongs to no pair.
fn find_quote_pair(buf: &TextBuffer, offset: usize, quote: char) -> Option<(usize, usize)> {
    let line = buf.line_span(buf.line_of(offset));
    let quotes: Vec<usize> = (line.start..line.end)
        .filter(|&i| buf.rope().char(i) == quote)
        .collect();

    let pairs = || quotes.chunks_exact(2).map(|p| (p[0], p[1]));
    pairs()
        .find(|&(open, close)| offset >= open && offset <= close)
        .or_else(|| pairs().find(|&(open, _)| open > offset))
}

// ---------------------------------------------------------------------------
// Bracket objects
// ---------------------------------------------------------------------------

/// Offsets of the innermost `open`/`close` pair enclosing the cursor (or
/// under it). Nesting is tracked across the whole buffer.
fn find_bracket_pair(
    buf: &TextBuffer,
    offset: usize,
    open: char,
    close: char,
) -> Option<(usize, usize)> {
    let rope = buf.rope();
    let total = buf.len();
    if offset >= total {
        return None;
    }

    let ch = rope.char(offset);
    if ch == open {
        return Some((offset, find_closing(buf, offset, open, close)?));
    }
    if ch == close {
        return Some((find_opening(buf, offset, open, close)?, offset));
    }

    let o = find_opening(buf, offset, open, close)?;
    let c = find_closing(buf, o, open, close)?;
    (offset > o && offset < c).then_some((o, c))
}

/// Scan backward from `start` (exclusive) for an unmatched `open`.
pub(crate) fn find_opening(buf: &TextBuffer, start: usize, open: char, close: char) -> Option<usize> {
    let rope = buf.rope();
    let mut depth = 0usize;
    for i in (0..start).rev() {
        let ch = rope.char(i);
        if ch == close {
            depth += 1;
        } else if ch == open {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
    }
    None
}

/// Scan forward from `start` (exclusive) for the `close` matching the open
/// at `start`.
pub(crate) fn find_closing(buf: &TextBuffer, start: usize, open: char, close: char) -> Option<usize> {
    let rope = buf.rope();
    let mut depth = 0usize;
    for i in (start + 1)..buf.len() {
        let ch = rope.char(i);
        if ch == open {
            depth += 1;
        } else if ch == close {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
