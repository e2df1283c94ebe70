//! Motions and span resolution.
//!
//! Every cursor motion is a variant of the closed [`Motion`] enum, and one
//! function, [`resolve`], turns a motion plus its context into a
//! [`Landing`]: where the cursor goes, and what span an operator acts on.
//!
//! # Kinds
//!
//! - **Exclusive**: the span is `[min, max)` of cursor and target.
//! - **Inclusive**: the char at `max` is part of the span, but the span
//!   never eats the `\n` that ends max's line.
//! - **Linewise**: whole logical lines.
//!
//! Boundary overshoot is never an error: a motion that would run past the
//! line or buffer stops at the limit. Only lookups that find nothing
//! (`f`, `%`, text objects, `;` with no previous search) fail.

use crate::buffer::TextBuffer;
use crate::cursor;
use crate::error::{EditError, EditResult, Target};
use crate::position::Span;
use crate::text_object::{self, Object};
use crate::word::{self, WordKind};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A remembered `f`/`F`/`t`/`T` search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSearch {
    pub ch: char,
    pub forward: bool,
    /// `t`/`T`: land next to the match instead of on it.
    pub till: bool,
}

impl CharSearch {
    /// The same search in the opposite direction (`,`).
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            forward: !self.forward,
            ..self
        }
    }

    const fn kind(self) -> MotionKind {
        if self.forward {
            MotionKind::Inclusive
        } else {
            MotionKind::Exclusive
        }
    }
}

/// Every motion the vi interpreter knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// `h`
    Left,
    /// `l`
    Right,
    /// `0`
    LineStart,
    /// `^`
    FirstNonBlank,
    /// `$`
    LineEnd,
    /// `N|`; the column is the count.
    Column,
    /// `w` / `W`
    WordForward(WordKind),
    /// `b` / `B`
    WordBackward(WordKind),
    /// `e` / `E`
    WordEnd(WordKind),
    /// `f` `F` `t` `T`
    Find(CharSearch),
    /// `;` and `,` (reverse)
    RepeatFind { reverse: bool },
    /// `%`
    MatchBracket,
    /// `j`
    LineDown,
    /// `k`
    LineUp,
    /// `i`/`a` + object; only after an operator or in Visual mode.
    TextObject { object: Object, inner: bool },
}

/// How the landing offset relates to the acted-upon span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Exclusive,
    Inclusive,
    Linewise,
}

/// The result of resolving a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// A cursor target.
    Point { target: usize, kind: MotionKind },
    /// A ready-made span (text objects).
    Span(Span),
    /// An inclusive range of logical lines.
    Lines { first: usize, last: usize },
}

impl Landing {
    /// The char span an operator acts on, given the cursor it started from.
    /// Line ranges cover their content but not the final `\n`; callers that
    /// work on whole lines use the line numbers instead.
    #[must_use]
    pub fn span(self, buf: &TextBuffer, cursor: usize) -> Span {
        match self {
            Self::Point {
                target,
                kind: MotionKind::Inclusive,
            } => inclusive(buf, cursor, target),
            Self::Point { target, .. } => Span::new(cursor, target),
            Self::Span(span) => span,
            Self::Lines { first, last } => Span::new(buf.line_start(first), buf.line_end(last)),
        }
    }

    #[must_use]
    pub const fn kind(self) -> MotionKind {
        match self {
            Self::Point { kind, .. } => kind,
            Self::Span(_) => MotionKind::Inclusive,
            Self::Lines { .. } => MotionKind::Linewise,
        }
    }
}

/// Inclusive span between two offsets: one past the larger, bounded by the
/// end of its line.
fn inclusive(buf: &TextBuffer, a: usize, b: usize) -> Span {
    let lo = a.min(b);
    let hi = a.max(b);
    let end = (hi + 1).min(buf.line_end(buf.line_of(hi)));
    Span::new(lo, end.max(hi))
}

/// Everything a motion needs besides itself.
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    pub buf: &'a TextBuffer,
    pub cursor: usize,
    /// Effective count, at least 1.
    pub count: usize,
    /// Resolving for a pending operator rather than a plain move.
    pub for_operator: bool,
    pub last_search: Option<CharSearch>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve `motion` in `ctx`.
///
/// # Errors
///
/// [`EditError::NotFound`] when a char search, bracket match, text object,
/// or line motion has no target.
pub fn resolve(motion: Motion, ctx: &MotionContext<'_>) -> EditResult<Landing> {
    let MotionContext {
        buf,
        cursor,
        count,
        for_operator,
        ..
    } = *ctx;
    let line = buf.line_of(cursor);
    let point = |target: usize, kind: MotionKind| -> EditResult<Landing> {
        Ok(Landing::Point { target, kind })
    };

    match motion {
        Motion::Left => point(
            cursor.saturating_sub(count).max(buf.line_start(line)),
            MotionKind::Exclusive,
        ),
        Motion::Right => {
            let limit = if for_operator {
                buf.line_end(line)
            } else {
                cursor::max_offset(buf, line, false)
            };
            point(cursor.saturating_add(count).min(limit), MotionKind::Exclusive)
        }
        Motion::LineStart => point(buf.line_start(line), MotionKind::Exclusive),
        Motion::FirstNonBlank => point(buf.first_non_blank(line), MotionKind::Exclusive),
        Motion::LineEnd => {
            let last = line.saturating_add(count - 1).min(buf.last_line());
            point(buf.line_end(last), MotionKind::Inclusive)
        }
        Motion::Column => {
            let start = buf.line_start(line);
            point(
                start + (count - 1).min(buf.line_content_len(line).saturating_sub(1)),
                MotionKind::Exclusive,
            )
        }
        Motion::WordForward(kind) => {
            let mut target = cursor;
            for _ in 0..count {
                let next = word::next_word_start(buf, target, kind);
                if next == target {
                    break;
                }
                target = next;
            }
            if for_operator {
                target = trim_to_line_end(buf, cursor, target);
            }
            point(target, MotionKind::Exclusive)
        }
        Motion::WordBackward(kind) => {
            let mut target = cursor;
            for _ in 0..count {
                target = word::prev_word_start(buf, target, kind);
            }
            point(target, MotionKind::Exclusive)
        }
        Motion::WordEnd(kind) => {
            let mut target = cursor;
            for _ in 0..count {
                target = word::word_end(buf, target, kind);
            }
            point(target, MotionKind::Inclusive)
        }
        Motion::Find(search) => {
            let target = find_char(buf, cursor, search, count, false)?;
            point(target, search.kind())
        }
        Motion::RepeatFind { reverse } => {
            let search = ctx
                .last_search
                .ok_or(EditError::NotFound(Target::PreviousSearch))?;
            let search = if reverse { search.reversed() } else { search };
            let target = find_char(buf, cursor, search, count, true)?;
            point(target, search.kind())
        }
        Motion::MatchBracket => point(match_bracket(buf, cursor)?, MotionKind::Inclusive),
        Motion::LineDown => {
            let target = line.saturating_add(count).min(buf.last_line());
            if target == line {
                return Err(EditError::NotFound(Target::Line));
            }
            Ok(Landing::Lines {
                first: line,
                last: target,
            })
        }
        Motion::LineUp => {
            if line == 0 {
                return Err(EditError::NotFound(Target::Line));
            }
            Ok(Landing::Lines {
                first: line.saturating_sub(count),
                last: line,
            })
        }
        Motion::TextObject { object, inner } => text_object::select(buf, cursor, object, inner)
            .map(Landing::Span)
            .ok_or(EditError::NotFound(Target::TextObject(object.key()))),
    }
}

/// True when `N|` asks for a column the cursor's line does not have.
#[must_use]
pub fn column_overshoots(buf: &TextBuffer, cursor: usize, column: usize) -> bool {
    column > buf.line_content_len(buf.line_of(cursor)).max(1)
}

/// `cw` / `cW` on a non-blank: like `e`, except that a cursor already on the
/// last char of a word changes just that char on the first step.
#[must_use]
pub fn change_word_end(buf: &TextBuffer, cursor: usize, count: usize, kind: WordKind) -> usize {
    let mut target = cursor;
    for step in 0..count {
        if step == 0 && word::is_word_end(buf, target, kind) {
            continue;
        }
        target = word::word_end(buf, target, kind);
    }
    target
}

/// An operator's `w` that crossed onto a later line stops at the end of the
/// line the last word was on, rather than eating the line break and indent.
fn trim_to_line_end(buf: &TextBuffer, cursor: usize, target: usize) -> usize {
    let target_line = buf.line_of(target);
    if target_line == buf.line_of(cursor) || target > buf.first_non_blank(target_line) {
        return target;
    }
    let trimmed = buf.line_end(target_line - 1);
    if trimmed > cursor { trimmed } else { target }
}

// ---------------------------------------------------------------------------
// Character search
// ---------------------------------------------------------------------------

/// Find the `count`-th `search.ch` on the cursor's line.
///
/// A repeated `t`/`T` starts one char further out, so it does not stick on
/// the target it is already next to.
fn find_char(
    buf: &TextBuffer,
    cursor: usize,
    search: CharSearch,
    count: usize,
    repeat: bool,
) -> EditResult<usize> {
    let rope = buf.rope();
    let span = buf.line_span(buf.line_of(cursor));
    let skip = if repeat && search.till { 2 } else { 1 };
    let missing = EditError::NotFound(Target::Char(search.ch));

    let found = if search.forward {
        (cursor + skip..span.end)
            .filter(|&i| rope.char(i) == search.ch)
            .nth(count - 1)
    } else {
        (span.start..cursor.saturating_sub(skip - 1))
            .rev()
            .filter(|&i| rope.char(i) == search.ch)
            .nth(count - 1)
    };
    let hit = found.ok_or(missing)?;

    Ok(match (search.till, search.forward) {
        (false, _) => hit,
        (true, true) => hit - 1,
        (true, false) => hit + 1,
    })
}

// ---------------------------------------------------------------------------
// Bracket matching
// ---------------------------------------------------------------------------

/// `%`: the partner of the first bracket at or after the cursor on its line.
/// Only same-kind brackets nest.
fn match_bracket(buf: &TextBuffer, cursor: usize) -> EditResult<usize> {
    let rope = buf.rope();
    let end = buf.line_end(buf.line_of(cursor));
    let missing = EditError::NotFound(Target::Bracket);

    let (at, ch) = (cursor..end)
        .map(|i| (i, rope.char(i)))
        .find(|&(_, ch)| matches!(ch, '(' | ')' | '[' | ']' | '{' | '}'))
        .ok_or(missing)?;

    let partner = match ch {
        '(' => text_object::find_closing(buf, at, '(', ')'),
        '[' => text_object::find_closing(buf, at, '[', ']'),
        '{' => text_object::find_closing(buf, at, '{', '}'),
        ')' => text_object::find_opening(buf, at, '(', ')'),
        ']' => text_object::find_opening(buf, at, '[', ']'),
        _ => text_object::find_opening(buf, at, '{', '}'),
    };
    partner.ok_or(missing)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx(buf: &TextBuffer, cursor: usize, count: usize) -> MotionContext<'_> {
        MotionContext {
            buf,
            cursor,
            count,
            for_operator: false,
            last_search: None,
        }
    }

    fn op(buf: &TextBuffer, cursor: usize, count: usize) -> MotionContext<'_> {
        MotionContext {
            for_operator: true,
            ..ctx(buf, cursor, count)
        }
    }

    fn target(motion: Motion, c: &MotionContext<'_>) -> usize {
        match resolve(motion, c).unwrap() {
            Landing::Point { target, .. } => target,
            other => panic!("expected a point, got {other:?}"),
        }
    }

    fn f(ch: char) -> CharSearch {
        CharSearch {
            ch,
            forward: true,
            till: false,
        }
    }

    // -- Characters ---------------------------------------------------------

    #[test]
    fn left_stops_at_line_start() {
        let buf = TextBuffer::from_text("ab\ncd");
        assert_eq!(target(Motion::Left, &ctx(&buf, 4, 1)), 3);
        assert_eq!(target(Motion::Left, &ctx(&buf, 4, 9)), 3);
    }

    #[test]
    fn right_standalone_stops_on_last_char() {
        let buf = TextBuffer::from_text("0123");
        assert_eq!(target(Motion::Right, &ctx(&buf, 0, 10)), 3);
    }

    #[test]
    fn right_for_operator_reaches_line_end() {
        let buf = TextBuffer::from_text("0123");
        let c = op(&buf, 0, 10);
        assert_eq!(target(Motion::Right, &c), 4);
        assert_eq!(resolve(Motion::Right, &c).unwrap().span(&buf, 0), Span::new(0, 4));
    }

    #[test]
    fn dl_is_exclusive_one_char() {
        let buf = TextBuffer::from_text("0123456789");
        let landing = resolve(Motion::Right, &op(&buf, 0, 1)).unwrap();
        assert_eq!(landing.span(&buf, 0), Span::new(0, 1));
    }

    // -- Line positions -----------------------------------------------------

    #[test]
    fn dollar_is_inclusive_whole_line() {
        let buf = TextBuffer::from_text("0123456789");
        let landing = resolve(Motion::LineEnd, &op(&buf, 0, 1)).unwrap();
        assert_eq!(landing.kind(), MotionKind::Inclusive);
        assert_eq!(landing.span(&buf, 0), Span::new(0, 10));
    }

    #[test]
    fn dollar_with_count_goes_down() {
        let buf = TextBuffer::from_text("ab\ncd\nef");
        let landing = resolve(Motion::LineEnd, &op(&buf, 1, 2)).unwrap();
        assert_eq!(landing.span(&buf, 1), Span::new(1, 5));
    }

    #[test]
    fn dollar_does_not_eat_newline() {
        let buf = TextBuffer::from_text("ab\ncd");
        let landing = resolve(Motion::LineEnd, &op(&buf, 0, 1)).unwrap();
        assert_eq!(landing.span(&buf, 0), Span::new(0, 2));
    }

    #[test]
    fn first_non_blank_and_line_start() {
        let buf = TextBuffer::from_text("   ls");
        assert_eq!(target(Motion::FirstNonBlank, &ctx(&buf, 4, 1)), 3);
        assert_eq!(target(Motion::LineStart, &ctx(&buf, 4, 1)), 0);
    }

    #[test]
    fn column_clamps_to_last_char() {
        let buf = TextBuffer::from_text("abcdef");
        assert_eq!(target(Motion::Column, &ctx(&buf, 0, 3)), 2);
        assert_eq!(target(Motion::Column, &ctx(&buf, 0, 33)), 5);
        assert!(column_overshoots(&buf, 0, 7));
        assert!(!column_overshoots(&buf, 0, 6));
    }

    #[test]
    fn column_on_empty_line() {
        let buf = TextBuffer::new();
        assert_eq!(target(Motion::Column, &ctx(&buf, 0, 1)), 0);
        assert!(!column_overshoots(&buf, 0, 1));
        assert!(column_overshoots(&buf, 0, 2));
    }

    // -- Words --------------------------------------------------------------

    #[test]
    fn word_counts_multiply_the_same() {
        let buf = TextBuffer::from_text("a b c d e f g h");
        assert_eq!(target(Motion::WordForward(WordKind::Word), &op(&buf, 0, 6)), 12);
    }

    #[test]
    fn w_past_last_word_reaches_end_for_operator() {
        let buf = TextBuffer::from_text("abc def");
        assert_eq!(target(Motion::WordForward(WordKind::Word), &op(&buf, 4, 1)), 7);
    }

    #[test]
    fn operator_w_stops_at_line_end() {
        let buf = TextBuffer::from_text("foo bar\n  baz");
        let landing = resolve(Motion::WordForward(WordKind::Word), &op(&buf, 4, 1)).unwrap();
        assert_eq!(landing.span(&buf, 4), Span::new(4, 7));
    }

    #[test]
    fn standalone_w_crosses_lines() {
        let buf = TextBuffer::from_text("foo bar\n  baz");
        assert_eq!(target(Motion::WordForward(WordKind::Word), &ctx(&buf, 4, 1)), 10);
    }

    #[test]
    fn e_is_inclusive() {
        let buf = TextBuffer::from_text("abc def");
        let landing = resolve(Motion::WordEnd(WordKind::Word), &op(&buf, 0, 1)).unwrap();
        assert_eq!(landing.span(&buf, 0), Span::new(0, 3));
    }

    #[test]
    fn change_word_on_word_end_changes_one_char() {
        let buf = TextBuffer::from_text("abc def");
        assert_eq!(change_word_end(&buf, 2, 1, WordKind::Word), 2);
        assert_eq!(change_word_end(&buf, 0, 1, WordKind::Word), 2);
        assert_eq!(change_word_end(&buf, 2, 2, WordKind::Word), 6);
    }

    // -- Character search ---------------------------------------------------

    #[test]
    fn find_forward_and_till() {
        let buf = TextBuffer::from_text("a,b,c,d");
        assert_eq!(target(Motion::Find(f(',')), &ctx(&buf, 0, 1)), 1);
        assert_eq!(target(Motion::Find(f(',')), &ctx(&buf, 0, 3)), 5);
        let t = CharSearch { till: true, ..f(',') };
        assert_eq!(target(Motion::Find(t), &ctx(&buf, 0, 2)), 2);
    }

    #[test]
    fn find_backward_is_exclusive() {
        let buf = TextBuffer::from_text("a,b,c,d");
        let back = f(',').reversed();
        let landing = resolve(Motion::Find(back), &op(&buf, 6, 1)).unwrap();
        assert_eq!(landing, Landing::Point { target: 5, kind: MotionKind::Exclusive });
        assert_eq!(landing.span(&buf, 6), Span::new(5, 6));
        let till_back = CharSearch { till: true, ..back };
        assert_eq!(target(Motion::Find(till_back), &ctx(&buf, 6, 2)), 4);
    }

    #[test]
    fn find_missing_char_is_not_found() {
        let buf = TextBuffer::from_text("abc");
        assert_eq!(
            resolve(Motion::Find(f('z')), &ctx(&buf, 0, 1)),
            Err(EditError::NotFound(Target::Char('z')))
        );
        assert_eq!(
            resolve(Motion::Find(f('b')), &ctx(&buf, 0, 2)),
            Err(EditError::NotFound(Target::Char('b')))
        );
    }

    #[test]
    fn find_stays_on_current_line() {
        let buf = TextBuffer::from_text("ab\nx");
        assert!(resolve(Motion::Find(f('x')), &ctx(&buf, 0, 1)).is_err());
    }

    #[test]
    fn repeat_without_previous_search() {
        let buf = TextBuffer::from_text("abc");
        assert_eq!(
            resolve(Motion::RepeatFind { reverse: false }, &ctx(&buf, 0, 1)),
            Err(EditError::NotFound(Target::PreviousSearch))
        );
    }

    #[test]
    fn repeated_till_skips_adjacent_target() {
        let buf = TextBuffer::from_text("a,b,c");
        let t = CharSearch { till: true, ..f(',') };
        let c = MotionContext {
            last_search: Some(t),
            ..ctx(&buf, 0, 1)
        };
        // Cursor 0 is already next to the comma at 1.
        assert_eq!(target(Motion::RepeatFind { reverse: false }, &c), 2);
    }

    #[test]
    fn comma_reverses_direction() {
        let buf = TextBuffer::from_text("x-x-x");
        let c = MotionContext {
            last_search: Some(f('x')),
            ..ctx(&buf, 4, 1)
        };
        assert_eq!(target(Motion::RepeatFind { reverse: true }, &c), 2);
    }

    // -- Brackets -----------------------------------------------------------

    #[test]
    fn percent_matches_nested_by_kind() {
        let buf = TextBuffer::from_text("(1{3{5)789)b}c");
        let landing = resolve(Motion::MatchBracket, &op(&buf, 4, 1)).unwrap();
        assert_eq!(landing.span(&buf, 4), Span::new(4, 13));
    }

    #[test]
    fn percent_scans_forward_to_first_bracket() {
        let buf = TextBuffer::from_text("if (a) b");
        assert_eq!(target(Motion::MatchBracket, &ctx(&buf, 0, 1)), 5);
        assert_eq!(target(Motion::MatchBracket, &ctx(&buf, 5, 1)), 3);
    }

    #[test]
    fn percent_without_bracket_is_not_found() {
        let buf = TextBuffer::from_text("abc (x");
        assert_eq!(
            resolve(Motion::MatchBracket, &ctx(&buf, 0, 1)),
            Err(EditError::NotFound(Target::Bracket))
        );
        assert!(resolve(Motion::MatchBracket, &ctx(&TextBuffer::from_text("abc"), 0, 1)).is_err());
    }

    // -- Lines / objects ----------------------------------------------------

    #[test]
    fn line_motions_are_linewise() {
        let buf = TextBuffer::from_text("a\nb\nc");
        assert_eq!(
            resolve(Motion::LineDown, &op(&buf, 0, 1)),
            Ok(Landing::Lines { first: 0, last: 1 })
        );
        assert_eq!(
            resolve(Motion::LineUp, &op(&buf, 4, 5)),
            Ok(Landing::Lines { first: 0, last: 2 })
        );
        assert!(resolve(Motion::LineDown, &op(&buf, 4, 1)).is_err());
        assert!(resolve(Motion::LineUp, &op(&buf, 0, 1)).is_err());
    }

    #[test]
    fn text_object_landing() {
        let buf = TextBuffer::from_text("a 'quoted' text");
        let motion = Motion::TextObject {
            object: Object::Quote('\''),
            inner: true,
        };
        assert_eq!(resolve(motion, &op(&buf, 5, 1)), Ok(Landing::Span(Span::new(3, 9))));
        let missing = Motion::TextObject {
            object: Object::Quote('"'),
            inner: true,
        };
        assert_eq!(
            resolve(missing, &op(&buf, 5, 1)),
            Err(EditError::NotFound(Target::TextObject('"')))
        );
    }
}
