//! Offsets, spans, and line/column pairs.
//!
//! The editing core addresses text by **absolute char offset** `0..=len`,
//! counting Unicode scalar values. A [`Span`] is a half-open `[start, end)`
//! range of offsets. [`LineCol`] exists for renderers that want to place
//! the cursor on a logical line; the core itself never stores it.

use std::fmt;

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open range of char offsets: `start..end`.
///
/// `start <= end` always holds; [`Span::new`] orders its endpoints, so a
/// backward motion produces the same span as the forward one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a span from two offsets in either order.
    #[inline]
    #[must_use]
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// An empty span at `offset`.
    #[inline]
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// True when the span covers no characters.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// True if `offset` lies inside `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains(self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Clamp both endpoints to `max` (typically the buffer length).
    #[inline]
    #[must_use]
    pub fn clamped(self, max: usize) -> Self {
        Self {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

// ---------------------------------------------------------------------------
// LineCol
// ---------------------------------------------------------------------------

/// A logical line and a char column within it, both 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl LineCol {
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

// 1-indexed for humans, like an editor status line.
impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_endpoints() {
        assert_eq!(Span::new(7, 3), Span { start: 3, end: 7 });
        assert_eq!(Span::new(3, 7), Span { start: 3, end: 7 });
    }

    #[test]
    fn point_is_empty() {
        let s = Span::point(4);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(!s.contains(4));
    }

    #[test]
    fn contains_is_half_open() {
        let s = Span::new(2, 5);
        assert!(!s.contains(1));
        assert!(s.contains(2));
        assert!(s.contains(4));
        assert!(!s.contains(5));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn clamped_to_length() {
        assert_eq!(Span::new(2, 10).clamped(4), Span::new(2, 4));
        assert_eq!(Span::new(6, 10).clamped(4), Span::point(4));
    }

    #[test]
    fn from_range() {
        assert_eq!(Span::from(1..3), Span::new(1, 3));
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Span::new(1, 3)), "1..3");
    }

    #[test]
    fn line_col_display_is_one_indexed() {
        assert_eq!(LineCol::new(0, 0).to_string(), "1:1");
        assert_eq!(LineCol::new(2, 9).to_string(), "3:10");
    }

    #[test]
    fn line_col_ordering() {
        assert!(LineCol::new(0, 9) < LineCol::new(1, 0));
        assert!(LineCol::new(1, 2) < LineCol::new(1, 3));
    }
}
