//! Display-line ranges for laid-out tokens.
//!
//! After layout every token occupies one or more rows of the wrapped
//! document. A `RangeLines` records which rows, so scrolling and search
//! highlighting can jump straight to a token.

/// An inclusive range of display lines.
///
/// Display lines are 0-based and continuous across the whole rendered body.
/// Unlike byte spans, both `start` and `end` are inclusive: a token that
/// renders into a single row has `start == end`.
///
/// # Example
///
/// ```rust
/// use caesium_core::span::RangeLines;
///
/// let range = RangeLines::new(3, 5);
/// assert_eq!(range.len(), 3);
/// assert!(range.contains(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeLines {
    /// First display line (inclusive).
    pub start: usize,
    /// Last display line (inclusive).
    pub end: usize,
}

impl RangeLines {
    /// Create a new range from display line numbers.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of display lines covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    /// A range always covers at least one row.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Check if this range covers a display line.
    #[inline]
    pub const fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }
}
