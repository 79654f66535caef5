//! Half-open byte ranges into a snippet.

use std::ops::Range;
use text_size::{TextRange, TextSize};

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open range `[start, end)` of byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Inclusive start offset.
    pub start: ByteOffset,
    /// Exclusive end offset.
    pub end: ByteOffset,
}

impl Span {
    /// Creates a span from two offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        let start = start.into();
        let end = end.into();
        debug_assert!(start <= end, "span start {start:?} is after end {end:?}");
        Self { start, end }
    }

    /// Creates a span from `usize` offsets as returned by `str` searches.
    /// Offsets beyond `u32::MAX` saturate.
    #[inline]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(to_size(start), to_size(end))
    }

    /// An empty span positioned at `offset`.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Start offset as a `usize` index.
    #[inline]
    pub fn start_index(&self) -> usize {
        u32::from(self.start) as usize
    }

    /// End offset as a `usize` index.
    #[inline]
    pub fn end_index(&self) -> usize {
        u32::from(self.end) as usize
    }

    /// The span as a `usize` range, suitable for slicing the source.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start_index()..self.end_index()
    }

    /// Returns the text this span covers in `source`.
    ///
    /// Returns an empty string when the span does not fit inside `source` or
    /// does not fall on character boundaries.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.range()).unwrap_or("")
    }

    /// Returns true if `offset` lies inside this span.
    #[inline]
    pub fn contains(&self, offset: ByteOffset) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Moves this span forward by `offset` bytes.
    ///
    /// Used when a sub-slice of the source was lexed on its own.
    #[inline]
    pub fn shift(self, offset: ByteOffset) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(span.start, span.end)
    }
}

fn to_size(offset: usize) -> TextSize {
    TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_offsets() {
        let span = Span::from_offsets(3, 9);
        assert_eq!(span.start, TextSize::from(3));
        assert_eq!(span.end, TextSize::from(9));
        assert_eq!(span.range(), 3..9);
    }

    #[test]
    fn test_slice() {
        let source = "<Button label=\"Go\" />";
        let span = Span::from_offsets(1, 7);
        assert_eq!(span.slice(source), "Button");
    }

    #[test]
    fn test_slice_out_of_bounds_is_empty() {
        let span = Span::from_offsets(4, 40);
        assert_eq!(span.slice("<br/>"), "");
    }

    #[test]
    fn test_shift() {
        let span = Span::from_offsets(0, 4).shift(TextSize::from(10));
        assert_eq!(span, Span::from_offsets(10, 14));
    }

    #[test]
    fn test_contains_and_cover() {
        let a = Span::from_offsets(2, 6);
        let b = Span::from_offsets(5, 12);
        assert!(a.contains(TextSize::from(2)));
        assert!(!a.contains(TextSize::from(6)));
        assert_eq!(a.cover(b), Span::from_offsets(2, 12));
    }

    #[test]
    fn test_empty() {
        let span = Span::empty(TextSize::from(7));
        assert!(span.is_empty());
        assert_eq!(span.len(), TextSize::from(0));
    }
}
