//! Offset to line/column conversion.

use crate::ByteOffset;
use text_size::TextSize;

/// A 1-based line and column, as shown to users.
///
/// The column counts characters, not bytes, so a snippet containing
/// non-ASCII text still points at the right character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Line start table for a snippet.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// `line_starts[i]` is the byte offset where line `i` (0-based) begins.
    line_starts: Vec<ByteOffset>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
            )
            .collect();

        Self { line_starts }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts `offset` into a 1-based position within `text`.
    ///
    /// Offsets past the end of `text` are clamped to its end.
    pub fn position(&self, text: &str, offset: ByteOffset) -> Position {
        let offset = offset.min(TextSize::of(text));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };

        let line_start = u32::from(self.line_starts[line]) as usize;
        let end = u32::from(offset) as usize;
        let column = text
            .get(line_start..end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(end - line_start);

        Position {
            line: line as u32 + 1,
            column: column as u32 + 1,
        }
    }

    /// The full text of the 1-based `line`, without its line terminator.
    pub fn line_text<'a>(&self, text: &'a str, line: u32) -> Option<&'a str> {
        let index = (line as usize).checked_sub(1)?;
        let start = u32::from(*self.line_starts.get(index)?) as usize;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| u32::from(*next) as usize - 1)
            .unwrap_or(text.len());

        text.get(start..end).map(|l| l.trim_end_matches('\r'))
    }
}
