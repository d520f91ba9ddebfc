//! Text offset types
//!
//! Offsets count Unicode scalar values (chars), not bytes, so that
//! `begin..end` can be handed to consumers that index text by character.

use serde::{Deserialize, Serialize};

/// Half-open character range `[begin, end)` into a text datasource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub begin: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "inverted text range {}..{}", begin, end);
        Self { begin, end }
    }

    /// Empty range at a position (tokens without text)
    pub fn empty(at: usize) -> Self {
        Self::new(at, at)
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn contains(&self, other: &TextRange) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Smallest range covering both
    pub fn cover(&self, other: &TextRange) -> TextRange {
        TextRange::new(self.begin.min(other.begin), self.end.max(other.end))
    }

    /// Slice `text` by this char range
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        let mut indices = text.char_indices().map(|(i, _)| i).chain(Some(text.len()));
        let start = indices.nth(self.begin).unwrap_or(text.len());
        let end = if self.is_empty() {
            start
        } else {
            indices.nth(self.len() - 1).unwrap_or(text.len())
        };
        &text[start..end]
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}
