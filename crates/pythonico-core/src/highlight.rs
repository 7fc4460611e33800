//! Per-block highlighting interface.
//!
//! The core does not know any grammar. A [`BlockHighlighter`] turns the text of a single block
//! into [`HighlightSpan`]s, and the [`Editor`](crate::Editor) keeps one span list per block,
//! recomputing only blocks touched by an edit.

/// Opaque style identifier. The UI/theme layer maps ids to colors and weights.
pub type StyleId = u32;

/// A styled character range within one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightSpan {
    /// Start column (characters, zero-based) within the block.
    pub start: usize,
    /// Length in characters. Always non-zero.
    pub length: usize,
    /// Style applied to the range.
    pub style: StyleId,
}

impl HighlightSpan {
    /// Create a new span.
    pub fn new(start: usize, length: usize, style: StyleId) -> Self {
        Self {
            start,
            length,
            style,
        }
    }

    /// Exclusive end column.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Whether `column` falls inside this span.
    pub fn contains(&self, column: usize) -> bool {
        column >= self.start && column < self.end()
    }
}

/// Produces styled spans for a single block of text.
///
/// Implementations must be stateless across blocks: the result may depend only on `text`, so
/// that any block can be re-highlighted independently.
pub trait BlockHighlighter {
    /// Highlight one block.
    ///
    /// `text` never contains a newline. The returned spans must be sorted by `start`,
    /// pairwise non-overlapping and lie within `0..text.chars().count()`. This call cannot fail.
    fn highlight_block(&self, text: &str) -> Vec<HighlightSpan>;
}

/// A highlighter that produces no spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl BlockHighlighter for PlainText {
    fn highlight_block(&self, _text: &str) -> Vec<HighlightSpan> {
        Vec::new()
    }
}

/// The style at `column` within a block, given its sorted spans.
pub fn style_at(spans: &[HighlightSpan], column: usize) -> Option<StyleId> {
    let idx = spans.partition_point(|span| span.end() <= column);
    spans
        .get(idx)
        .filter(|span| span.contains(column))
        .map(|span| span.style)
}
