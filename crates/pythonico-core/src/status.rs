//! Status reporter.
//!
//! Derives the one-line status text `"Line: b/T  Column: c    Words: w"` from the cursor and
//! buffer. The word count is kept per block and patched on every edit, so the cost of an edit
//! is proportional to the blocks it touched rather than to the buffer size.

use crate::buffer::{Position, TextBuffer};
use std::ops::Range;

/// Count maximal runs of non-whitespace characters (Unicode whitespace delimits).
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Cursor/word-count status derived from the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReporter {
    block_words: Vec<usize>,
    total_words: usize,
    cursor: Position,
}

impl StatusReporter {
    /// Build the status for a buffer, with the cursor at the document start.
    pub fn new(buffer: &TextBuffer) -> Self {
        let mut status = Self {
            block_words: Vec::new(),
            total_words: 0,
            cursor: Position::default(),
        };
        status.reset(buffer);
        status
    }

    /// Recount everything (bulk load).
    pub fn reset(&mut self, buffer: &TextBuffer) {
        self.block_words = buffer.blocks().map(|block| count_words(&block)).collect();
        self.total_words = self.block_words.iter().sum();
        self.cursor = buffer.clamp_position(self.cursor);
    }

    /// Replace the counts of the blocks in `old` with counts of `new_blocks`.
    ///
    /// Blocks never share a word: the newline between them is whitespace, so per-block counts
    /// sum to the whole-buffer count.
    pub fn on_blocks_replaced<'a, I>(&mut self, old: Range<usize>, new_blocks: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let end = old.end.min(self.block_words.len());
        let start = old.start.min(end);
        let new_counts: Vec<usize> = new_blocks.into_iter().map(count_words).collect();

        let removed: usize = self
            .block_words
            .splice(start..end, new_counts.iter().copied())
            .sum();
        self.total_words = self.total_words - removed + new_counts.iter().sum::<usize>();
    }

    /// Record a cursor move.
    pub fn on_cursor_moved(&mut self, position: Position) {
        self.cursor = position;
    }

    /// Current cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Total number of blocks covered by the status.
    pub fn block_count(&self) -> usize {
        self.block_words.len().max(1)
    }

    /// Whole-buffer word count.
    pub fn word_count(&self) -> usize {
        self.total_words
    }

    /// The status bar text.
    pub fn status_line(&self) -> String {
        format!(
            "Line: {}/{}  Column: {}    Words: {}",
            self.cursor.block_number(),
            self.block_count(),
            self.cursor.column_number(),
            self.total_words
        )
    }
}
