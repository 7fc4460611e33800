//! Text Buffer Model
//!
//! A rope-backed, line-addressable text store. Each line is a *block*; blocks are addressed
//! zero-based here and shown one-based to the user. All text entering the buffer is
//! LF-normalized, so a block never contains `'\r'` or `'\n'`.

use crate::line_ending::normalize_line_endings;
use ropey::Rope;
use std::cmp::Ordering;
use std::ops::Range;

/// Logical position in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based block index.
    pub line: usize,
    /// Zero-based column in characters (Unicode scalar values) within the block.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// One-based block number, as displayed in the gutter and status bar.
    pub fn block_number(&self) -> usize {
        self.line + 1
    }

    /// One-based column number, as displayed in the status bar.
    pub fn column_number(&self) -> usize {
        self.column + 1
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Line-addressable mutable text store.
///
/// An empty buffer holds exactly one empty block, and a trailing newline opens a new empty
/// block, so `block_count() >= 1` always holds.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer (one empty block).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from text, normalizing line endings.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_endings(text)),
        }
    }

    /// Replace the whole content (bulk load).
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(&normalize_line_endings(text));
    }

    /// Number of blocks (always at least 1).
    pub fn block_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count, newlines included.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total byte count, newlines included.
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Get text of the specified block (excluding newline).
    pub fn block_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Length of a block in characters (excluding newline). Out-of-range blocks are empty.
    pub fn block_char_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Get complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text in the character range `start..end` (clamped to the buffer).
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Clamp a position onto an existing block and column.
    pub fn clamp_position(&self, position: Position) -> Position {
        let line = position.line.min(self.block_count() - 1);
        let column = position.column.min(self.block_char_len(line));
        Position::new(line, column)
    }

    /// Character offset of a (clamped) position.
    pub fn position_to_offset(&self, position: Position) -> usize {
        let position = self.clamp_position(position);
        self.rope.line_to_char(position.line) + position.column
    }

    /// Position of a (clamped) character offset.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Insert text at a character offset, normalizing line endings.
    ///
    /// Returns the number of characters actually inserted.
    pub fn insert(&mut self, char_offset: usize, text: &str) -> usize {
        let text = normalize_line_endings(text);
        if text.is_empty() {
            return 0;
        }
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, &text);
        text.chars().count()
    }

    /// Delete `len_chars` characters starting at `start_char`.
    ///
    /// Returns the removed text.
    pub fn delete(&mut self, start_char: usize, len_chars: usize) -> String {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = start_char
            .saturating_add(len_chars)
            .min(self.rope.len_chars());

        if start_char >= end_char {
            return String::new();
        }
        let removed = self.rope.slice(start_char..end_char).to_string();
        self.rope.remove(start_char..end_char);
        removed
    }

    /// Iterate over all block texts in order.
    pub fn blocks(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.block_count()).map(move |line| self.block_text(line).unwrap_or_default())
    }
}
