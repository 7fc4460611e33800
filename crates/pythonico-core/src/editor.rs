//! The editing core.
//!
//! [`Editor`] owns the authoritative [`TextBuffer`] and the state derived from it: one span
//! list per block, the [`LineNumberGutter`] and the [`StatusReporter`]. Every mutation goes
//! through the same pipeline:
//!
//! 1. the buffer applies the edit;
//! 2. the touched blocks are re-highlighted;
//! 3. the gutter is updated if the block count changed;
//! 4. the status is updated;
//! 5. subscribers receive the resulting [`BufferEvent`]s.
//!
//! Subscribers therefore always see derived state that agrees with the buffer.
//!
//! # Example
//!
//! ```rust
//! use pythonico_core::{Editor, PlainText};
//!
//! let mut editor = Editor::new("", PlainText);
//! editor.insert_text("print(1)\n");
//! assert_eq!(editor.block_count(), 2);
//! assert_eq!(editor.gutter().line_count(), 2);
//! assert_eq!(editor.status().status_line(), "Line: 2/2  Column: 1    Words: 1");
//! ```

use crate::buffer::{Position, TextBuffer};
use crate::event::{BufferEvent, ChangeCallback, ChangeNotification, Subscribers};
use crate::gutter::LineNumberGutter;
use crate::highlight::{BlockHighlighter, HighlightSpan};
use crate::history::{DEFAULT_MAX_UNDO, History, TextEdit};
use crate::line_ending::normalize_line_endings;
use crate::status::StatusReporter;
use std::collections::BTreeSet;
use std::ops::Range;

/// Events collected while one user action is applied.
struct ChangeBatch {
    block_count_before: usize,
    cursor_before: Position,
    lines: BTreeSet<usize>,
}

/// Single-document editing core.
pub struct Editor {
    buffer: TextBuffer,
    cursor: Position,
    /// Selection anchor; the selection spans `anchor..cursor` when set.
    anchor: Option<Position>,
    /// Column kept across vertical moves through shorter blocks.
    preferred_column: Option<usize>,
    history: History,
    highlighter: Box<dyn BlockHighlighter>,
    spans: Vec<Vec<HighlightSpan>>,
    gutter: LineNumberGutter,
    status: StatusReporter,
    version: u64,
    subscribers: Subscribers,
}

impl Editor {
    /// Create an editor over `text` using `highlighter` for every block.
    pub fn new<H>(text: &str, highlighter: H) -> Self
    where
        H: BlockHighlighter + 'static,
    {
        let buffer = TextBuffer::from_text(text);
        let highlighter: Box<dyn BlockHighlighter> = Box::new(highlighter);
        let spans = buffer
            .blocks()
            .map(|block| highlighter.highlight_block(&block))
            .collect();
        let gutter = LineNumberGutter::new(buffer.block_count());
        let status = StatusReporter::new(&buffer);

        Self {
            buffer,
            cursor: Position::default(),
            anchor: None,
            preferred_column: None,
            history: History::new(DEFAULT_MAX_UNDO),
            highlighter,
            spans,
            gutter,
            status,
            version: 0,
            subscribers: Subscribers::default(),
        }
    }

    /// Limit the number of undo steps kept.
    pub fn with_max_undo(mut self, max_undo: usize) -> Self {
        self.history = History::new(max_undo);
        self
    }

    /// Subscribe to change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ChangeNotification) + 'static,
    {
        let callback: ChangeCallback = Box::new(callback);
        self.subscribers.push(callback);
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// The authoritative text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Complete document text (LF line endings).
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.buffer.block_count()
    }

    /// Cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Version counter, incremented by every change that emitted events.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Highlight spans of a block (empty for out-of-range blocks).
    pub fn spans(&self, line: usize) -> &[HighlightSpan] {
        self.spans.get(line).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The line-number gutter.
    pub fn gutter(&self) -> &LineNumberGutter {
        &self.gutter
    }

    /// The status reporter.
    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    /// Ordered selection bounds, if a non-empty selection exists.
    pub fn selection(&self) -> Option<(Position, Position)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    /// Whether a non-empty selection exists.
    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    /// The selected text, if any.
    pub fn selected_text(&self) -> Option<String> {
        let range = self.selection_offsets()?;
        Some(self.buffer.slice(range))
    }

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo stack depth in steps.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Redo stack depth in steps.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Whether the buffer differs from the last load or save.
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Mark the current state as saved.
    pub fn mark_saved(&mut self) {
        self.history.mark_clean();
    }

    /// Close the current undo group so the next typed character starts a new one.
    pub fn end_undo_group(&mut self) {
        self.history.end_group();
    }

    /// Record the visible block range for the gutter (zero-based, inclusive).
    pub fn set_viewport(&mut self, first_visible_block: usize, last_visible_block: usize) {
        self.gutter
            .on_viewport_scroll(first_visible_block, last_visible_block);
    }

    // ---------------------------------------------------------------------
    // Bulk load
    // ---------------------------------------------------------------------

    /// Replace the whole document, clearing history and selection.
    pub fn set_text(&mut self, text: &str) {
        let mut batch = self.begin_batch();
        self.buffer.set_text(text);
        self.spans = self
            .buffer
            .blocks()
            .map(|block| self.highlighter.highlight_block(&block))
            .collect();
        self.gutter.on_block_count_changed(self.buffer.block_count());
        self.status.reset(&self.buffer);

        self.history.clear();
        self.anchor = None;
        self.preferred_column = None;
        self.cursor = Position::default();
        self.status.on_cursor_moved(self.cursor);

        batch.lines.extend(0..self.buffer.block_count());
        tracing::debug!(blocks = self.buffer.block_count(), "buffer replaced");
        self.finish_batch(batch);
    }

    // ---------------------------------------------------------------------
    // Editing
    // ---------------------------------------------------------------------

    /// Insert text at the cursor, replacing the selection.
    pub fn insert_text(&mut self, text: &str) {
        let text = normalize_line_endings(text);
        let coalescible =
            !self.has_selection() && text.chars().count() == 1 && !text.contains('\n');
        let range = self
            .selection_offsets()
            .unwrap_or_else(|| self.cursor_offset()..self.cursor_offset());
        self.replace_range(range, &text, coalescible);
    }

    /// Insert a line break at the cursor.
    pub fn insert_newline(&mut self) {
        self.insert_text("\n");
    }

    /// Paste text at the cursor, replacing the selection. Never coalesces with typing.
    pub fn paste(&mut self, text: &str) {
        self.history.end_group();
        let text = normalize_line_endings(text);
        let range = self
            .selection_offsets()
            .unwrap_or_else(|| self.cursor_offset()..self.cursor_offset());
        self.replace_range(range, &text, false);
    }

    /// Delete the selection or the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(range) = self.selection_offsets() {
            self.replace_range(range, "", false);
            return;
        }
        let offset = self.cursor_offset();
        if offset > 0 {
            self.replace_range(offset - 1..offset, "", false);
        }
    }

    /// Delete the selection or the character after the cursor.
    pub fn delete_forward(&mut self) {
        if let Some(range) = self.selection_offsets() {
            self.replace_range(range, "", false);
            return;
        }
        let offset = self.cursor_offset();
        if offset < self.buffer.char_count() {
            self.replace_range(offset..offset + 1, "", false);
        }
    }

    /// Remove the selection and return its text.
    pub fn cut(&mut self) -> Option<String> {
        let range = self.selection_offsets()?;
        let text = self.buffer.slice(range.clone());
        self.replace_range(range, "", false);
        Some(text)
    }

    /// Select the whole document.
    pub fn select_all(&mut self) {
        let last = self.buffer.block_count() - 1;
        let end = Position::new(last, self.buffer.block_char_len(last));
        self.anchor = Some(Position::default());
        self.move_cursor_to(end, true);
    }

    /// Undo the newest group of edits. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(steps) = self.history.pop_undo_group() else {
            return false;
        };

        let mut batch = self.begin_batch();
        for step in &steps {
            self.apply_edit(&step.edit.inverted(), &mut batch);
        }
        let cursor = steps
            .last()
            .map(|step| step.cursor_before)
            .unwrap_or_default();
        self.history.push_redo_group(steps);
        self.place_cursor_after_edit(cursor);
        self.finish_batch(batch);
        true
    }

    /// Redo the newest undone group. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(steps) = self.history.pop_redo_group() else {
            return false;
        };

        let mut batch = self.begin_batch();
        for step in &steps {
            self.apply_edit(&step.edit, &mut batch);
        }
        let cursor = steps
            .last()
            .map(|step| step.cursor_after)
            .unwrap_or_default();
        self.history.push_undo_group(steps);
        self.place_cursor_after_edit(cursor);
        self.finish_batch(batch);
        true
    }

    // ---------------------------------------------------------------------
    // Cursor movement
    // ---------------------------------------------------------------------

    /// Move the cursor to a position (clamped), optionally extending the selection.
    pub fn move_cursor_to(&mut self, position: Position, selecting: bool) {
        self.preferred_column = None;
        self.set_cursor(position, selecting);
    }

    /// Move one character left, crossing block boundaries.
    pub fn move_left(&mut self, selecting: bool) {
        if !selecting && let Some((start, _)) = self.selection() {
            self.move_cursor_to(start, false);
            return;
        }
        let target = if self.cursor.column > 0 {
            Position::new(self.cursor.line, self.cursor.column - 1)
        } else if self.cursor.line > 0 {
            let line = self.cursor.line - 1;
            Position::new(line, self.buffer.block_char_len(line))
        } else {
            self.cursor
        };
        self.move_cursor_to(target, selecting);
    }

    /// Move one character right, crossing block boundaries.
    pub fn move_right(&mut self, selecting: bool) {
        if !selecting && let Some((_, end)) = self.selection() {
            self.move_cursor_to(end, false);
            return;
        }
        let len = self.buffer.block_char_len(self.cursor.line);
        let target = if self.cursor.column < len {
            Position::new(self.cursor.line, self.cursor.column + 1)
        } else if self.cursor.line + 1 < self.buffer.block_count() {
            Position::new(self.cursor.line + 1, 0)
        } else {
            self.cursor
        };
        self.move_cursor_to(target, selecting);
    }

    /// Move up one block, keeping the preferred column.
    pub fn move_up(&mut self, selecting: bool) {
        self.move_vertically(-1, selecting);
    }

    /// Move down one block, keeping the preferred column.
    pub fn move_down(&mut self, selecting: bool) {
        self.move_vertically(1, selecting);
    }

    /// Move by `delta` blocks (page up/down), keeping the preferred column.
    pub fn move_page(&mut self, delta: isize, selecting: bool) {
        self.move_vertically(delta, selecting);
    }

    /// Move to the start of the current block.
    pub fn move_home(&mut self, selecting: bool) {
        self.move_cursor_to(Position::new(self.cursor.line, 0), selecting);
    }

    /// Move to the end of the current block.
    pub fn move_end(&mut self, selecting: bool) {
        let len = self.buffer.block_char_len(self.cursor.line);
        self.move_cursor_to(Position::new(self.cursor.line, len), selecting);
    }

    /// Move to the start of the document.
    pub fn move_document_start(&mut self, selecting: bool) {
        self.move_cursor_to(Position::default(), selecting);
    }

    /// Move to the end of the document.
    pub fn move_document_end(&mut self, selecting: bool) {
        let last = self.buffer.block_count() - 1;
        let end = Position::new(last, self.buffer.block_char_len(last));
        self.move_cursor_to(end, selecting);
    }

    fn move_vertically(&mut self, delta: isize, selecting: bool) {
        let column = self.preferred_column.unwrap_or(self.cursor.column);
        let last = self.buffer.block_count() - 1;
        let line = self
            .cursor
            .line
            .saturating_add_signed(delta)
            .min(last);
        self.set_cursor(Position::new(line, column), selecting);
        self.preferred_column = Some(column);
    }

    fn set_cursor(&mut self, position: Position, selecting: bool) {
        let position = self.buffer.clamp_position(position);
        let had_selection = self.has_selection();
        if selecting {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        if position == self.cursor {
            // Collapsing a selection without moving still needs a repaint.
            if had_selection && !selecting {
                self.version += 1;
            }
            return;
        }

        self.history.end_group();
        self.cursor = position;
        self.status.on_cursor_moved(position);
        self.version += 1;
        self.subscribers
            .notify(self.version, &[BufferEvent::CursorMoved { position }]);
    }

    // ---------------------------------------------------------------------
    // Edit pipeline
    // ---------------------------------------------------------------------

    fn cursor_offset(&self) -> usize {
        self.buffer.position_to_offset(self.cursor)
    }

    fn selection_offsets(&self) -> Option<Range<usize>> {
        let (start, end) = self.selection()?;
        Some(self.buffer.position_to_offset(start)..self.buffer.position_to_offset(end))
    }

    /// Replace `range` with `text` (already LF-normalized), record it and notify.
    fn replace_range(&mut self, range: Range<usize>, text: &str, coalescible: bool) {
        if range.is_empty() && text.is_empty() {
            return;
        }

        let cursor_before = self.cursor;
        let edit = TextEdit {
            start: range.start,
            deleted_text: self.buffer.slice(range),
            inserted_text: text.to_string(),
        };

        let mut batch = self.begin_batch();
        self.apply_edit(&edit, &mut batch);
        let cursor_after = self
            .buffer
            .offset_to_position(edit.start + edit.inserted_len());
        self.history
            .push(edit, cursor_before, cursor_after, coalescible);
        self.place_cursor_after_edit(cursor_after);
        self.finish_batch(batch);
    }

    fn place_cursor_after_edit(&mut self, position: Position) {
        self.anchor = None;
        self.preferred_column = None;
        self.cursor = self.buffer.clamp_position(position);
        self.status.on_cursor_moved(self.cursor);
    }

    fn begin_batch(&self) -> ChangeBatch {
        ChangeBatch {
            block_count_before: self.buffer.block_count(),
            cursor_before: self.cursor,
            lines: BTreeSet::new(),
        }
    }

    /// Apply one edit to the buffer and bring spans, gutter and word counts up to date.
    fn apply_edit(&mut self, edit: &TextEdit, batch: &mut ChangeBatch) {
        let start = self.buffer.offset_to_position(edit.start);
        let old_end = self
            .buffer
            .offset_to_position(edit.start + edit.deleted_len());

        self.buffer.delete(edit.start, edit.deleted_len());
        self.buffer.insert(edit.start, &edit.inserted_text);

        let new_end = self
            .buffer
            .offset_to_position(edit.start + edit.inserted_len());
        let old_blocks = start.line..old_end.line + 1;
        let new_blocks = start.line..new_end.line + 1;

        let texts: Vec<String> = new_blocks
            .clone()
            .map(|line| self.buffer.block_text(line).unwrap_or_default())
            .collect();
        let highlighted: Vec<Vec<HighlightSpan>> = texts
            .iter()
            .map(|text| self.highlighter.highlight_block(text))
            .collect();
        self.spans.splice(old_blocks.clone(), highlighted);
        self.status
            .on_blocks_replaced(old_blocks, texts.iter().map(String::as_str));
        self.gutter.on_block_count_changed(self.buffer.block_count());

        batch.lines.extend(new_blocks);
    }

    fn finish_batch(&mut self, batch: ChangeBatch) {
        let block_count = self.buffer.block_count();
        let mut events: Vec<BufferEvent> = batch
            .lines
            .into_iter()
            .filter(|line| *line < block_count)
            .map(|line| BufferEvent::BlockContentChanged { line })
            .collect();
        if block_count != batch.block_count_before {
            events.push(BufferEvent::BlockCountChanged { count: block_count });
        }
        if self.cursor != batch.cursor_before {
            events.push(BufferEvent::CursorMoved {
                position: self.cursor,
            });
        }

        self.version += 1;
        self.subscribers.notify(self.version, &events);
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("blocks", &self.buffer.block_count())
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
