//! Linear undo/redo history.
//!
//! Every edit is recorded as the exact text it removed and inserted at a character offset.
//! Consecutive typed inserts share a group id and are undone together.

use crate::buffer::Position;

/// Default maximum number of undo steps kept.
pub const DEFAULT_MAX_UNDO: usize = 1000;

/// One recorded text replacement (character offsets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Start character offset, identical before and after the edit.
    pub start: usize,
    /// Exact removed text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// The edit that reverts this one.
    pub fn inverted(&self) -> Self {
        Self {
            start: self.start,
            deleted_text: self.inserted_text.clone(),
            inserted_text: self.deleted_text.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UndoStep {
    pub(crate) group_id: usize,
    pub(crate) edit: TextEdit,
    pub(crate) cursor_before: Position,
    pub(crate) cursor_after: Position,
}

#[derive(Debug)]
pub(crate) struct History {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    max_undo: usize,
    /// Saved position in the linear history, as an `undo_stack.len()`.
    /// `None` once the saved state is unreachable.
    clean_index: Option<usize>,
    next_group_id: usize,
    open_group_id: Option<usize>,
}

impl History {
    pub(crate) fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
            clean_index: Some(0),
            next_group_id: 0,
            open_group_id: None,
        }
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    pub(crate) fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
        self.end_group();
    }

    pub(crate) fn end_group(&mut self) {
        self.open_group_id = None;
    }

    /// Drop all history (bulk load).
    pub(crate) fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = Some(0);
        self.open_group_id = None;
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        // A clean point inside the redo area is unreachable once redo is dropped.
        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }

        self.redo_stack.clear();
    }

    pub(crate) fn push(
        &mut self,
        edit: TextEdit,
        cursor_before: Position,
        cursor_after: Position,
        coalescible_insert: bool,
    ) {
        self.clear_redo_and_adjust_clean();

        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(clean_index) => Some(clean_index - 1),
            };
        }

        let reuse_open_group = coalescible_insert && self.clean_index != Some(self.undo_stack.len());
        let group_id = match self.open_group_id {
            Some(open) if reuse_open_group => open,
            _ => {
                let id = self.next_group_id;
                self.next_group_id = self.next_group_id.wrapping_add(1);
                id
            }
        };

        self.open_group_id = coalescible_insert.then_some(group_id);
        self.undo_stack.push(UndoStep {
            group_id,
            edit,
            cursor_before,
            cursor_after,
        });
    }

    /// Pop the newest group, newest step first.
    pub(crate) fn pop_undo_group(&mut self) -> Option<Vec<UndoStep>> {
        self.end_group();
        let group_id = self.undo_stack.last()?.group_id;
        let mut steps = Vec::new();
        while self
            .undo_stack
            .last()
            .is_some_and(|step| step.group_id == group_id)
        {
            steps.extend(self.undo_stack.pop());
        }
        Some(steps)
    }

    /// Pop the newest redo group, oldest step first.
    pub(crate) fn pop_redo_group(&mut self) -> Option<Vec<UndoStep>> {
        self.end_group();
        let group_id = self.redo_stack.last()?.group_id;
        let mut steps = Vec::new();
        while self
            .redo_stack
            .last()
            .is_some_and(|step| step.group_id == group_id)
        {
            steps.extend(self.redo_stack.pop());
        }
        Some(steps)
    }

    /// Steps are given newest first, as returned by [`pop_undo_group`](Self::pop_undo_group).
    pub(crate) fn push_redo_group(&mut self, steps: Vec<UndoStep>) {
        self.redo_stack.extend(steps);
    }

    /// Steps are given oldest first, as returned by [`pop_redo_group`](Self::pop_redo_group).
    pub(crate) fn push_undo_group(&mut self, steps: Vec<UndoStep>) {
        self.undo_stack.extend(steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(start: usize, text: &str) -> TextEdit {
        TextEdit {
            start,
            deleted_text: String::new(),
            inserted_text: text.to_string(),
        }
    }

    #[test]
    fn test_typed_inserts_coalesce() {
        let mut history = History::new(DEFAULT_MAX_UNDO);
        let p = Position::default();
        history.push(insert(0, "a"), p, p, true);
        history.push(insert(1, "b"), p, p, true);
        history.end_group();
        history.push(insert(2, "c"), p, p, true);

        assert_eq!(history.pop_undo_group().map(|g| g.len()), Some(1));
        let group = history.pop_undo_group().unwrap_or_default();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].edit.inserted_text, "b");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clean_tracking() {
        let mut history = History::new(DEFAULT_MAX_UNDO);
        let p = Position::default();
        assert!(history.is_clean());
        history.push(insert(0, "a"), p, p, false);
        assert!(!history.is_clean());
        history.mark_clean();
        assert!(history.is_clean());

        let group = history.pop_undo_group().unwrap_or_default();
        history.push_redo_group(group);
        assert!(!history.is_clean());

        // A new edit drops redo, so the saved state becomes unreachable.
        history.push(insert(0, "z"), p, p, false);
        assert!(!history.can_redo());
        assert!(!history.is_clean());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(2);
        let p = Position::default();
        for i in 0..3 {
            history.push(insert(i, "x"), p, p, false);
        }
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_inverted_edit() {
        let edit = TextEdit {
            start: 3,
            deleted_text: "ab".to_string(),
            inserted_text: "xyz".to_string(),
        };
        let inverse = edit.inverted();
        assert_eq!(inverse.deleted_len(), 3);
        assert_eq!(inverse.inserted_len(), 2);
        assert_eq!(inverse.start, 3);
    }
}
