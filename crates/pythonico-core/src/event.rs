//! Buffer change notifications.
//!
//! The [`Editor`](crate::Editor) emits one or more [`BufferEvent`]s per edit or cursor move.
//! Events are delivered only after the editor's derived state (spans, gutter and status) has
//! been brought up to date, so a subscriber never observes a gutter that disagrees with the
//! buffer.

use crate::buffer::Position;

/// A change to the text buffer or cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    /// The number of blocks changed.
    BlockCountChanged {
        /// New block count (at least 1).
        count: usize,
    },
    /// The text of a block changed (zero-based index, valid after the edit).
    BlockContentChanged {
        /// Zero-based block index.
        line: usize,
    },
    /// The cursor moved.
    CursorMoved {
        /// New cursor position.
        position: Position,
    },
}

/// Event envelope delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotification {
    /// The event.
    pub event: BufferEvent,
    /// Editor version after the change that produced this event.
    pub version: u64,
}

/// Change callback function type.
pub type ChangeCallback = Box<dyn FnMut(&ChangeNotification)>;

/// Ordered list of subscribers.
#[derive(Default)]
pub(crate) struct Subscribers {
    callbacks: Vec<ChangeCallback>,
}

impl Subscribers {
    pub(crate) fn push(&mut self, callback: ChangeCallback) {
        self.callbacks.push(callback);
    }

    pub(crate) fn notify(&mut self, version: u64, events: &[BufferEvent]) {
        for event in events {
            let notification = ChangeNotification {
                event: *event,
                version,
            };
            for callback in &mut self.callbacks {
                callback(&notification);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
