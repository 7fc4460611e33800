#![warn(missing_docs)]
//! Pythonico Core - headless editing core for the Pythonico editor
//!
//! # Overview
//!
//! `pythonico-core` owns the document of a single-window editor and everything derived from it.
//! It does no rendering: a host shell feeds it edits and cursor moves, and paints from the
//! derived state it exposes.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (edit pipeline + notifications)     │  ← Public API
//! ├──────────────┬──────────────┬───────────────┤
//! │  Highlight   │  Gutter      │  Status       │  ← Derived state
//! ├──────────────┴──────────────┴───────────────┤
//! │  Undo/Redo History                          │
//! ├─────────────────────────────────────────────┤
//! │  Text Buffer (Rope-based, LF-only blocks)   │  ← Authoritative text
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - rope-backed text buffer addressed by blocks
//! - [`line_ending`] - CRLF/CR normalization
//! - [`highlight`] - the per-block highlighting interface
//! - [`gutter`] - line-number gutter
//! - [`status`] - cursor and word-count status
//! - [`history`] - undo/redo records
//! - [`event`] - change notifications
//! - [`document`] - whole-file load/save
//! - [`editor`] - the composition root

pub mod buffer;
pub mod document;
pub mod editor;
pub mod event;
pub mod gutter;
pub mod highlight;
pub mod history;
pub mod line_ending;
pub mod status;

pub use buffer::{Position, TextBuffer};
pub use document::{DocumentError, LoadedDocument, load_document, save_document};
pub use editor::Editor;
pub use event::{BufferEvent, ChangeCallback, ChangeNotification};
pub use gutter::{LineNumberGutter, digit_count};
pub use highlight::{BlockHighlighter, HighlightSpan, PlainText, StyleId, style_at};
pub use history::TextEdit;
pub use line_ending::{LineEnding, normalize_line_endings};
pub use status::{StatusReporter, count_words};
