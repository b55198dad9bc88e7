//! # n-editor: Editing host for n-punct
//!
//! The buffer side of the keystroke contract:
//!
//! - **[`position`]**: `Position` (line, col), 0-indexed, parsed from 1-indexed `LINE:COL`
//! - **[`buffer`]**: `Buffer` wrapping a rope with char-offset reads, edits, and file I/O
//! - **[`history`]**: transaction-based undo/redo
//! - **[`document`]**: buffer + caret + history; every edit lands in one undoable transaction

pub mod buffer;
pub mod document;
pub mod history;
pub mod position;
