//! The editing capability handlers are given.
//!
//! Handlers never see the host's window, file or undo machinery. They get an
//! [`EditSession`]: a read-only view of the buffer and caret, plus primitive
//! writes that the host groups into one atomic, undoable transaction between
//! [`begin`](EditSession::begin) and [`commit`](EditSession::commit).

use std::ops::Range;

use n_editor::buffer::Buffer;
use n_editor::document::Document;

/// Primitive buffer access for one keystroke.
///
/// Offsets are char offsets. Writes are only issued between `begin` and
/// `commit`, and offsets passed to them are already clamped to the buffer.
pub trait EditSession {
    /// Snapshot of the text as of the last write.
    fn buffer(&self) -> &Buffer;

    /// Current caret offset.
    fn caret(&self) -> usize;

    /// Open the transaction.
    fn begin(&mut self);

    /// Insert `text` at `at`.
    fn insert(&mut self, at: usize, text: &str);

    /// Delete the half-open `range`.
    fn delete(&mut self, range: Range<usize>);

    /// Move the caret.
    fn set_caret(&mut self, offset: usize);

    /// Close the transaction.
    fn commit(&mut self);
}

impl EditSession for Document {
    fn buffer(&self) -> &Buffer {
        Document::buffer(self)
    }

    fn caret(&self) -> usize {
        Document::caret(self)
    }

    fn begin(&mut self) {
        self.begin_edit();
    }

    fn insert(&mut self, at: usize, text: &str) {
        Document::insert(self, at, text);
    }

    fn delete(&mut self, range: Range<usize>) {
        Document::delete(self, range);
    }

    fn set_caret(&mut self, offset: usize) {
        Document::set_caret(self, offset);
    }

    fn commit(&mut self) {
        self.commit_edit();
    }
}
