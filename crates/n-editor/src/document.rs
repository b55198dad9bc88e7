//! Document: a buffer, its caret, and its undo history.
//!
//! This is the mutable resource keystroke handlers operate on. Every change
//! goes through a [`History`] transaction so that a handler's fix-up (delete
//! here, insert there, move the caret) undoes as one unit.
//!
//! The caret is a char offset in `0..=len_chars()`, always the insert-mode
//! position: it sits *between* chars, so after typing `;` at the end of
//! `foo()` the caret is 6 and the `;` is at offset 5.

use std::ops::Range;

use tracing::trace;

use crate::buffer::Buffer;
use crate::history::History;
use crate::position::Position;

/// A buffer being edited, with its caret and undo history.
#[derive(Debug, Default)]
pub struct Document {
    buffer: Buffer,
    history: History,
    caret: usize,
}

impl Document {
    /// Wrap a buffer. The caret starts at offset 0.
    #[must_use]
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            history: History::new(),
            caret: 0,
        }
    }

    /// Shorthand for `Document::new(Buffer::from_text(text))`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(Buffer::from_text(text))
    }

    /// Builder-style caret placement (clamped to the buffer).
    #[must_use]
    pub fn with_caret(mut self, caret: usize) -> Self {
        self.set_caret(caret);
        self
    }

    // -- Accessors ----------------------------------------------------------

    /// The text being edited.
    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Give up the document, keeping the buffer.
    #[must_use]
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    /// The undo history.
    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Current caret offset.
    #[inline]
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// The caret as a line/column position.
    #[must_use]
    pub fn caret_position(&self) -> Position {
        self.buffer
            .position_of(self.caret)
            .unwrap_or(Position::ZERO)
    }

    /// Move the caret, clamping to `0..=len_chars()`.
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.buffer.len_chars());
    }

    // -- Raw keystrokes -----------------------------------------------------

    /// Insert `ch` at the caret and advance past it, as one undoable step.
    ///
    /// This is the host's default handling of a typed char, applied before
    /// any after-typed handler gets to look at the result.
    pub fn type_char(&mut self, ch: char) {
        let at = self.caret;
        let mut tmp = [0u8; 4];
        let text = ch.encode_utf8(&mut tmp);

        self.begin_edit();
        self.insert(at, text);
        self.caret = at + 1;
        self.commit_edit();
    }

    /// Delete the char before the caret. Returns the deleted char, or `None`
    /// at the start of the buffer.
    pub fn backspace(&mut self) -> Option<char> {
        let at = self.caret.checked_sub(1)?;
        let ch = self.buffer.char_at(at)?;

        self.begin_edit();
        self.delete(at..at + 1);
        self.caret = at;
        self.commit_edit();
        Some(ch)
    }

    // -- Transactions -------------------------------------------------------

    /// Open an undo transaction. Edits until [`commit_edit`](Self::commit_edit)
    /// undo together.
    pub fn begin_edit(&mut self) {
        self.history.begin(self.caret);
    }

    /// Close the open transaction, recording the current caret as the
    /// redo position.
    pub fn commit_edit(&mut self) {
        self.history.commit(self.caret);
    }

    /// Insert `text` at `at` and record it in the open transaction. The
    /// caret is not moved.
    pub fn insert(&mut self, at: usize, text: &str) {
        trace!(at, text, "insert");
        self.buffer.insert(at, text);
        self.history.record_insert(at, text);
    }

    /// Delete `range` and record it in the open transaction. The caret is
    /// not moved, only clamped if it now points past the end.
    pub fn delete(&mut self, range: Range<usize>) {
        let Some(deleted) = self.buffer.slice(range.clone()).map(|s| s.to_string()) else {
            return;
        };
        trace!(?range, "delete");
        self.history.record_delete(range.start, &deleted);
        self.buffer.delete(range);
        self.caret = self.caret.min(self.buffer.len_chars());
    }

    // -- Undo / redo --------------------------------------------------------

    /// Undo the last transaction. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.buffer) {
            Some(caret) => {
                self.set_caret(caret);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone transaction. Returns `false` if there was nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.buffer) {
            Some(caret) => {
                self.set_caret(caret);
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
