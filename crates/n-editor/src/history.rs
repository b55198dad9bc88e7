//! Undo and redo for a [`Buffer`], one keystroke at a time.
//!
//! Callers bracket their edits with [`History::begin`] and
//! [`History::commit`] and report each insert or delete in between. Undo
//! replays a whole bracket backwards, so a terminator that the engine moved
//! off the caret comes back in one step together with the char that was
//! typed. A bracket that recorded nothing leaves no trace.

use crate::buffer::Buffer;

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// One recorded insert or delete, by char offset.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Insert { at: usize, text: String },

    /// `text` used to start at `at`.
    Delete { at: usize, text: String },
}

impl Edit {
    fn remove(buf: &mut Buffer, at: usize, text: &str) {
        buf.delete(at..at + text.chars().count());
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Edits between one `begin` and its `commit`, with the caret on each side.
#[derive(Debug, Clone)]
struct Transaction {
    edits: Vec<Edit>,
    caret_before: usize,
    caret_after: usize,
}

impl Transaction {
    fn undo(&self, buf: &mut Buffer) {
        for edit in self.edits.iter().rev() {
            match edit {
                Edit::Insert { at, text } => Edit::remove(buf, *at, text),
                Edit::Delete { at, text } => buf.insert(*at, text),
            }
        }
    }

    fn redo(&self, buf: &mut Buffer) {
        for edit in &self.edits {
            match edit {
                Edit::Insert { at, text } => buf.insert(*at, text),
                Edit::Delete { at, text } => Edit::remove(buf, *at, text),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Linear undo history: committing after an undo forgets what was undone.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
    pending: Option<Transaction>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: None,
        }
    }

    /// Open a transaction, closing any that is still open.
    pub fn begin(&mut self, caret: usize) {
        if self.pending.is_some() {
            self.commit(caret);
        }
        self.pending = Some(Transaction {
            edits: Vec::new(),
            caret_before: caret,
            caret_after: caret,
        });
    }

    /// True while a transaction is open.
    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    /// Note an insert already made to the buffer. Ignored outside a transaction.
    pub fn record_insert(&mut self, at: usize, text: &str) {
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Insert {
                at,
                text: text.to_string(),
            });
        }
    }

    /// Note a deletion. `text` must be read from the buffer before it goes.
    pub fn record_delete(&mut self, at: usize, text: &str) {
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Delete {
                at,
                text: text.to_string(),
            });
        }
    }

    /// Close the open transaction with the caret where the edits left it.
    pub fn commit(&mut self, caret: usize) {
        if let Some(mut txn) = self.pending.take() {
            if txn.edits.is_empty() {
                return;
            }
            txn.caret_after = caret;
            self.redo_stack.clear();
            self.undo_stack.push(txn);
        }
    }

    /// Revert the newest transaction and return the caret it started from.
    pub fn undo(&mut self, buf: &mut Buffer) -> Option<usize> {
        if let Some(txn) = self.pending.take() {
            if !txn.edits.is_empty() {
                self.redo_stack.clear();
                self.undo_stack.push(txn);
            }
        }

        let txn = self.undo_stack.pop()?;
        txn.undo(buf);
        let caret = txn.caret_before;
        self.redo_stack.push(txn);
        Some(caret)
    }

    /// Reapply the newest undone transaction and return the caret it ended at.
    pub fn redo(&mut self, buf: &mut Buffer) -> Option<usize> {
        let txn = self.redo_stack.pop()?;
        txn.redo(buf);
        let caret = txn.caret_after;
        self.undo_stack.push(txn);
        Some(caret)
    }

    /// Number of transactions on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of transactions on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Basic undo/redo ----------------------------------------------------

    #[test]
    fn undo_single_insert() {
        let mut buf = Buffer::from_text("foo()");
        let mut h = History::new();

        h.begin(5);
        buf.insert(5, ";");
        h.record_insert(5, ";");
        h.commit(6);

        let caret = h.undo(&mut buf).unwrap();
        assert_eq!(buf.contents(), "foo()");
        assert_eq!(caret, 5);

        let caret = h.redo(&mut buf).unwrap();
        assert_eq!(buf.contents(), "foo();");
        assert_eq!(caret, 6);
    }

    #[test]
    fn undo_single_delete() {
        let mut buf = Buffer::from_text("foo(;)");
        let mut h = History::new();

        h.begin(5);
        h.record_delete(4, ";");
        buf.delete(4..5);
        h.commit(4);
        assert_eq!(buf.contents(), "foo()");

        let caret = h.undo(&mut buf).unwrap();
        assert_eq!(buf.contents(), "foo(;)");
        assert_eq!(caret, 5);
    }

    // -- Multi-edit transactions --------------------------------------------

    #[test]
    fn relocation_undoes_as_one_step() {
        // Delete the typed ';' inside the parens, re-insert it after them.
        let mut buf = Buffer::from_text("foo(a;)");
        let mut h = History::new();

        h.begin(6);
        h.record_delete(5, ";");
        buf.delete(5..6);
        buf.insert(6, ";");
        h.record_insert(6, ";");
        h.commit(7);
        assert_eq!(buf.contents(), "foo(a);");

        let caret = h.undo(&mut buf).unwrap();
        assert_eq!(buf.contents(), "foo(a;)");
        assert_eq!(caret, 6);
        assert_eq!(h.undo_count(), 0);

        h.redo(&mut buf);
        assert_eq!(buf.contents(), "foo(a);");
    }

    #[test]
    fn multichar_text_uses_char_counts() {
        let mut buf = Buffer::from_text("é");
        let mut h = History::new();

        h.begin(1);
        buf.insert(1, "ßü");
        h.record_insert(1, "ßü");
        h.commit(3);

        h.undo(&mut buf);
        assert_eq!(buf.contents(), "é");
    }

    // -- Stack bookkeeping --------------------------------------------------

    #[test]
    fn empty_transaction_not_pushed() {
        let mut h = History::new();
        h.begin(0);
        assert!(h.in_transaction());
        h.commit(0);
        assert!(!h.in_transaction());
        assert_eq!(h.undo_count(), 0);
    }

    #[test]
    fn record_outside_transaction_is_ignored() {
        let mut h = History::new();
        h.record_insert(0, "x");
        h.commit(1);
        assert_eq!(h.undo_count(), 0);
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut buf = Buffer::from_text("");
        let mut h = History::new();

        h.begin(0);
        buf.insert(0, "a");
        h.record_insert(0, "a");
        h.commit(1);
        h.undo(&mut buf);
        assert_eq!(h.redo_count(), 1);

        h.begin(0);
        buf.insert(0, "b");
        h.record_insert(0, "b");
        h.commit(1);
        assert_eq!(h.redo_count(), 0);
    }

    #[test]
    fn undo_auto_commits_pending() {
        let mut buf = Buffer::from_text("");
        let mut h = History::new();

        h.begin(0);
        buf.insert(0, ";");
        h.record_insert(0, ";");

        assert_eq!(h.undo(&mut buf), Some(0));
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn undo_and_redo_nothing() {
        let mut buf = Buffer::from_text("x");
        let mut h = History::new();
        assert_eq!(h.undo(&mut buf), None);
        assert_eq!(h.redo(&mut buf), None);
    }
}
