//! Edit descriptors and their single application point.
//!
//! Policies compute an [`EditPlan`] from an immutable buffer and never touch
//! the buffer themselves. The plan is applied here, in one place, inside one
//! session transaction. Offset bookkeeping for "delete, then insert further
//! right" is resolved by the policy before the plan is built: `insert.at` is
//! always in post-delete coordinates.

use std::ops::Range;

use tracing::trace;

use crate::session::EditSession;

/// Text to insert, at an offset measured after the plan's deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub at: usize,
    pub text: String,
}

/// One atomic edit: an optional deletion, an optional insertion, and where
/// the caret ends up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    pub delete: Option<Range<usize>>,
    pub insert: Option<Insertion>,
    pub caret: Option<usize>,
}

impl EditPlan {
    /// Leave the buffer and caret alone.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            delete: None,
            insert: None,
            caret: None,
        }
    }

    /// Delete the single char at `at` and leave the caret where it was.
    #[must_use]
    pub const fn delete_char(at: usize) -> Self {
        Self {
            delete: Some(at..at + 1),
            insert: None,
            caret: Some(at),
        }
    }

    /// Optionally delete one char at `from`, then insert `ch` at `to`
    /// (post-delete coordinates) and put the caret right after it.
    #[must_use]
    pub fn relocate(from: Option<usize>, to: usize, ch: char) -> Self {
        Self {
            delete: from.map(|at| at..at + 1),
            insert: Some(Insertion {
                at: to,
                text: ch.to_string(),
            }),
            caret: Some(to + 1),
        }
    }

    /// Insert `text` at `at` and move the caret to `caret`.
    #[must_use]
    pub fn insert(at: usize, text: &str, caret: usize) -> Self {
        Self {
            delete: None,
            insert: Some(Insertion {
                at,
                text: text.to_string(),
            }),
            caret: Some(caret),
        }
    }

    /// Only move the caret.
    #[must_use]
    pub const fn move_caret(to: usize) -> Self {
        Self {
            delete: None,
            insert: None,
            caret: Some(to),
        }
    }

    /// True when applying the plan changes nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.delete.is_none() && self.insert.is_none() && self.caret.is_none()
    }

    /// True when the plan changes buffer text.
    #[must_use]
    pub const fn edits_text(&self) -> bool {
        self.delete.is_some() || self.insert.is_some()
    }

    /// Apply the plan as one transaction: delete, insert, then place the
    /// caret. Offsets are clamped against the live buffer, so a stale plan
    /// degrades to a shorter edit instead of a panic.
    pub fn apply<S: EditSession + ?Sized>(&self, session: &mut S) {
        if self.is_noop() {
            return;
        }
        trace!(plan = ?self, "applying edit plan");

        session.begin();
        if let Some(range) = &self.delete {
            let len = session.buffer().len_chars();
            let range = range.start.min(len)..range.end.min(len);
            if !range.is_empty() {
                session.delete(range);
            }
        }
        if let Some(insertion) = &self.insert {
            let at = insertion.at.min(session.buffer().len_chars());
            session.insert(at, &insertion.text);
        }
        if let Some(caret) = self.caret {
            session.set_caret(caret.min(session.buffer().len_chars()));
        }
        session.commit();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
