//! Quote pairing.
//!
//! Typing a quote inserts the closing one too, or steps over a closing quote
//! that is already there. Backspacing the opening quote of an empty pair
//! takes the closing one with it.

use n_editor::buffer::Buffer;

use crate::plan::EditPlan;

/// True for the chars that open and close string literals.
#[inline]
#[must_use]
pub const fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'')
}

/// What to do instead of inserting `quote` at `caret`.
///
/// Returns `None` when `quote` isn't a quote char and the host should insert
/// it normally.
#[must_use]
pub fn plan_quote_typed(buf: &Buffer, caret: usize, quote: char) -> Option<EditPlan> {
    if !is_quote(quote) {
        return None;
    }
    let caret = caret.min(buf.len_chars());
    if buf.char_at(caret) == Some(quote) {
        return Some(EditPlan::move_caret(caret + 1));
    }
    let mut pair = String::with_capacity(2);
    pair.push(quote);
    pair.push(quote);
    Some(EditPlan::insert(caret, &pair, caret + 1))
}

/// Extra deletion to make before the host backspaces `deleted`, the char
/// just before `caret`.
///
/// Only an empty pair is collapsed: the char at the caret must be the same
/// quote. Returns `None` when there is nothing extra to delete.
#[must_use]
pub fn plan_quote_deleted(buf: &Buffer, caret: usize, deleted: char) -> Option<EditPlan> {
    if !is_quote(deleted) || caret == 0 || buf.char_at(caret) != Some(deleted) {
        return None;
    }
    Some(EditPlan {
        delete: Some(caret..caret + 1),
        insert: None,
        caret: Some(caret),
    })
}
