//! Smart statement-terminator placement.
//!
//! A typed `;` does not always belong where the caret was. Typed inside
//! `foo(a|)` it belongs after the `)`, and typed where the line already ends
//! in `;` it is a duplicate. This module decides, for one keystroke, what the
//! single corrective edit is.
//!
//! # Decision order
//!
//! 1. If the typed `;` landed inside a string, continue the search after the
//!    string's closing quote on the same line (or from the caret when the
//!    string doesn't close on this line).
//! 2. Look for a landmark: the first `)` reachable through whitespace,
//!    comments and strings only. Its line is the target line; without one,
//!    the target line is the line the search started on.
//! 3. The insertion point is the end of the target line's code: before any
//!    trailing `//` comment, with trailing whitespace trimmed.
//! 4. Typed `;` already at the insertion point: done (unless it doubles a
//!    `;` right before it on the same line, which makes it a duplicate).
//! 5. A `;` already between the landmark and the insertion point, or
//! 6. the next line starting with `;`: the statement is closed. The typed
//!    char is only dropped when it sits in code on an earlier line.
//! 7. The code before the insertion point already ends with a different `;`:
//!    the typed char is a duplicate and is dropped.
//! 8. Otherwise the typed `;` moves to the insertion point.
//!
//! Every outcome is a pure [`Placement`]; nothing here mutates the buffer.

use n_editor::buffer::Buffer;
use tracing::debug;

use crate::lexer::{self, LexState};
use crate::plan::EditPlan;

/// The statement terminator this engine places.
pub const TERMINATOR: char = ';';

/// Default landmark search window, in chars.
pub const DEFAULT_LOOKAHEAD: usize = 4000;

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Which rule decided the outcome of a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The typed terminator is already where it belongs.
    AlreadyPlaced,
    /// The target line already has a terminator after the landmark.
    StatementClosed,
    /// The line after the target line starts with a terminator.
    ClosedByNextLine,
    /// The code before the insertion point already ends with a terminator.
    Duplicate,
    /// The terminator moves (or is inserted) at `to`, in post-edit offsets.
    Relocated { from: Option<usize>, to: usize },
}

impl Decision {
    /// True when the decision leaves other typed-char handlers free to run.
    ///
    /// A closed statement is not this engine's business beyond dropping a
    /// stray char left on an earlier line; everything else is fully handled
    /// here.
    #[must_use]
    pub const fn passes_through(self) -> bool {
        matches!(self, Self::StatementClosed | Self::ClosedByNextLine)
    }
}

/// What to do about one typed terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub decision: Decision,
    pub plan: EditPlan,
}

impl Placement {
    const fn keep(decision: Decision) -> Self {
        Self {
            decision,
            plan: EditPlan::none(),
        }
    }

    /// Drop the typed char (if it's really there) because `decision` says the
    /// statement doesn't need it.
    fn drop_typed(buf: &Buffer, typed: Option<usize>, decision: Decision) -> Self {
        let plan = typed
            .filter(|&t| buf.char_at(t) == Some(TERMINATOR))
            .map_or_else(EditPlan::none, EditPlan::delete_char);
        Self { decision, plan }
    }

    /// The statement already ends on `target_line`. A typed char in plain
    /// code on an earlier line is left over from closing it there and is
    /// dropped. Anywhere else (inside a string, or on the target line itself,
    /// as in a `for (...)` header) it is the user's and stays.
    fn closed(
        buf: &Buffer,
        typed: Option<usize>,
        target_line: usize,
        decision: Decision,
    ) -> Self {
        let stray = typed.filter(|&t| {
            let line = buf.line_of_offset(t);
            line != target_line
                && buf.char_at(t) == Some(TERMINATOR)
                && lexer::classify_at(buf, buf.line_start(line), t).is_normal()
        });
        match stray {
            Some(t) => Self {
                decision,
                plan: EditPlan::delete_char(t),
            },
            None => Self::keep(decision),
        }
    }
}

// ---------------------------------------------------------------------------
// Target line
// ---------------------------------------------------------------------------

/// Where the statement ends, as found by steps 1–3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Target {
    line: usize,
    line_start: usize,
    /// Start of a trailing line comment, or the line end.
    hard_end: usize,
    /// Just after the last non-whitespace char before `hard_end`.
    insert_at: usize,
    /// Where the "already terminated" search starts.
    boundary: usize,
}

/// Step 1: where the landmark search starts. Normally the caret; if the typed
/// char sits inside a string, just past that string's closing quote.
fn scan_start(buf: &Buffer, caret: usize) -> usize {
    let line_start = buf.line_start(buf.line_of_offset(caret));
    if caret <= line_start {
        return caret;
    }
    match lexer::classify_at(buf, line_start, caret) {
        LexState::InString(quote) => {
            lexer::find_string_exit_on_same_line(buf, caret - 1, quote, line_start)
                .unwrap_or(caret)
        }
        _ => caret,
    }
}

/// Steps 2–3.
fn locate_target(buf: &Buffer, scan_start: usize, lookahead: usize) -> Target {
    let landmark = lexer::find_next_unguarded_close_paren(buf, scan_start, lookahead);
    let (anchor, boundary) = landmark.map_or((scan_start, scan_start), |cp| (cp, cp + 1));

    let line = buf.line_of_offset(anchor);
    let line_start = buf.line_start(line);
    let line_end = buf.line_end(line);
    let hard_end = lexer::line_comment_start(buf, line_start, line_end).unwrap_or(line_end);

    let mut insert_at = hard_end;
    while insert_at > line_start
        && buf
            .char_at(insert_at - 1)
            .is_some_and(|c| c.is_whitespace() && c != '\n')
    {
        insert_at -= 1;
    }

    Target {
        line,
        line_start,
        hard_end,
        insert_at,
        boundary,
    }
}

/// Nearest non-whitespace char strictly before `before`, not looking below
/// `floor`.
fn prev_non_ws(buf: &Buffer, before: usize, floor: usize) -> Option<usize> {
    (floor..before.min(buf.len_chars()))
        .rev()
        .find(|&i| buf.char_at(i).is_some_and(|c| !c.is_whitespace()))
}

/// True if the line after `line` starts (after indentation) with a terminator.
fn next_line_starts_with_terminator(buf: &Buffer, line: usize) -> bool {
    let next = line + 1;
    if next >= buf.line_count() {
        return false;
    }
    (buf.line_start(next)..buf.line_end(next))
        .filter_map(|i| buf.char_at(i))
        .find(|c| !c.is_whitespace())
        == Some(TERMINATOR)
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Decide what to do about a terminator just typed before `caret`.
///
/// `caret` is the offset right after the typed char (so the char itself is
/// at `caret - 1`); it is clamped to the buffer. `lookahead` bounds the
/// landmark search.
#[must_use]
pub fn place_terminator(buf: &Buffer, caret: usize, lookahead: usize) -> Placement {
    let caret = caret.min(buf.len_chars());
    let typed = caret.checked_sub(1);

    let start = scan_start(buf, caret);
    let target = locate_target(buf, start, lookahead);
    debug!(caret, scan_start = start, ?target, "terminator target");

    let typed_is_terminator = typed.is_some_and(|t| buf.char_at(t) == Some(TERMINATOR));

    // Step 4: already in place.
    if let Some(t) = typed {
        if t + 1 == target.insert_at
            && (target.line_start..target.hard_end).contains(&t)
            && typed_is_terminator
        {
            let doubled = prev_non_ws(buf, t, target.line_start)
                .is_some_and(|p| buf.char_at(p) == Some(TERMINATOR));
            if doubled {
                debug!(typed = t, "typed terminator doubles the one before it");
                return Placement::drop_typed(buf, typed, Decision::Duplicate);
            }
            debug!(typed = t, "terminator already placed");
            return Placement::keep(Decision::AlreadyPlaced);
        }
    }

    // Step 5: the target line is already terminated.
    if lexer::contains_terminator_before_boundary(
        buf,
        target.boundary,
        target.hard_end,
        TERMINATOR,
    ) {
        debug!(boundary = target.boundary, "statement already closed");
        return Placement::closed(buf, typed, target.line, Decision::StatementClosed);
    }

    // Step 6: the next line closes it.
    if next_line_starts_with_terminator(buf, target.line) {
        debug!(line = target.line + 1, "next line closes the statement");
        return Placement::closed(buf, typed, target.line, Decision::ClosedByNextLine);
    }

    // Step 7: a pre-existing terminator already ends the code.
    if let Some(prev) = prev_non_ws(buf, target.insert_at, 0) {
        if buf.char_at(prev) == Some(TERMINATOR) && Some(prev) != typed {
            debug!(existing = prev, "typed terminator is a duplicate");
            return Placement::drop_typed(buf, typed, Decision::Duplicate);
        }
    }

    // Step 8: move or insert.
    if typed.is_some() && typed == target.insert_at.checked_sub(1) {
        return Placement::keep(Decision::AlreadyPlaced);
    }
    let from = typed.filter(|_| typed_is_terminator);
    let to = match from {
        Some(t) if t < target.insert_at => target.insert_at - 1,
        _ => target.insert_at,
    };
    debug!(?from, to, "relocating terminator");
    Placement {
        decision: Decision::Relocated { from, to },
        plan: EditPlan::relocate(from, to, TERMINATOR),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
