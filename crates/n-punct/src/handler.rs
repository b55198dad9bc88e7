//! Keystroke entry points.
//!
//! A host calls these around its own handling of a typed or deleted char:
//!
//! 1. [`before_char_typed`](Punctuator::before_char_typed): may consume the
//!    keystroke (quote pairing). On [`Handled::Stop`] the host does not insert.
//! 2. The host inserts the char and advances the caret.
//! 3. [`char_typed`](Punctuator::char_typed): may fix up what was just
//!    inserted (terminator placement).
//!
//! and, for backspace, [`before_char_deleted`](Punctuator::before_char_deleted)
//! before the host deletes the char.
//!
//! [`type_char`](Punctuator::type_char) and [`backspace`](Punctuator::backspace)
//! run the whole sequence against a [`Document`].

use std::path::Path;

use n_editor::document::Document;
use tracing::debug;

use crate::language::Language;
use crate::options::PunctOptions;
use crate::quote;
use crate::session::EditSession;
use crate::terminator::place_terminator;

/// Whether later handlers (and the host's default action) should still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Continue,
    Stop,
}

/// The engine, configured for one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Punctuator {
    options: PunctOptions,
    language: Option<Language>,
}

impl Punctuator {
    /// An engine for a buffer of `language`, or an inert one for `None`.
    #[must_use]
    pub const fn new(language: Option<Language>, options: PunctOptions) -> Self {
        Self { options, language }
    }

    /// An engine for the file at `path`, by extension.
    #[must_use]
    pub fn for_path(path: &Path, options: PunctOptions) -> Self {
        Self::new(Language::detect(path), options)
    }

    #[must_use]
    pub const fn options(&self) -> &PunctOptions {
        &self.options
    }

    pub const fn options_mut(&mut self) -> &mut PunctOptions {
        &mut self.options
    }

    #[must_use]
    pub const fn language(&self) -> Option<Language> {
        self.language
    }

    // -- Host callbacks -----------------------------------------------------

    /// `ch` was just inserted before the caret.
    pub fn char_typed<S: EditSession + ?Sized>(&self, session: &mut S, ch: char) -> Handled {
        let Some(language) = self.language else {
            return Handled::Continue;
        };
        if !self.options.smart_terminator || ch != language.terminator() {
            return Handled::Continue;
        }

        let placement = place_terminator(session.buffer(), session.caret(), self.options.lookahead);
        debug!(
            language = language.name(),
            decision = ?placement.decision,
            "terminator typed"
        );
        placement.plan.apply(session);

        if placement.decision.passes_through() {
            Handled::Continue
        } else {
            Handled::Stop
        }
    }

    /// `ch` is about to be inserted at the caret.
    pub fn before_char_typed<S: EditSession + ?Sized>(&self, session: &mut S, ch: char) -> Handled {
        if self.language.is_none() || !self.options.auto_quotes {
            return Handled::Continue;
        }
        match quote::plan_quote_typed(session.buffer(), session.caret(), ch) {
            Some(plan) => {
                debug!(quote = %ch, "quote typed");
                plan.apply(session);
                Handled::Stop
            }
            None => Handled::Continue,
        }
    }

    /// `ch`, the char before the caret, is about to be deleted by backspace.
    pub fn before_char_deleted<S: EditSession + ?Sized>(&self, session: &mut S, ch: char) {
        if self.language.is_none() || !self.options.auto_quotes {
            return;
        }
        if let Some(plan) = quote::plan_quote_deleted(session.buffer(), session.caret(), ch) {
            debug!(quote = %ch, "closing quote removed with its pair");
            plan.apply(session);
        }
    }

    // -- Whole keystrokes ---------------------------------------------------

    /// Type `ch` into `doc` at its caret, running every callback in order.
    pub fn type_char(&self, doc: &mut Document, ch: char) -> Handled {
        if self.before_char_typed(doc, ch) == Handled::Stop {
            return Handled::Stop;
        }
        doc.type_char(ch);
        self.char_typed(doc, ch)
    }

    /// Backspace in `doc`. Returns the char the host deleted, if any.
    pub fn backspace(&self, doc: &mut Document) -> Option<char> {
        let before = doc.caret().checked_sub(1)?;
        let ch = doc.buffer().char_at(before)?;
        self.before_char_deleted(doc, ch);
        doc.backspace()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
