//! # n-punct: Auto-punctuation for statement languages
//!
//! Decides where a typed statement terminator really belongs, without a
//! parse tree:
//!
//! - **[`lexer`]**: code / comment / string classification with a four-state scanner
//! - **[`terminator`]**: the placement policy for a just-typed `;`
//! - **[`plan`]**: pure edit descriptors, applied in one transaction
//! - **[`session`]**: the editing capability handlers run against
//! - **[`quote`]**: quote pairing and empty-pair backspace
//! - **[`language`]**: which files the engine runs on
//! - **[`options`]**: `:set`-style configuration
//! - **[`handler`]**: host callbacks tying it all together
//!
//! Nothing is carried between keystrokes: every call scans from a line start
//! and returns after one atomic edit (or none).

pub mod handler;
pub mod language;
pub mod lexer;
pub mod options;
pub mod plan;
pub mod quote;
pub mod session;
pub mod terminator;

pub use handler::{Handled, Punctuator};
pub use options::{OptionError, PunctOptions};
