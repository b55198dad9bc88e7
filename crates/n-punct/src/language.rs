//! Language detection: which buffers the engine runs on.

use std::path::Path;

/// A statement language the engine knows how to punctuate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Solidity,
}

impl Language {
    /// Detect the language from a file path's extension, ignoring case.
    ///
    /// Returns `None` for anything the engine should leave alone.
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.eq_ignore_ascii_case("sol").then_some(Self::Solidity)
    }

    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Solidity => "solidity",
        }
    }

    /// The char that ends a statement.
    #[must_use]
    pub const fn terminator(self) -> char {
        match self {
            Self::Solidity => crate::terminator::TERMINATOR,
        }
    }
}
