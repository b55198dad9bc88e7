//! Line/column positions.
//!
//! The engine and the buffer work in absolute char offsets. `Position` is the
//! human-facing view of an offset: 0-indexed internally, rendered 1-indexed
//! (`line:col`) for status messages and command-line arguments.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line, **not** a byte offset.
///
/// # Ordering
///
/// Positions are ordered lexicographically: line first, then column.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin: line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display, matching Vim's `line:col` status.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Why a `line:col` string failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParsePositionError {
    #[error("expected LINE:COL")]
    MissingColon,
    #[error("line and column must be numbers")]
    NotANumber,
    /// The textual form is 1-indexed.
    #[error("line and column start at 1")]
    Zero,
}

/// Parses the 1-indexed `line:col` form produced by `Display`.
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (line, col) = s.trim().split_once(':').ok_or(ParsePositionError::MissingColon)?;
        let line: usize = line.parse().map_err(|_| ParsePositionError::NotANumber)?;
        let col: usize = col.parse().map_err(|_| ParsePositionError::NotANumber)?;
        if line == 0 || col == 0 {
            return Err(ParsePositionError::Zero);
        }
        Ok(Self::new(line - 1, col - 1))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
