//! Text buffer: the fundamental unit of text storage.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes the primitives an editing
//! host hands to keystroke handlers: random-access char reads by absolute
//! offset, line lookups, and insert/delete by offset.
//!
//! # Design choices
//!
//! - **Offsets are char indices**, not byte offsets. Offset 3 of `"café"` is
//!   `'é'`. Byte offsets never leak into the public API.
//!
//! - **`line_end` excludes the line terminator.** `\n`, `\r\n` and a lone
//!   `\r` all end a line; the end offset of a line points at its first
//!   terminator char (or at the end of the buffer for the last line).
//!
//! - **Reads never panic.** Lookups past the end return `None` or clamp to the
//!   last line. Writes are the one place an out-of-range offset is a caller
//!   bug, and they panic loudly so the bug surfaces in tests.

use std::fmt;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

use crate::position::Position;

/// A text buffer backed by a rope.
///
/// Each open file (or scratch buffer) gets its own `Buffer`. The buffer
/// tracks the text, the file path (if any) and whether the content changed
/// since it was loaded or saved.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with no file path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
            modified: false,
        }
    }

    /// Create a buffer from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            modified: false,
        }
    }

    /// Load a buffer from a file. The buffer starts unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
            modified: false,
        })
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope.
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Total number of lines. An empty buffer has 1 line (the empty line).
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The char at `offset`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.rope.len_chars()).then(|| self.rope.char(offset))
    }

    /// Borrow the text in `range`. Returns `None` if the range is inverted or
    /// reaches past the end.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Option<RopeSlice<'_>> {
        if range.start > range.end || range.end > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.slice(range))
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Line lookups -------------------------------------------------------

    /// The 0-indexed line containing `offset`. Offsets past the end clamp to
    /// the last line.
    #[must_use]
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// Offset of the first char of `line`. Lines past the end clamp to the
    /// last line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_char(self.clamp_line(line))
    }

    /// Offset just past the last content char of `line`, i.e. the offset of
    /// its line terminator. Lines past the end clamp to the last line.
    #[must_use]
    pub fn line_end(&self, line: usize) -> usize {
        let line = self.clamp_line(line);
        self.rope.line_to_char(line) + content_len(self.rope.line(line))
    }

    /// Number of chars in `line` excluding its terminator, or `None` if the
    /// line doesn't exist.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| content_len(self.rope.line(line)))
    }

    fn clamp_line(&self, line: usize) -> usize {
        line.min(self.rope.len_lines() - 1)
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a `Position` to an absolute offset.
    ///
    /// Returns `None` if the line is out of bounds or the column reaches past
    /// the line's content (a column equal to the content length is valid: the
    /// insert-mode position after the last char).
    #[must_use]
    pub fn offset_of(&self, pos: Position) -> Option<usize> {
        let len = self.line_content_len(pos.line)?;
        (pos.col <= len).then(|| self.rope.line_to_char(pos.line) + pos.col)
    }

    /// Convert an absolute offset to a `Position`. Returns `None` past the
    /// end; `len_chars()` itself is valid.
    #[must_use]
    pub fn position_of(&self, offset: usize) -> Option<Position> {
        if offset > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(offset);
        Some(Position::new(line, offset - self.rope.line_to_char(line)))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert text at `offset`. Everything at or after `offset` shifts right
    /// by the char length of `text`.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len_chars()`.
    pub fn insert(&mut self, offset: usize, text: &str) {
        assert!(
            offset <= self.rope.len_chars(),
            "insert offset {offset} out of bounds"
        );
        self.rope.insert(offset, text);
        self.modified = true;
    }

    /// Delete the half-open `range`. An empty range is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or reaches past the end.
    pub fn delete(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        assert!(
            range.end <= self.rope.len_chars(),
            "delete range {range:?} out of bounds"
        );
        self.rope.remove(range);
        self.modified = true;
    }

    // -- Metadata -----------------------------------------------------------

    /// The file path this buffer is associated with, if any.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the file path for this buffer.
    #[inline]
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// True if the buffer has been modified since the last save (or creation).
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    // -- File I/O -----------------------------------------------------------

    /// Save the buffer to `path`, updating the stored path. Marks the buffer
    /// as unmodified on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_as(&mut self, path: &Path) -> io::Result<()> {
        let mut file = io::BufWriter::new(fs::File::create(path)?);
        self.rope.write_to(&mut file)?;
        io::Write::flush(&mut file)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Char length of a rope line minus its trailing `\n`, `\r\n` or `\r`.
fn content_len(line: RopeSlice<'_>) -> usize {
    let total = line.len_chars();
    match (total.checked_sub(2).map(|i| line.char(i)), total.checked_sub(1).map(|i| line.char(i))) {
        (Some('\r'), Some('\n')) => total - 2,
        (_, Some('\n' | '\r')) => total - 1,
        _ => total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
