//! Lexical scanner: code / comment / string classification without a parse.
//!
//! The scanner answers one question: *what lexical region is this offset in?*
//! It never tokenizes. A scan walks chars through a four-state machine:
//!
//! ```text
//!            "//"              "\n"
//!   Normal ───────▶ LineComment ─────▶ Normal
//!   Normal ──"/*"─▶ BlockComment ─"*/"─▶ Normal
//!   Normal ──q────▶ InString(q) ──q───▶ Normal     (q = unescaped " or ')
//! ```
//!
//! Every scan starts in `Normal` at a boundary the caller knows is safe (in
//! practice a line start). Nothing is carried between keystrokes.
//!
//! # Escapes
//!
//! A quote is escaped iff it is preceded by an **odd** number of consecutive
//! backslashes. The scanner counts backward from the quote instead of
//! carrying an "escape pending" flag, so `\\"` is an unescaped quote and
//! `\"` is an escaped one regardless of where the scan started.

use n_editor::buffer::Buffer;
use tracing::trace;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Lexical region of a scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexState {
    /// Plain code.
    Normal,
    /// Inside `// ...` up to the end of the line.
    LineComment,
    /// Inside `/* ... */`.
    BlockComment,
    /// Inside a string literal opened with the given quote char.
    InString(char),
}

impl LexState {
    /// True for plain code.
    #[inline]
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Compute the next state after consuming `ch`.
///
/// `next` is the char after `ch` if it lies inside the scanned range.
/// `escaped` must be true when `ch` is a quote preceded by an odd backslash
/// run; it is ignored for other chars. With `line_comments` off, `//` is plain
/// code (used when the caller already cut the range before any line comment).
///
/// Returns the new state and how many chars were consumed (2 for the
/// two-char delimiters `//`, `/*`, `*/`, 1 otherwise).
#[must_use]
pub const fn transition(
    state: LexState,
    ch: char,
    next: Option<char>,
    escaped: bool,
    line_comments: bool,
) -> (LexState, usize) {
    match state {
        LexState::LineComment => match ch {
            '\n' => (LexState::Normal, 1),
            _ => (LexState::LineComment, 1),
        },
        LexState::BlockComment => match (ch, next) {
            ('*', Some('/')) => (LexState::Normal, 2),
            _ => (LexState::BlockComment, 1),
        },
        LexState::InString(quote) => {
            if ch == quote && !escaped {
                (LexState::Normal, 1)
            } else {
                (LexState::InString(quote), 1)
            }
        }
        LexState::Normal => match (ch, next) {
            ('"' | '\'', _) if !escaped => (LexState::InString(ch), 1),
            ('/', Some('/')) if line_comments => (LexState::LineComment, 2),
            ('/', Some('*')) => (LexState::BlockComment, 2),
            _ => (LexState::Normal, 1),
        },
    }
}

/// True if the char at `pos` is preceded by an odd number of consecutive
/// backslashes, counting back no further than `floor`.
#[must_use]
pub fn is_escaped(buf: &Buffer, pos: usize, floor: usize) -> bool {
    let mut backslashes = 0usize;
    let mut i = pos;
    while i > floor && buf.char_at(i - 1) == Some('\\') {
        backslashes += 1;
        i -= 1;
    }
    backslashes % 2 == 1
}

// ---------------------------------------------------------------------------
// ScanCursor
// ---------------------------------------------------------------------------

/// One consumed unit of a scan: the char at `at` and the states on either
/// side of it. Two-char delimiters are reported once, at their first char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub at: usize,
    pub ch: char,
    pub before: LexState,
    pub after: LexState,
}

impl Step {
    /// True when the char is plain code: not inside, opening, or closing a
    /// comment or string.
    #[inline]
    #[must_use]
    pub const fn is_code(&self) -> bool {
        self.before.is_normal() && self.after.is_normal()
    }
}

/// A forward scan over `[start, end)` of a buffer, starting in `Normal`.
///
/// Iterating yields one [`Step`] per consumed unit. Lookahead for two-char
/// delimiters never reads past `end`, so a scan's cost is bounded by the
/// range it was given.
#[derive(Debug, Clone)]
pub struct ScanCursor<'a> {
    buf: &'a Buffer,
    offset: usize,
    end: usize,
    floor: usize,
    state: LexState,
    line_comments: bool,
}

impl<'a> ScanCursor<'a> {
    /// Scan `[start, end)`. `end` is clamped to the buffer length.
    #[must_use]
    pub fn new(buf: &'a Buffer, start: usize, end: usize) -> Self {
        Self {
            buf,
            offset: start,
            end: end.min(buf.len_chars()),
            floor: start,
            state: LexState::Normal,
            line_comments: true,
        }
    }

    /// Treat `//` as plain code for this scan.
    #[must_use]
    pub const fn without_line_comments(mut self) -> Self {
        self.line_comments = false;
        self
    }

    /// Offset of the next unconsumed char.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// State after everything consumed so far.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> LexState {
        self.state
    }
}

impl Iterator for ScanCursor<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.offset >= self.end {
            return None;
        }
        let at = self.offset;
        let ch = self.buf.char_at(at)?;
        let next = if at + 1 < self.end {
            self.buf.char_at(at + 1)
        } else {
            None
        };
        let escaped = matches!(ch, '"' | '\'') && is_escaped(self.buf, at, self.floor);

        let before = self.state;
        let (after, width) = transition(before, ch, next, escaped, self.line_comments);
        self.state = after;
        self.offset += width;

        Some(Step {
            at,
            ch,
            before,
            after,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// The lexical state at `target`, scanning from `scan_start` (assumed to be
/// plain code).
#[must_use]
pub fn classify_at(buf: &Buffer, scan_start: usize, target: usize) -> LexState {
    let mut scan = ScanCursor::new(buf, scan_start, target);
    for _ in scan.by_ref() {}
    scan.state()
}

/// Find where the string containing `inside_at` closes on the same line.
///
/// Scans from `inside_at + 1` for the next unescaped `quote`, never crossing
/// a line terminator. Returns the offset just past the closing quote, or
/// `None` if the line ends first. Backslash runs are counted back to `floor`
/// (the line start).
#[must_use]
pub fn find_string_exit_on_same_line(
    buf: &Buffer,
    inside_at: usize,
    quote: char,
    floor: usize,
) -> Option<usize> {
    let mut j = inside_at + 1;
    while let Some(ch) = buf.char_at(j) {
        match ch {
            '\n' | '\r' => return None,
            c if c == quote && !is_escaped(buf, j, floor) => return Some(j + 1),
            _ => j += 1,
        }
    }
    None
}

/// Find the first `)` reachable from `from` through nothing but whitespace,
/// comments and string literals, looking at most `max_window` chars ahead.
///
/// Any other code char before the `)` aborts the search: this tunnels through
/// gaps, it does not skip code. A comment or string still open when the
/// window runs out also gives `None`.
#[must_use]
pub fn find_next_unguarded_close_paren(
    buf: &Buffer,
    from: usize,
    max_window: usize,
) -> Option<usize> {
    let end = from.saturating_add(max_window);
    for step in ScanCursor::new(buf, from, end) {
        if !step.is_code() {
            continue;
        }
        match step.ch {
            ')' => {
                trace!(from, at = step.at, "landmark found");
                return Some(step.at);
            }
            c if c.is_whitespace() => {}
            _ => {
                trace!(from, at = step.at, ch = %step.ch, "landmark search hit code");
                return None;
            }
        }
    }
    None
}

/// True if a terminator char sits as plain code in `[from, to)`.
///
/// Block comments and strings are skipped. `//` is *not* special here: the
/// caller passes a `to` that already stops before any trailing line comment.
#[must_use]
pub fn contains_terminator_before_boundary(
    buf: &Buffer,
    from: usize,
    to: usize,
    terminator: char,
) -> bool {
    ScanCursor::new(buf, from, to)
        .without_line_comments()
        .any(|step| step.is_code() && step.ch == terminator)
}

/// Offset of the first `//` that opens a line comment in `[line_start, line_end)`.
///
/// Unlike a plain substring search this ignores `//` inside strings
/// (`"https://..."`) and block comments.
#[must_use]
pub fn line_comment_start(buf: &Buffer, line_start: usize, line_end: usize) -> Option<usize> {
    ScanCursor::new(buf, line_start, line_end)
        .find(|step| step.before.is_normal() && step.after == LexState::LineComment)
        .map(|step| step.at)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(text: &str) -> Buffer {
        Buffer::from_text(text)
    }

    // -- transition ---------------------------------------------------------

    #[test]
    fn transition_opens_and_closes_comments() {
        use LexState::*;
        assert_eq!(transition(Normal, '/', Some('/'), false, true), (LineComment, 2));
        assert_eq!(transition(Normal, '/', Some('*'), false, true), (BlockComment, 2));
        assert_eq!(transition(Normal, '/', Some('x'), false, true), (Normal, 1));
        assert_eq!(transition(Normal, '/', None, false, true), (Normal, 1));
        assert_eq!(transition(LineComment, '\n', None, false, true), (Normal, 1));
        assert_eq!(transition(LineComment, '*', Some('/'), false, true), (LineComment, 1));
        assert_eq!(transition(BlockComment, '*', Some('/'), false, true), (Normal, 2));
        assert_eq!(transition(BlockComment, '\n', None, false, true), (BlockComment, 1));
    }

    #[test]
    fn transition_strings() {
        use LexState::*;
        assert_eq!(transition(Normal, '"', None, false, true), (InString('"'), 1));
        assert_eq!(transition(Normal, '\'', None, false, true), (InString('\''), 1));
        assert_eq!(transition(Normal, '"', None, true, true), (Normal, 1));
        assert_eq!(transition(InString('"'), '\'', None, false, true), (InString('"'), 1));
        assert_eq!(transition(InString('"'), '"', None, true, true), (InString('"'), 1));
        assert_eq!(transition(InString('"'), '"', None, false, true), (Normal, 1));
        // Comment openers mean nothing inside a string.
        assert_eq!(transition(InString('"'), '/', Some('/'), false, true), (InString('"'), 1));
    }

    #[test]
    fn transition_line_comments_disabled() {
        use LexState::*;
        assert_eq!(transition(Normal, '/', Some('/'), false, false), (Normal, 1));
        assert_eq!(transition(Normal, '/', Some('*'), false, false), (BlockComment, 2));
    }

    // -- is_escaped ---------------------------------------------------------

    #[test]
    fn escape_parity() {
        let b = buf(r#"a\"b\\"c\\\"d"#);
        // a \ " b \ \ " c \ \ \ " d
        // 0 1 2 3 4 5 6 7 8 9 10 11 12
        assert!(is_escaped(&b, 2, 0));
        assert!(!is_escaped(&b, 6, 0));
        assert!(is_escaped(&b, 11, 0));
        assert!(!is_escaped(&b, 0, 0));
    }

    #[test]
    fn escape_counting_stops_at_floor() {
        let b = buf(r#"\\""#);
        assert!(!is_escaped(&b, 2, 0));
        // Only one backslash is visible above the floor.
        assert!(is_escaped(&b, 2, 1));
    }

    // -- classify_at --------------------------------------------------------

    #[test]
    fn classify_plain_code() {
        let b = buf("foo(1, 2);");
        assert_eq!(classify_at(&b, 0, 10), LexState::Normal);
    }

    #[test]
    fn classify_inside_string() {
        let b = buf(r#"emit("a;b");"#);
        assert_eq!(classify_at(&b, 0, 8), LexState::InString('"'));
        assert_eq!(classify_at(&b, 0, 10), LexState::Normal);
    }

    #[test]
    fn classify_single_quoted_string() {
        let b = buf("x = 'it\\'s;';");
        assert_eq!(classify_at(&b, 0, 11), LexState::InString('\''));
    }

    #[test]
    fn classify_string_after_double_backslash_is_closed() {
        let b = buf(r#"s = "a\\"; t"#);
        assert_eq!(classify_at(&b, 0, 10), LexState::Normal);
    }

    #[test]
    fn classify_comments() {
        let b = buf("a; // b; c");
        assert_eq!(classify_at(&b, 0, 8), LexState::LineComment);
        let b = buf("a /* b; */ c");
        assert_eq!(classify_at(&b, 0, 6), LexState::BlockComment);
        assert_eq!(classify_at(&b, 0, 11), LexState::Normal);
    }

    #[test]
    fn classify_quote_in_comment_is_ignored() {
        let b = buf("/* \" */ x");
        assert_eq!(classify_at(&b, 0, 9), LexState::Normal);
    }

    #[test]
    fn classify_delimiter_split_at_target() {
        // The '/' right before the target has no visible lookahead.
        let b = buf("a /");
        assert_eq!(classify_at(&b, 0, 3), LexState::Normal);
    }

    // -- find_string_exit_on_same_line --------------------------------------

    #[test]
    fn string_exit_found() {
        let b = buf(r#"emit("a;b");"#);
        assert_eq!(find_string_exit_on_same_line(&b, 7, '"', 0), Some(10));
    }

    #[test]
    fn string_exit_skips_escaped_quote() {
        let b = buf(r#"x("a;\"b");"#);
        assert_eq!(find_string_exit_on_same_line(&b, 4, '"', 0), Some(9));
    }

    #[test]
    fn string_exit_not_on_this_line() {
        let b = buf("x(\"a;\nb\");");
        assert_eq!(find_string_exit_on_same_line(&b, 4, '"', 0), None);
        let b = buf("x(\"a;");
        assert_eq!(find_string_exit_on_same_line(&b, 4, '"', 0), None);
    }

    // -- find_next_unguarded_close_paren ------------------------------------

    #[test]
    fn paren_immediately() {
        let b = buf("foo(a;)");
        assert_eq!(find_next_unguarded_close_paren(&b, 6, 4000), Some(6));
    }

    #[test]
    fn paren_across_whitespace_and_lines() {
        let b = buf("foo(1,;\n    \n  )");
        assert_eq!(find_next_unguarded_close_paren(&b, 7, 4000), Some(15));
    }

    #[test]
    fn paren_through_comments_and_strings() {
        let b = buf("f(; /* ) */ // )\n \"x)\" 'y' )");
        assert_eq!(find_next_unguarded_close_paren(&b, 3, 4000), Some(27));
    }

    #[test]
    fn paren_aborts_on_code() {
        let b = buf("foo(1,; 2)");
        assert_eq!(find_next_unguarded_close_paren(&b, 7, 4000), None);
        let b = buf("x = a + b;");
        assert_eq!(find_next_unguarded_close_paren(&b, 0, 4000), None);
    }

    #[test]
    fn paren_aborts_on_lone_slash() {
        let b = buf("f(; / 2)");
        assert_eq!(find_next_unguarded_close_paren(&b, 3, 4000), None);
    }

    #[test]
    fn paren_none_at_end() {
        let b = buf("foo();");
        assert_eq!(find_next_unguarded_close_paren(&b, 6, 4000), None);
        assert_eq!(find_next_unguarded_close_paren(&b, 99, 4000), None);
    }

    #[test]
    fn paren_respects_window() {
        let text = format!("f(;{})", " ".repeat(100));
        let b = buf(&text);
        assert_eq!(find_next_unguarded_close_paren(&b, 3, 100), None);
        assert_eq!(find_next_unguarded_close_paren(&b, 3, 101), Some(103));
    }

    #[test]
    fn paren_unterminated_comment_in_window() {
        let b = buf("f(; /* never closed )");
        assert_eq!(find_next_unguarded_close_paren(&b, 3, 4000), None);
    }

    // -- contains_terminator_before_boundary --------------------------------

    #[test]
    fn terminator_plain() {
        let b = buf("foo(); bar");
        assert!(contains_terminator_before_boundary(&b, 0, 10, ';'));
        assert!(!contains_terminator_before_boundary(&b, 6, 10, ';'));
    }

    #[test]
    fn terminator_in_string_or_block_comment_ignored() {
        let b = buf(r#") "a;b" /* ; */ 'c;'"#);
        assert!(!contains_terminator_before_boundary(&b, 0, b.len_chars(), ';'));
    }

    #[test]
    fn terminator_after_double_slash_counts() {
        // `to` is supposed to exclude trailing comments; `//` is not skipped.
        let b = buf(") // ;");
        assert!(contains_terminator_before_boundary(&b, 0, 6, ';'));
    }

    #[test]
    fn terminator_empty_or_inverted_range() {
        let b = buf(";;");
        assert!(!contains_terminator_before_boundary(&b, 1, 1, ';'));
        assert!(!contains_terminator_before_boundary(&b, 2, 0, ';'));
    }

    // -- line_comment_start -------------------------------------------------

    #[test]
    fn comment_start_found() {
        let b = buf("foo(); // note");
        assert_eq!(line_comment_start(&b, 0, 14), Some(7));
    }

    #[test]
    fn comment_start_ignores_url_in_string() {
        let b = buf(r#"get("https://x") // y"#);
        assert_eq!(line_comment_start(&b, 0, b.len_chars()), Some(17));
        let b = buf(r#"get("https://x")"#);
        assert_eq!(line_comment_start(&b, 0, b.len_chars()), None);
    }

    // -- ScanCursor ---------------------------------------------------------

    #[test]
    fn cursor_reports_delimiters_once() {
        let b = buf("a/*b*/c");
        let steps: Vec<_> = ScanCursor::new(&b, 0, 7).map(|s| (s.at, s.after)).collect();
        assert_eq!(
            steps,
            vec![
                (0, LexState::Normal),
                (1, LexState::BlockComment),
                (3, LexState::BlockComment),
                (4, LexState::Normal),
                (6, LexState::Normal),
            ]
        );
    }

    #[test]
    fn cursor_end_clamped_to_buffer() {
        let b = buf("ab");
        let scan = ScanCursor::new(&b, 0, 50);
        assert_eq!(scan.count(), 2);
    }
}
