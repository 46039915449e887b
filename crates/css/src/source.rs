//! Source cursor
//!
//! A position-tracked view over the stylesheet text. Line endings are
//! normalized up front so every later stage only ever sees `\n`.

use std::borrow::Cow;

use crate::error::SourceLocation;

/// Saved cursor state for backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    offset: usize,
    line: usize,
    column: usize,
}

/// Character cursor with line/column/offset tracking
pub struct Source<'a> {
    text: Cow<'a, str>,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Source<'a> {
    /// Create a cursor at the start of `input`
    pub fn new(input: &'a str) -> Self {
        Self {
            text: normalize(input),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The normalized text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The unread remainder
    pub fn rest(&self) -> &str {
        &self.text[self.offset..]
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// The next character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character `n` positions ahead (0 is the next one)
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume one character
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `c` if it is next
    pub fn read_if(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.read();
            true
        } else {
            false
        }
    }

    /// Consume `s` if the remainder starts with it
    pub fn read_str_if(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.advance(s.len());
            true
        } else {
            false
        }
    }

    /// Consume `len` bytes, which must end on a char boundary.
    /// Returns the byte range that was consumed.
    pub fn advance(&mut self, len: usize) -> (usize, usize) {
        let start = self.offset;
        let end = (start + len).min(self.text.len());
        let mut line = self.line;
        let mut column = self.column;
        for c in self.text[start..end].chars() {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        self.offset = end;
        self.line = line;
        self.column = column;
        (start, end)
    }

    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.text.len());
        self.text.get(start.min(end)..end).unwrap_or("")
    }

    pub fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    pub fn reset(&mut self, mark: Mark) {
        self.offset = mark.offset;
        self.line = mark.line;
        self.column = mark.column;
    }

    /// Jump to a known position, e.g. the end of a replayed block
    pub fn seek(&mut self, loc: SourceLocation) {
        self.offset = loc.offset.min(self.text.len());
        self.line = loc.line;
        self.column = loc.column;
    }
}

/// Lines of `input` as the cursor numbers them: `\n`, `\r\n`, `\r` and
/// `\f` each end one
pub fn split_lines(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\x0c' => {
                lines.push(&input[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&input[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    lines.push(&input[start..]);
    lines
}

/// `\r\n`, `\r` and `\f` all become `\n`
pub fn normalize(input: &str) -> Cow<'_, str> {
    if !input.contains(['\r', '\x0c']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\x0c' => out.push('\n'),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\rc\x0cd\ne"), ["a", "b", "c", "d", "e"]);
        assert_eq!(split_lines("a\n"), ["a", ""]);
        assert_eq!(split_lines(""), [""]);
        assert_eq!(split_lines("x\r\ny").len(), normalize("x\r\ny").split('\n').count());
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\x0cd"), "a\nb\nc\nd");
        assert!(matches!(normalize("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_read_tracks_lines() {
        let mut src = Source::new("ab\ncd");
        src.read();
        src.read();
        assert_eq!(src.location(), SourceLocation::new(1, 3, 2));
        src.read();
        assert_eq!(src.location(), SourceLocation::new(2, 1, 3));
    }

    #[test]
    fn test_columns_count_chars() {
        let mut src = Source::new("ёж x");
        src.advance("ёж".len());
        assert_eq!(src.location().column, 3);
        assert_eq!(src.peek_nth(1), Some('x'));
    }

    #[test]
    fn test_mark_reset() {
        let mut src = Source::new("a\nbc");
        let mark = src.mark();
        src.advance(3);
        assert_eq!(src.peek(), Some('c'));
        src.reset(mark);
        assert_eq!(src.location(), SourceLocation::new(1, 1, 0));
        assert!(src.read_str_if("a\nb"));
        assert!(!src.read_str_if("x"));
        assert_eq!(src.location(), SourceLocation::new(2, 2, 3));
    }
}
