//! Low-level input cursor shared by the HTML parser and the pre-check.
//!
//! [`ParserInput`] walks the raw bytes of a `&str`, tracking line, column and
//! byte offset for diagnostics, and counts element nesting depth so that
//! pathological inputs cannot build arbitrarily deep trees.

use crate::error::{ParseError, SourceLocation};

/// Default maximum element nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 256;

/// A snapshot of the input position, for backtracking.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SavedPosition {
    pos: usize,
    line: u32,
    column: u32,
}

/// Cursor over the input bytes.
pub(crate) struct ParserInput<'a> {
    /// The input bytes (valid UTF-8, since they come from a `&str`).
    input: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
    depth: u32,
    max_depth: u32,
    /// Deepest nesting reached so far.
    peak_depth: u32,
}

impl<'a> ParserInput<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            peak_depth: 0,
        }
    }

    pub fn set_max_depth(&mut self, max: u32) {
        self.max_depth = max;
    }

    // -- Depth tracking --

    /// Increments the nesting depth. Returns an error if the limit is exceeded.
    pub fn increment_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError {
                message: format!("maximum nesting depth exceeded ({})", self.max_depth),
                location: self.location(),
            });
        }
        self.peak_depth = self.peak_depth.max(self.depth);
        Ok(())
    }

    /// Returns the deepest nesting reached so far.
    pub fn peak_depth(&self) -> u32 {
        self.peak_depth
    }

    /// Decrements the nesting depth (saturating at 0).
    pub fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -- Position queries --

    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the input between two byte offsets as a string.
    pub fn slice_str(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    pub fn save_position(&self) -> SavedPosition {
        SavedPosition {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore_position(&mut self, saved: SavedPosition) {
        self.pos = saved.pos;
        self.line = saved.line;
        self.column = saved.column;
    }

    // -- Peek operations --

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Returns the character at the current position without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        let remaining = self.input.get(self.pos..)?;
        // At most 4 bytes are needed to decode one character.
        let end = remaining.len().min(4);
        match std::str::from_utf8(&remaining[..end]) {
            Ok(s) => s.chars().next(),
            Err(e) => std::str::from_utf8(&remaining[..e.valid_up_to()])
                .ok()
                .and_then(|s| s.chars().next()),
        }
    }

    // -- Advance operations --

    /// Advances the position by `count` bytes, updating line/column.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            if self.pos < self.input.len() {
                if self.input[self.pos] == b'\n' {
                    self.line += 1;
                    self.column = 1;
                } else if self.input[self.pos] & 0xC0 != 0x80 {
                    // Continuation bytes do not start a new column.
                    self.column += 1;
                }
                self.pos += 1;
            }
        }
    }

    /// Consumes the next character with `\r\n` → `\n` normalization.
    ///
    /// Returns `None` at end of input. A position inside a multi-byte
    /// sequence yields U+FFFD and skips one byte.
    pub fn next_char(&mut self) -> Option<char> {
        if self.at_end() {
            return None;
        }
        let Some(ch) = self.peek_char() else {
            self.advance(1);
            return Some('\u{FFFD}');
        };
        self.advance(ch.len_utf8());
        if ch == '\r' {
            if self.peek() == Some(b'\n') {
                self.advance(1);
            }
            return Some('\n');
        }
        Some(ch)
    }

    // -- Lookahead --

    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.input[self.pos.min(self.input.len())..].starts_with(s)
    }

    /// Case-insensitive (ASCII) lookahead.
    pub fn looking_at_ci(&self, expected: &[u8]) -> bool {
        self.input
            .get(self.pos..self.pos + expected.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(expected))
    }

    // -- Skipping --

    /// Skips whitespace characters. Returns `true` if any were consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_html_whitespace) {
            self.advance(1);
        }
        self.pos > start
    }

    /// Consumes bytes while `pred` holds.
    pub fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance(1);
        }
    }

    /// Consumes bytes while `pred` holds and returns them as a string.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        self.skip_while(pred);
        self.slice_str(start, self.pos)
    }

    /// Advances past the next occurrence of `needle`.
    ///
    /// Returns `false` (with the cursor at end of input) if it never occurs.
    pub fn skip_past(&mut self, needle: &[u8]) -> bool {
        while !self.at_end() {
            if self.looking_at(needle) {
                self.advance(needle.len());
                return true;
            }
            self.advance(1);
        }
        false
    }
}

pub(crate) fn is_html_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0C')
}

/// Characters that may start a tag name.
pub(crate) fn is_tag_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

/// Characters allowed in tag names after the first letter.
pub(crate) fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

/// Characters that end an attribute name.
pub(crate) fn ends_attr_name(b: u8) -> bool {
    is_html_whitespace(b) || matches!(b, b'=' | b'>' | b'/' | b'<' | b'"' | b'\'')
}
