//! Lenient well-formedness pre-check.
//!
//! The HTML parser accepts anything, so obviously broken input (a tag cut
//! off mid-way, an unclosed quote, an element left open at the end) would
//! silently turn into a tree. [`check`] runs first and rejects such input.
//!
//! The check is tokenizer-level and tolerant of the usual HTML shortcuts:
//!
//! - void elements (`<br>`, `<img>`, ...) need no end tag
//! - unquoted and value-less attributes
//! - `&` references of any kind, known or not
//! - end tags compared case-insensitively
//! - an end tag that matches an outer element closes the inner ones
//! - `script` and `style` contents are not tokenized
//!
//! # Examples
//!
//! ```
//! use oxsoup::wellformed::check;
//!
//! assert!(check("<p>fish &amp; chips<br></p>").is_ok());
//! assert!(check("<div></").is_err());
//! ```

use crate::error::{MarkupError, SourceLocation};
use crate::html::input::{
    ends_attr_name, is_html_whitespace, is_tag_name_byte, is_tag_start_byte, ParserInput,
};
use crate::html::{is_raw_text_element, is_void_element};

/// Checks `input` for structural problems.
///
/// # Errors
///
/// Returns the first [`MarkupError`] found.
pub fn check(input: &str) -> Result<(), MarkupError> {
    Checker {
        input: ParserInput::new(input),
        open: Vec::new(),
    }
    .run()
}

struct Checker<'a> {
    input: ParserInput<'a>,
    /// Names of open elements, as written in the source.
    open: Vec<String>,
}

impl Checker<'_> {
    fn run(mut self) -> Result<(), MarkupError> {
        loop {
            self.input.skip_while(|b| b != b'<');
            if self.input.at_end() {
                break;
            }
            let start = self.input.location();
            if self.input.looking_at(b"<!--") {
                self.input.advance(4);
                self.expect_terminator(b"-->", "unterminated comment", start)?;
            } else if self.input.looking_at(b"<![CDATA[") {
                self.input.advance(9);
                self.expect_terminator(b"]]>", "unterminated CDATA section", start)?;
            } else if self.input.looking_at(b"<!") {
                self.declaration(start)?;
            } else if self.input.looking_at(b"<?") {
                self.input.advance(2);
                self.expect_terminator(b"?>", "unterminated processing instruction", start)?;
            } else if self.input.looking_at(b"</") {
                self.end_tag(start)?;
            } else if self.input.peek_at(1).is_some_and(is_tag_start_byte) {
                self.start_tag(start)?;
            } else {
                return Err(error("expected element name after <", start));
            }
        }

        match self.open.last() {
            Some(name) => Err(error(
                format!("unexpected end of input: <{name}> is not closed"),
                self.input.location(),
            )),
            None => Ok(()),
        }
    }

    fn expect_terminator(
        &mut self,
        terminator: &[u8],
        message: &str,
        start: SourceLocation,
    ) -> Result<(), MarkupError> {
        if self.input.skip_past(terminator) {
            Ok(())
        } else {
            Err(error(message, start))
        }
    }

    /// `<!DOCTYPE ...>` and other declarations; nested `<...>` pairs and
    /// quoted strings may appear inside.
    fn declaration(&mut self, start: SourceLocation) -> Result<(), MarkupError> {
        self.input.advance(2);
        let mut depth = 0usize;
        let mut quote = None;
        while let Some(b) = self.input.peek() {
            self.input.advance(1);
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'<') => depth += 1,
                (None, b'>') if depth == 0 => return Ok(()),
                (None, b'>') => depth -= 1,
                _ => {}
            }
        }
        Err(error("unterminated declaration", start))
    }

    fn end_tag(&mut self, start: SourceLocation) -> Result<(), MarkupError> {
        self.input.advance(2); // consume '</'
        let name = self.input.take_while(is_tag_name_byte);
        if name.is_empty() {
            let message = if self.input.at_end() {
                "unexpected end of input after </"
            } else {
                "expected element name after </"
            };
            return Err(error(message, start));
        }
        self.input.skip_whitespace();
        match self.input.peek() {
            Some(b'>') => self.input.advance(1),
            Some(_) => {
                return Err(error(
                    format!("invalid characters between </{name} and >"),
                    self.input.location(),
                ))
            }
            None => return Err(error("unexpected end of input in end tag", start)),
        }

        if is_void_element(&name.to_ascii_lowercase()) {
            return Ok(());
        }
        // Close inner elements until the matching one is found.
        while let Some(open) = self.open.pop() {
            if open.eq_ignore_ascii_case(&name) {
                return Ok(());
            }
        }
        Err(error(format!("unexpected end tag </{name}>"), start))
    }

    fn start_tag(&mut self, start: SourceLocation) -> Result<(), MarkupError> {
        self.input.advance(1); // consume '<'
        let name = self.input.take_while(is_tag_name_byte);

        let self_closing = loop {
            self.input.skip_whitespace();
            match self.input.peek() {
                None => {
                    return Err(error(
                        format!("unexpected end of input in start tag <{name}>"),
                        start,
                    ))
                }
                Some(b'>') => {
                    self.input.advance(1);
                    break false;
                }
                Some(b'/') if self.input.peek_at(1) == Some(b'>') => {
                    self.input.advance(2);
                    break true;
                }
                Some(_) => self.attribute(&name)?,
            }
        };

        let lower = name.to_ascii_lowercase();
        if self_closing || is_void_element(&lower) {
            return Ok(());
        }
        if is_raw_text_element(&lower) {
            let end_tag = format!("</{lower}");
            while !self.input.at_end() && !self.input.looking_at_ci(end_tag.as_bytes()) {
                self.input.advance(1);
            }
            if self.input.at_end() {
                return Err(error(format!("unterminated <{name}> element"), start));
            }
        }
        self.open.push(name);
        Ok(())
    }

    fn attribute(&mut self, element: &str) -> Result<(), MarkupError> {
        let at = self.input.location();
        let name = self.input.take_while(|b| !ends_attr_name(b));
        if name.is_empty() {
            return Err(error(
                format!("expected attribute name in element <{element}>"),
                at,
            ));
        }
        self.input.skip_whitespace();
        if self.input.peek() != Some(b'=') {
            return Ok(());
        }
        self.input.advance(1);
        self.input.skip_whitespace();

        let value_at = self.input.location();
        match self.input.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.input.advance(1);
                self.input.skip_while(|b| b != quote);
                if self.input.at_end() {
                    return Err(error(
                        format!("unterminated value for attribute {name}"),
                        value_at,
                    ));
                }
                self.input.advance(1);
            }
            _ => {
                let value = self.input.take_while(|b| !is_html_whitespace(b) && b != b'>');
                if value.is_empty() {
                    return Err(error(
                        format!("missing value for attribute {name}"),
                        value_at,
                    ));
                }
            }
        }
        Ok(())
    }
}

fn error(message: impl Into<String>, location: SourceLocation) -> MarkupError {
    MarkupError {
        message: message.into(),
        location,
    }
}
