//! Error types for markup checking, parsing, and rendering.
//!
//! The pre-check and the HTML parser report problems with a
//! [`SourceLocation`] (line, column and byte offset). The document facade
//! folds them into [`SoupError`], the single error type of the public API.
//!
//! A search that matches nothing is not an error: the find operations
//! return `None` or an empty `Vec`.

use std::fmt;

use thiserror::Error;

/// Source location within the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A structural problem found by the well-formedness pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {location}")]
pub struct MarkupError {
    /// Human-readable description of the problem.
    pub message: String,
    /// Where in the input the problem was detected.
    pub location: SourceLocation,
}

/// The error returned when the HTML parser gives up on its input.
///
/// The parser recovers from almost everything; the only hard failure is
/// exceeding the configured nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {location}: {message}")]
pub struct ParseError {
    /// The primary error message.
    pub message: String,
    /// Where in the source the fatal error occurred.
    pub location: SourceLocation,
}

/// Errors returned by the [`Document`](crate::Document) facade.
#[derive(Debug, Error)]
pub enum SoupError {
    /// The pre-check rejected the input; it was never handed to the parser.
    #[error("invalid html: {input}")]
    InvalidMarkup {
        /// The rejected input text.
        input: String,
        /// What the pre-check found.
        #[source]
        source: MarkupError,
    },

    /// The input passed the pre-check but the parser failed on it.
    #[error(transparent)]
    ParseFailure(#[from] ParseError),

    /// Rendering a node back to markup failed.
    #[error("failed to serialize html")]
    SerializationFailure(#[source] fmt::Error),
}

impl SoupError {
    /// Returns the pre-check error if this is [`SoupError::InvalidMarkup`].
    #[must_use]
    pub fn markup_error(&self) -> Option<&MarkupError> {
        match self {
            Self::InvalidMarkup { source, .. } => Some(source),
            _ => None,
        }
    }
}
