//! Document facade: parse, search, render.
//!
//! This is the surface most callers need. [`parse_document`] (or
//! [`Document::parse`]) checks and parses HTML text; the `find_*` methods on
//! [`Document`] and [`Element`] search the resulting tree by tag name and
//! attribute values.
//!
//! # Examples
//!
//! ```
//! use oxsoup::{parse_document, Attributes};
//!
//! let doc = parse_document(
//!     "<ul><li class=\"a\">one</li><li class=\"b\">two</li><li class=\"a\">three</li></ul>",
//! )
//! .unwrap();
//! let items = doc.find_all("li", &Attributes::from([("class", "a")]));
//! let texts: Vec<String> = items.iter().map(|li| li.text()).collect();
//! assert_eq!(texts, ["one", "three"]);
//! ```

mod element;

pub use element::Element;

use std::fmt;

use crate::error::SoupError;
use crate::html::{parse_html_with_options, HtmlParseOptions};
use crate::query::{self, Attributes, Filter, Traversal};
use crate::serial;
use crate::tree::{Document, NodeId};
use crate::wellformed;

/// Options for [`Document::parse_with_options`].
///
/// ```
/// use oxsoup::{SoupOptions, Traversal};
///
/// let opts = SoupOptions::default()
///     .traversal(Traversal::Iterative)
///     .max_depth(4096);
/// assert!(opts.validate);
/// assert_eq!(opts.html.max_depth, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoupOptions {
    /// Run the well-formedness pre-check before parsing.
    pub validate: bool,
    /// Options passed to the HTML parser.
    pub html: HtmlParseOptions,
    /// How searches walk the parsed tree.
    pub traversal: Traversal,
}

impl Default for SoupOptions {
    fn default() -> Self {
        Self {
            validate: true,
            html: HtmlParseOptions::default(),
            traversal: Traversal::default(),
        }
    }
}

impl SoupOptions {
    /// Enables or disables the pre-check.
    #[must_use]
    pub fn validate(mut self, yes: bool) -> Self {
        self.validate = yes;
        self
    }

    /// Replaces the HTML parser options.
    #[must_use]
    pub fn html(mut self, html: HtmlParseOptions) -> Self {
        self.html = html;
        self
    }

    /// Sets the search traversal strategy.
    #[must_use]
    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Sets the parser's maximum nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.html.max_depth = depth;
        self
    }
}

/// Checks and parses `text` with default options.
///
/// # Errors
///
/// Returns [`SoupError::InvalidMarkup`] if the pre-check rejects the input
/// and [`SoupError::ParseFailure`] if the parser gives up on it.
///
/// ```
/// use oxsoup::{parse_document, SoupError};
///
/// let err = parse_document("<div></").unwrap_err();
/// assert!(matches!(err, SoupError::InvalidMarkup { .. }));
/// assert_eq!(err.to_string(), "invalid html: <div></");
/// ```
pub fn parse_document(text: &str) -> Result<Document, SoupError> {
    Document::parse(text)
}

impl Document {
    /// Checks and parses `text` with default options.
    ///
    /// # Errors
    ///
    /// See [`parse_document`].
    pub fn parse(text: &str) -> Result<Self, SoupError> {
        Self::parse_with_options(text, &SoupOptions::default())
    }

    /// Checks and parses `text` with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`SoupError::InvalidMarkup`] if validation is enabled and
    /// fails, and [`SoupError::ParseFailure`] if the parser gives up.
    pub fn parse_with_options(text: &str, options: &SoupOptions) -> Result<Self, SoupError> {
        if options.validate {
            wellformed::check(text).map_err(|source| SoupError::InvalidMarkup {
                input: text.to_string(),
                source,
            })?;
        }
        let mut doc = parse_html_with_options(text, &options.html)?;
        doc.traversal = options.traversal;
        tracing::debug!(
            input_len = text.len(),
            nodes = doc.node_count(),
            validated = options.validate,
            "parsed html document"
        );
        Ok(doc)
    }

    /// Returns the doctype name, if the input declared one.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Returns the traversal strategy used by the `find_*` methods.
    #[must_use]
    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Returns the first top-level element (`<html>` unless implied
    /// elements were turned off).
    #[must_use]
    pub fn root_element(&self) -> Option<Element<'_>> {
        self.children(self.root()).find_map(|id| self.element(id))
    }

    /// Wraps `id` in an [`Element`] handle if it is an element node.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<Element<'_>> {
        self.is_element(id).then(|| Element::new(self, id))
    }

    /// Renders the whole document back to HTML.
    ///
    /// # Errors
    ///
    /// Returns [`SoupError::SerializationFailure`] if rendering fails.
    pub fn serialize(&self) -> Result<String, SoupError> {
        serial::to_html(self, self.root()).map_err(SoupError::SerializationFailure)
    }

    /// Returns the first element with tag `tag` carrying every pair in
    /// `attributes`.
    #[must_use]
    pub fn find_first(&self, tag: &str, attributes: &Attributes) -> Option<Element<'_>> {
        self.find_first_matching(&Filter::ByBoth { tag, attributes })
    }

    /// Returns the first element with tag `tag`.
    #[must_use]
    pub fn find_first_by_tag(&self, tag: &str) -> Option<Element<'_>> {
        self.find_first_matching(&Filter::ByTag(tag))
    }

    /// Returns the first element carrying every pair in `attributes`.
    #[must_use]
    pub fn find_first_by_attributes(&self, attributes: &Attributes) -> Option<Element<'_>> {
        self.find_first_matching(&Filter::ByAttributes(attributes))
    }

    /// Returns the first element matching `filter`.
    #[must_use]
    pub fn find_first_matching(&self, filter: &Filter<'_>) -> Option<Element<'_>> {
        search_first(self, self.root(), filter)
    }

    /// Returns every element with tag `tag` carrying every pair in
    /// `attributes`, in document order.
    #[must_use]
    pub fn find_all(&self, tag: &str, attributes: &Attributes) -> Vec<Element<'_>> {
        self.find_all_matching(&Filter::ByBoth { tag, attributes })
    }

    /// Returns every element with tag `tag`, in document order.
    #[must_use]
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<Element<'_>> {
        self.find_all_matching(&Filter::ByTag(tag))
    }

    /// Returns every element carrying every pair in `attributes`, in
    /// document order.
    #[must_use]
    pub fn find_all_by_attributes(&self, attributes: &Attributes) -> Vec<Element<'_>> {
        self.find_all_matching(&Filter::ByAttributes(attributes))
    }

    /// Returns every element matching `filter`, in document order.
    #[must_use]
    pub fn find_all_matching(&self, filter: &Filter<'_>) -> Vec<Element<'_>> {
        search_all(self, self.root(), filter)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        serial::write_html(self, self.root(), f)
    }
}

fn search_first<'a>(doc: &'a Document, start: NodeId, filter: &Filter<'_>) -> Option<Element<'a>> {
    let found = query::find_first(doc, start, filter, doc.traversal);
    tracing::trace!(?filter, found = found.is_some(), "find_first");
    found.map(|id| Element::new(doc, id))
}

fn search_all<'a>(doc: &'a Document, start: NodeId, filter: &Filter<'_>) -> Vec<Element<'a>> {
    let found = query::find_all(doc, start, filter, doc.traversal);
    tracing::trace!(?filter, found = found.len(), "find_all");
    found.into_iter().map(|id| Element::new(doc, id)).collect()
}
