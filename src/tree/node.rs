//! Node type definitions.
//!
//! The set of node kinds is closed: a parsed HTML tree only ever holds the
//! document node, elements, text, and comments. Only elements take part in
//! tag and attribute matching.

use super::Attribute;

/// The kind of a node and its associated data.
///
/// Navigation links (parent, children, siblings) are stored in
/// [`NodeData`](super::NodeData), not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The lowercase tag name.
        name: String,
        /// Attributes in source order. Duplicates are kept.
        attributes: Vec<Attribute>,
    },

    /// A text node containing character data.
    Text {
        /// The text content (already decoded; character references resolved).
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },
}

impl NodeKind {
    /// Returns `true` for element nodes.
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }
}
