use std::fmt;
use std::ptr;

use super::{search_all, search_first};
use crate::error::SoupError;
use crate::query::{Attributes, Filter};
use crate::serial;
use crate::tree::{Attribute, Document, NodeId};

/// A borrowed handle to an element node of a [`Document`].
///
/// Handles are cheap to copy and never outlive the document they point
/// into. Searching from an element considers the element itself as well
/// as everything below it.
///
/// # Examples
///
/// ```
/// use oxsoup::{Attributes, Document};
///
/// let doc = Document::parse("<div id=\"outer\"><a href=\"/x\">x</a></div>").unwrap();
/// let div = doc.find_first_by_tag("div").unwrap();
/// assert_eq!(div.get_attribute("id"), Some("outer"));
/// assert_eq!(div.attribute_or_empty("class"), ("", false));
///
/// let link = div.find_first_by_attributes(&Attributes::from([("href", "/x")])).unwrap();
/// assert_eq!(link.tag_name(), "a");
/// assert_eq!(link.to_string(), "<a href=\"/x\">x</a>");
/// ```
#[derive(Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> Element<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        debug_assert!(doc.is_element(id), "Element handle on a non-element node");
        Self { doc, id }
    }

    /// The document this element belongs to.
    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The arena id of this element.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// The lowercase tag name.
    #[must_use]
    pub fn tag_name(&self) -> &'a str {
        self.doc.node_name(self.id).unwrap_or_default()
    }

    /// Returns the value of the first attribute called `key`.
    ///
    /// The key is compared as-is.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&'a str> {
        self.doc.attribute(self.id, key)
    }

    /// Returns the attribute value and whether it was present; an absent
    /// attribute reads as `("", false)`.
    #[must_use]
    pub fn attribute_or_empty(&self, key: &str) -> (&'a str, bool) {
        self.get_attribute(key)
            .map_or(("", false), |value| (value, true))
    }

    /// All attributes in source order, duplicates included.
    #[must_use]
    pub fn attributes(&self) -> &'a [Attribute] {
        self.doc.attributes(self.id)
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text(&self) -> String {
        self.doc.text_content(self.id)
    }

    /// The parent element, or `None` at the top level.
    #[must_use]
    pub fn parent(&self) -> Option<Element<'a>> {
        self.doc.parent(self.id).and_then(|id| self.doc.element(id))
    }

    /// Child elements in document order. Text and comments are skipped.
    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let doc = self.doc;
        doc.children(self.id).filter_map(move |id| doc.element(id))
    }

    /// Renders this element and its subtree back to HTML.
    ///
    /// # Errors
    ///
    /// Returns [`SoupError::SerializationFailure`] if rendering fails.
    pub fn serialize(&self) -> Result<String, SoupError> {
        serial::to_html(self.doc, self.id).map_err(SoupError::SerializationFailure)
    }

    /// Returns the first element at or below this one with tag `tag`
    /// carrying every pair in `attributes`.
    #[must_use]
    pub fn find_first(&self, tag: &str, attributes: &Attributes) -> Option<Element<'a>> {
        self.find_first_matching(&Filter::ByBoth { tag, attributes })
    }

    /// Returns the first element at or below this one with tag `tag`.
    #[must_use]
    pub fn find_first_by_tag(&self, tag: &str) -> Option<Element<'a>> {
        self.find_first_matching(&Filter::ByTag(tag))
    }

    /// Returns the first element at or below this one carrying every pair
    /// in `attributes`.
    #[must_use]
    pub fn find_first_by_attributes(&self, attributes: &Attributes) -> Option<Element<'a>> {
        self.find_first_matching(&Filter::ByAttributes(attributes))
    }

    /// Returns the first element at or below this one matching `filter`.
    #[must_use]
    pub fn find_first_matching(&self, filter: &Filter<'_>) -> Option<Element<'a>> {
        search_first(self.doc, self.id, filter)
    }

    /// Returns every element at or below this one with tag `tag` carrying
    /// every pair in `attributes`.
    #[must_use]
    pub fn find_all(&self, tag: &str, attributes: &Attributes) -> Vec<Element<'a>> {
        self.find_all_matching(&Filter::ByBoth { tag, attributes })
    }

    /// Returns every element at or below this one with tag `tag`.
    #[must_use]
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<Element<'a>> {
        self.find_all_matching(&Filter::ByTag(tag))
    }

    /// Returns every element at or below this one carrying every pair in
    /// `attributes`.
    #[must_use]
    pub fn find_all_by_attributes(&self, attributes: &Attributes) -> Vec<Element<'a>> {
        self.find_all_matching(&Filter::ByAttributes(attributes))
    }

    /// Returns every element at or below this one matching `filter`.
    #[must_use]
    pub fn find_all_matching(&self, filter: &Filter<'_>) -> Vec<Element<'a>> {
        search_all(self.doc, self.id, filter)
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Element<'_> {}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("tag", &self.tag_name())
            .field("attributes", &self.attributes())
            .finish()
    }
}

impl fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        serial::write_html(self.doc, self.id, f)
    }
}
