//! Arena-based HTML document tree.
//!
//! All nodes live in a contiguous `Vec<NodeData>` owned by the [`Document`],
//! and are referenced by [`NodeId`], a newtype over `NonZeroU32`. Navigation
//! links (parent, first\_child, last\_child, next\_sibling, prev\_sibling)
//! are arena indices, so the tree has no reference cycles and is freed in one
//! go when the `Document` is dropped.
//!
//! The public API is read-only. Nodes are created and linked by the HTML
//! parser; after parsing the tree is never reordered, so iteration order is
//! always document order.

mod node;

pub use node::NodeKind;

use std::num::NonZeroU32;

use crate::query::Traversal;

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, so `Option<NodeId>` has the same
/// size as `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0 or does not fit in a `u32`.
    #[allow(clippy::expect_used)]
    fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index).expect("node arena exceeds u32::MAX entries");
        Self(NonZeroU32::new(raw).expect("NodeId index must be non-zero"))
    }

    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node. The document node has no parent.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An attribute on an element: a name and its decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name, lowercased by the parser.
    pub name: String,
    /// The attribute value with character references resolved.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute from a name and a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A parsed HTML document.
///
/// The `Document` owns every node of the tree. Use
/// [`Document::parse`](crate::Document::parse) to build one, then search it
/// with the `find_*` methods.
///
/// # Examples
///
/// ```
/// use oxsoup::Document;
///
/// let doc = Document::parse("<p id=\"intro\">Hello</p>").unwrap();
/// let p = doc.find_first_by_tag("p").unwrap();
/// assert_eq!(p.get_attribute("id"), Some("intro"));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document node id.
    root: NodeId,
    /// The name from the `<!DOCTYPE ...>` declaration, if the input had one.
    pub(crate) doctype: Option<String>,
    /// Deepest element nesting in the tree.
    pub(crate) depth: u32,
    /// How the `find_*` methods walk this document.
    pub(crate) traversal: Traversal,
}

impl Document {
    /// Creates an empty document holding only the document node.
    pub(crate) fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root: NodeId::from_index(1),
            doctype: None,
            depth: 0,
            traversal: Traversal::default(),
        }
    }

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the tag name of an element node, `None` for other kinds.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).kind.is_element()
    }

    /// Returns the attributes of an element node.
    ///
    /// Returns an empty slice for non-element nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of the first attribute called `name`.
    ///
    /// The name is compared as-is; no case folding or trimming happens.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the concatenated text of a node and all its descendants.
    ///
    /// Comments are skipped.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        if let NodeKind::Text { content } = &self.node(id).kind {
            result.push_str(content);
        }
        for desc in self.descendants(id) {
            if let NodeKind::Text { content } = &self.node(desc).kind {
                result.push_str(content);
            }
        }
        result
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns an iterator over all descendants of a node in document order.
    ///
    /// The node itself is not included. The walk follows sibling and parent
    /// links, so it uses no recursion and no auxiliary stack.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Returns the deepest element nesting in the tree, counting implied
    /// elements. An empty document has depth 0.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the number of nodes, including the document node.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // subtract placeholder at index 0
    }

    // --- Construction (parser only) ---

    /// Allocates a new detached node and returns its `NodeId`.
    pub(crate) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Appends a detached node to the end of a parent's child list.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Inserts a detached node immediately before `reference`.
    ///
    /// Does nothing if `reference` has no parent.
    pub(crate) fn insert_before(&mut self, reference: NodeId, new_child: NodeId) {
        debug_assert!(
            self.node(new_child).parent.is_none(),
            "new_child already has a parent"
        );
        let Some(parent) = self.node(reference).parent else {
            return;
        };
        self.node_mut(new_child).parent = Some(parent);

        if let Some(prev) = self.node(reference).prev_sibling {
            self.node_mut(prev).next_sibling = Some(new_child);
            self.node_mut(new_child).prev_sibling = Some(prev);
        } else {
            self.node_mut(parent).first_child = Some(new_child);
        }

        self.node_mut(new_child).next_sibling = Some(reference);
        self.node_mut(reference).prev_sibling = Some(new_child);
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        // Climb until a node with a next sibling is found, stopping at root.
        let mut node = current;
        loop {
            if node == self.root {
                self.next = None;
                break;
            }
            if let Some(sibling) = self.doc.next_sibling(node) {
                self.next = Some(sibling);
                break;
            }
            match self.doc.parent(node) {
                Some(parent) => node = parent,
                None => {
                    self.next = None;
                    break;
                }
            }
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(doc: &mut Document, name: &str, attributes: Vec<Attribute>) -> NodeId {
        doc.create_node(NodeKind::Element {
            name: name.to_string(),
            attributes,
        })
    }

    fn text(doc: &mut Document, content: &str) -> NodeId {
        doc.create_node(NodeKind::Text {
            content: content.to_string(),
        })
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert!(matches!(doc.node(doc.root()).kind, NodeKind::Document));
        assert_eq!(doc.node_count(), 1);
        assert!(doc.doctype.is_none());
    }

    #[test]
    fn test_append_links_siblings() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = element(&mut doc, "a", vec![]);
        let b = element(&mut doc, "b", vec![]);
        doc.append_child(root, a);
        doc.append_child(root, b);

        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.last_child(root), Some(b));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.prev_sibling(b), Some(a));
        assert_eq!(doc.parent(b), Some(root));
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_insert_before_first_child() {
        let mut doc = Document::new();
        let root = doc.root();
        let body = element(&mut doc, "body", vec![]);
        doc.append_child(root, body);
        let head = element(&mut doc, "head", vec![]);
        doc.insert_before(body, head);

        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![head, body]);
        assert_eq!(doc.first_child(root), Some(head));
        assert_eq!(doc.prev_sibling(body), Some(head));
    }

    #[test]
    fn test_descendants_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = element(&mut doc, "p", vec![]);
        let a = text(&mut doc, "hello ");
        let b = element(&mut doc, "b", vec![]);
        let b_text = text(&mut doc, "world");
        let tail = element(&mut doc, "hr", vec![]);

        doc.append_child(root, p);
        doc.append_child(p, a);
        doc.append_child(p, b);
        doc.append_child(b, b_text);
        doc.append_child(root, tail);

        let desc: Vec<NodeId> = doc.descendants(root).collect();
        assert_eq!(desc, vec![p, a, b, b_text, tail]);

        // A subtree walk stops at the subtree root.
        let desc: Vec<NodeId> = doc.descendants(p).collect();
        assert_eq!(desc, vec![a, b, b_text]);
        assert_eq!(doc.descendants(tail).count(), 0);
    }

    #[test]
    fn test_text_content_skips_comments() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = element(&mut doc, "p", vec![]);
        let t1 = text(&mut doc, "hello ");
        let c = doc.create_node(NodeKind::Comment {
            content: "note".to_string(),
        });
        let t2 = text(&mut doc, "world");
        doc.append_child(root, p);
        doc.append_child(p, t1);
        doc.append_child(p, c);
        doc.append_child(p, t2);

        assert_eq!(doc.text_content(p), "hello world");
        assert_eq!(doc.text_content(t1), "hello ");
    }

    #[test]
    fn test_attribute_first_occurrence_wins() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = element(
            &mut doc,
            "div",
            vec![
                Attribute::new("id", "first"),
                Attribute::new("class", "box"),
                Attribute::new("id", "second"),
            ],
        );
        doc.append_child(root, div);

        assert_eq!(doc.attribute(div, "id"), Some("first"));
        assert_eq!(doc.attribute(div, "class"), Some("box"));
        assert_eq!(doc.attribute(div, "ID"), None);
        assert_eq!(doc.attributes(div).len(), 3);
    }

    #[test]
    fn test_non_element_has_no_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let t = text(&mut doc, "x");
        doc.append_child(root, t);

        assert!(doc.attributes(t).is_empty());
        assert_eq!(doc.attribute(t, "id"), None);
        assert_eq!(doc.node_name(t), None);
        assert!(!doc.is_element(t));
        assert!(!doc.is_element(root));
    }
}
