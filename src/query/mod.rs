//! Tag and attribute matching over a document tree.
//!
//! A [`Filter`] decides whether a single node matches; [`find_first`] and
//! [`find_all`] walk a subtree in document order applying it. The subtree
//! root is itself a candidate. Only element nodes ever match, but every
//! node is visited so that elements below text or comments are reached.
//!
//! Both walks come in two flavours selected by [`Traversal`]. They return
//! identical results; the iterative one does not grow the call stack with
//! tree depth. Documents nested deeper than [`MAX_RECURSION_DEPTH`] are
//! always walked iteratively.

use std::collections::HashMap;

use crate::tree::{Document, NodeId, NodeKind};

/// Required attribute values: every pair must be present on an element.
///
/// Keys are unique. Matching ignores insertion order.
///
/// ```
/// use oxsoup::Attributes;
///
/// let attrs = Attributes::from([("class", "item"), ("id", "first")]);
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs.get("class"), Some("item"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    /// Creates an empty set, which every element satisfies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required pair, replacing any earlier value for `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a required pair, returning the previous value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Returns the required value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of required pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no required pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the required pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if the element `id` carries every required pair.
    ///
    /// Each pair is looked up among all of the element's attributes, so a
    /// duplicated attribute matches if any occurrence has the value.
    fn satisfied_by(&self, doc: &Document, id: NodeId) -> bool {
        let attributes = doc.attributes(id);
        self.0.iter().all(|(name, value)| {
            attributes
                .iter()
                .any(|attr| attr.name == *name && attr.value == *value)
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for Attributes {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// What a node must look like to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<'q> {
    /// The element's tag name equals the given name.
    ByTag(&'q str),
    /// The element carries every pair in the set.
    ByAttributes(&'q Attributes),
    /// Both of the above.
    ByBoth {
        /// Required tag name.
        tag: &'q str,
        /// Required attribute pairs.
        attributes: &'q Attributes,
    },
    /// Matches nothing.
    Nothing,
}

impl<'q> Filter<'q> {
    /// Builds a filter from a tag, an attribute set, and flags saying which
    /// of the two to use.
    ///
    /// With both flags set the filter requires both; with one flag it uses
    /// that filter alone; with neither it matches nothing.
    #[must_use]
    pub fn from_flags(
        tag: &'q str,
        attributes: &'q Attributes,
        use_tag: bool,
        use_attributes: bool,
    ) -> Self {
        match (use_tag, use_attributes) {
            (true, true) => Self::ByBoth { tag, attributes },
            (true, false) => Self::ByTag(tag),
            (false, true) => Self::ByAttributes(attributes),
            (false, false) => Self::Nothing,
        }
    }

    /// Returns `true` if node `id` of `doc` matches.
    #[must_use]
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let NodeKind::Element { name, .. } = &doc.node(id).kind else {
            return false;
        };
        match *self {
            Self::ByTag(tag) => name == tag,
            Self::ByAttributes(attributes) => attributes.satisfied_by(doc, id),
            Self::ByBoth { tag, attributes } => name == tag && attributes.satisfied_by(doc, id),
            Self::Nothing => false,
        }
    }
}

/// Deepest tree that [`Traversal::Recursive`] will descend into.
pub const MAX_RECURSION_DEPTH: u32 = 1024;

/// How the tree is walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Recursive descent over child links. Falls back to
    /// [`Traversal::Iterative`] on documents deeper than
    /// [`MAX_RECURSION_DEPTH`].
    #[default]
    Recursive,
    /// Link-following walk with constant stack use.
    Iterative,
}

impl Traversal {
    /// The strategy actually used on `doc`.
    #[must_use]
    pub fn for_document(self, doc: &Document) -> Self {
        if self == Self::Recursive && doc.depth() > MAX_RECURSION_DEPTH {
            Self::Iterative
        } else {
            self
        }
    }
}

/// Returns the first node at or below `root`, in document order, that
/// matches `filter`.
#[must_use]
pub fn find_first(
    doc: &Document,
    root: NodeId,
    filter: &Filter<'_>,
    traversal: Traversal,
) -> Option<NodeId> {
    match traversal.for_document(doc) {
        Traversal::Recursive => find_first_recursive(doc, root, filter),
        Traversal::Iterative => subtree(doc, root).find(|&id| filter.matches(doc, id)),
    }
}

/// Returns every node at or below `root`, in document order, that matches
/// `filter`. Matches may be nested inside one another.
#[must_use]
pub fn find_all(
    doc: &Document,
    root: NodeId,
    filter: &Filter<'_>,
    traversal: Traversal,
) -> Vec<NodeId> {
    match traversal.for_document(doc) {
        Traversal::Recursive => {
            let mut found = Vec::new();
            find_all_recursive(doc, root, filter, &mut found);
            found
        }
        Traversal::Iterative => subtree(doc, root)
            .filter(|&id| filter.matches(doc, id))
            .collect(),
    }
}

fn find_first_recursive(doc: &Document, id: NodeId, filter: &Filter<'_>) -> Option<NodeId> {
    if filter.matches(doc, id) {
        return Some(id);
    }
    doc.children(id)
        .find_map(|child| find_first_recursive(doc, child, filter))
}

fn find_all_recursive(doc: &Document, id: NodeId, filter: &Filter<'_>, found: &mut Vec<NodeId>) {
    if filter.matches(doc, id) {
        found.push(id);
    }
    for child in doc.children(id) {
        find_all_recursive(doc, child, filter, found);
    }
}

/// `root` followed by its descendants in document order.
fn subtree(doc: &Document, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::once(root).chain(doc.descendants(root))
}
