//! # oxsoup
//!
//! Search HTML documents by tag name and attribute values.
//!
//! Input is checked for obvious structural damage, parsed with an
//! error-tolerant HTML parser into an arena tree, and then queried through
//! borrowed [`Element`] handles.
//!
//! ## Quick Start
//!
//! ```
//! use oxsoup::{parse_document, Attributes};
//!
//! let doc = parse_document(
//!     r#"<div name="outer"><div id="a" class="item"></div><div id="b" class="item"></div></div>"#,
//! )
//! .unwrap();
//!
//! let items = doc.find_all("div", &Attributes::from([("class", "item")]));
//! let ids: Vec<_> = items.iter().filter_map(|e| e.get_attribute("id")).collect();
//! assert_eq!(ids, ["a", "b"]);
//!
//! let outer = doc.find_first_by_tag("div").unwrap();
//! assert_eq!(outer.attribute_or_empty("class"), ("", false));
//! ```

pub mod error;
pub mod html;
pub mod query;
pub mod serial;
pub mod soup;
pub mod tree;
pub mod wellformed;

// Re-export primary types at the crate root for convenience.
pub use error::SoupError;
pub use query::{Attributes, Filter, Traversal};
pub use soup::{parse_document, Element, SoupOptions};
pub use tree::{Attribute, Document, NodeId};
