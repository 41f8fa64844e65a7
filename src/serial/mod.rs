//! HTML serialization.
//!
//! This module renders a `Document` tree, or any subtree of it, back to
//! HTML text. The serializer handles escaping of text and attribute values
//! and leaves `script`/`style` contents untouched.

pub mod html;

pub use html::{to_html, write_html};
