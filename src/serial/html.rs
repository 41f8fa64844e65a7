//! HTML serializer.
//!
//! Renders a node subtree back into HTML text. Differences from the input
//! the parser saw:
//!
//! - Attribute values are always quoted with `"`
//! - Void elements use `<br>` syntax (no `/>`, no end tag)
//! - Non-void empty elements use `<p></p>`
//! - Raw text elements (script, style) are not escaped
//! - No formatting whitespace is added; text nodes are written as they are

use std::fmt::{self, Write};

use crate::html::{is_raw_text_element, is_void_element};
use crate::tree::{Document, NodeId, NodeKind};

/// Renders the subtree rooted at `id` into `out`.
///
/// For the document node this writes the doctype (if any) followed by all
/// top-level nodes.
///
/// # Errors
///
/// Returns any error reported by `out`.
///
/// # Examples
///
/// ```
/// use oxsoup::html::{parse_html_with_options, HtmlParseOptions};
/// use oxsoup::serial::write_html;
///
/// let opts = HtmlParseOptions::default().no_implied(true);
/// let doc = parse_html_with_options("<p class=x>a &amp; b<br></p>", &opts).unwrap();
/// let mut out = String::new();
/// write_html(&doc, doc.root(), &mut out).unwrap();
/// assert_eq!(out, "<p class=\"x\">a &amp; b<br></p>");
/// ```
pub fn write_html<W: Write>(doc: &Document, id: NodeId, out: &mut W) -> fmt::Result {
    // Walk first-child, next-sibling and parent links, writing each end tag
    // when the walk climbs out of its element.
    let mut current = id;
    loop {
        if write_open(doc, current, out)? {
            if let Some(child) = doc.first_child(current) {
                current = child;
                continue;
            }
        }
        let mut node = current;
        loop {
            write_close(doc, node, out)?;
            if node == id {
                return Ok(());
            }
            if let Some(sibling) = doc.next_sibling(node) {
                current = sibling;
                break;
            }
            match doc.parent(node) {
                Some(parent) => node = parent,
                None => return Ok(()),
            }
        }
    }
}

/// Writes everything that precedes the children of `id`. Returns `true`
/// if the children still have to be written.
fn write_open<W: Write>(doc: &Document, id: NodeId, out: &mut W) -> Result<bool, fmt::Error> {
    match &doc.node(id).kind {
        NodeKind::Document => {
            if let Some(name) = &doc.doctype {
                write!(out, "<!DOCTYPE {name}>")?;
            }
            Ok(true)
        }
        NodeKind::Element { name, attributes } => {
            out.write_char('<')?;
            out.write_str(name)?;
            for attr in attributes {
                write!(out, " {}=\"", attr.name)?;
                write_escaped_attr(out, &attr.value)?;
                out.write_char('"')?;
            }
            out.write_char('>')?;

            if is_void_element(name) {
                return Ok(false);
            }
            if is_raw_text_element(name) {
                for child in doc.children(id) {
                    match &doc.node(child).kind {
                        NodeKind::Text { content } => out.write_str(content)?,
                        NodeKind::Comment { content } => write!(out, "<!--{content}-->")?,
                        _ => {}
                    }
                }
                return Ok(false);
            }
            Ok(true)
        }
        NodeKind::Text { content } => {
            write_escaped_text(out, content)?;
            Ok(false)
        }
        NodeKind::Comment { content } => {
            write!(out, "<!--{content}-->")?;
            Ok(false)
        }
    }
}

/// Writes the end tag of `id`, if it has one.
fn write_close<W: Write>(doc: &Document, id: NodeId, out: &mut W) -> fmt::Result {
    match &doc.node(id).kind {
        NodeKind::Element { name, .. } if !is_void_element(name) => write!(out, "</{name}>"),
        _ => Ok(()),
    }
}

/// Renders the subtree rooted at `id` into a new `String`.
///
/// # Errors
///
/// Returns `fmt::Error` if rendering fails.
pub fn to_html(doc: &Document, id: NodeId) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_html(doc, id, &mut out)?;
    Ok(out)
}

/// Escapes text content for HTML output.
///
/// - `&` → `&amp;`
/// - `<` → `&lt;`
/// - `>` → `&gt;`
fn write_escaped_text<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

/// Escapes a double-quoted attribute value.
///
/// - `&` → `&amp;`
/// - `"` → `&quot;`
fn write_escaped_attr<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '"' => out.write_str("&quot;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}
