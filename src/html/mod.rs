//! Error-tolerant HTML parser.
//!
//! Builds a [`Document`] tree from HTML text. The parser never rejects
//! input on syntax grounds; it recovers the way browsers do:
//!
//! - Missing `html`, `head` and `body` elements are implied
//! - Optional end tags are closed automatically (`<p>`, `<li>`, `<td>`, ...)
//! - Void elements (`<br>`, `<img>`, ...) never take children
//! - Tag and attribute names are lowercased
//! - Unquoted and value-less attributes are accepted
//! - Character references are decoded; unknown ones are kept literally
//! - `script` and `style` contents are raw text
//!
//! The only hard failure is nesting deeper than
//! [`HtmlParseOptions::max_depth`].
//!
//! # Examples
//!
//! ```
//! use oxsoup::html::parse_html;
//!
//! let doc = parse_html("<p>Hello <b>world</b>").unwrap();
//! let html = doc.first_child(doc.root()).unwrap();
//! assert_eq!(doc.node_name(html), Some("html"));
//! ```

pub mod entities;
pub(crate) mod input;

use crate::error::ParseError;
use crate::tree::{Attribute, Document, NodeId, NodeKind};
use input::{
    ends_attr_name, is_html_whitespace, is_tag_name_byte, is_tag_start_byte, ParserInput,
};

/// Options controlling HTML parser behavior.
///
/// ```
/// use oxsoup::html::HtmlParseOptions;
///
/// let opts = HtmlParseOptions::default()
///     .no_blanks(true)
///     .max_depth(64);
/// assert_eq!(opts.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlParseOptions {
    /// If true, whitespace-only text nodes are dropped.
    pub no_blanks: bool,
    /// If true, `html`, `head` and `body` are not implied.
    pub no_implied: bool,
    /// Maximum element nesting depth.
    pub max_depth: u32,
}

impl Default for HtmlParseOptions {
    fn default() -> Self {
        Self {
            no_blanks: false,
            no_implied: false,
            max_depth: input::DEFAULT_MAX_DEPTH,
        }
    }
}

impl HtmlParseOptions {
    /// Enables or disables stripping of blank text nodes.
    #[must_use]
    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }

    /// Enables or disables generation of implied elements (html, head, body).
    #[must_use]
    pub fn no_implied(mut self, yes: bool) -> Self {
        self.no_implied = yes;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Parses an HTML string into a `Document` with default options.
///
/// # Errors
///
/// Returns `ParseError` if elements nest deeper than the default limit.
pub fn parse_html(input: &str) -> Result<Document, ParseError> {
    parse_html_with_options(input, &HtmlParseOptions::default())
}

/// Parses an HTML string into a `Document` with the given options.
///
/// # Errors
///
/// Returns `ParseError` if elements nest deeper than `options.max_depth`.
///
/// # Examples
///
/// ```
/// use oxsoup::html::{parse_html_with_options, HtmlParseOptions};
///
/// let opts = HtmlParseOptions::default().no_implied(true);
/// let doc = parse_html_with_options("<ul><li>a<li>b</ul>", &opts).unwrap();
/// let ul = doc.first_child(doc.root()).unwrap();
/// assert_eq!(doc.children(ul).count(), 2);
/// ```
pub fn parse_html_with_options(
    input: &str,
    options: &HtmlParseOptions,
) -> Result<Document, ParseError> {
    HtmlParser::new(input, options).parse()
}

/// Returns true if `tag` (lowercase) is a void element that never has content.
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "basefont"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "isindex"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Returns true if `tag` is an element whose content is not parsed as HTML.
pub(crate) fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Returns true if opening `tag` implicitly closes an open `open_tag`.
fn auto_closes(open_tag: &str, tag: &str) -> bool {
    match open_tag {
        "p" => matches!(
            tag,
            "p" | "address"
                | "article"
                | "aside"
                | "blockquote"
                | "details"
                | "div"
                | "dl"
                | "fieldset"
                | "figure"
                | "footer"
                | "form"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "header"
                | "hr"
                | "main"
                | "nav"
                | "ol"
                | "pre"
                | "section"
                | "table"
                | "ul"
        ),
        "li" => tag == "li",
        "dt" | "dd" => matches!(tag, "dt" | "dd"),
        "tr" => tag == "tr",
        "td" | "th" => matches!(tag, "td" | "th" | "tr"),
        "thead" | "tbody" => matches!(tag, "tbody" | "tfoot"),
        "option" => matches!(tag, "option" | "optgroup"),
        "optgroup" => tag == "optgroup",
        _ => false,
    }
}

/// Returns true if `tag` belongs in `<head>` when it appears before `<body>`.
fn is_head_content_element(tag: &str) -> bool {
    matches!(
        tag,
        "base" | "link" | "meta" | "noscript" | "script" | "style" | "title"
    )
}

/// The parser state: input cursor, the tree under construction, and the
/// stack of open elements.
struct HtmlParser<'a> {
    input: ParserInput<'a>,
    doc: Document,
    options: HtmlParseOptions,
    /// Open element ids and their lowercase tag names, outermost first.
    open_elements: Vec<(NodeId, String)>,
}

impl<'a> HtmlParser<'a> {
    fn new(text: &'a str, options: &HtmlParseOptions) -> Self {
        let mut input = ParserInput::new(text);
        input.set_max_depth(options.max_depth);
        Self {
            input,
            doc: Document::new(),
            options: options.clone(),
            open_elements: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Document, ParseError> {
        while !self.input.at_end() {
            if self.input.looking_at(b"<!--") {
                self.parse_comment();
            } else if self.input.looking_at_ci(b"<!doctype") {
                self.parse_doctype();
            } else if self.input.looking_at(b"</") {
                self.parse_end_tag();
            } else if self.input.looking_at(b"<!") || self.input.looking_at(b"<?") {
                self.parse_bogus_comment();
            } else if self.at_start_tag() {
                self.parse_start_tag()?;
            } else {
                self.parse_text()?;
            }
        }

        self.pop_to(0);
        if !self.options.no_implied {
            self.head_element();
            self.body_element();
        }
        self.doc.depth = self.input.peak_depth();
        Ok(self.doc)
    }

    fn at_start_tag(&self) -> bool {
        self.input.peek() == Some(b'<')
            && self.input.peek_at(1).is_some_and(is_tag_start_byte)
    }

    fn at_markup(&self) -> bool {
        self.at_start_tag()
            || self.input.looking_at(b"</")
            || self.input.looking_at(b"<!")
            || self.input.looking_at(b"<?")
    }

    // --- Open element stack ---

    fn current_parent(&self) -> NodeId {
        self.open_elements
            .last()
            .map_or_else(|| self.doc.root(), |&(id, _)| id)
    }

    fn current_tag(&self) -> Option<&str> {
        self.open_elements.last().map(|(_, tag)| tag.as_str())
    }

    fn is_open(&self, tag: &str) -> bool {
        self.open_elements.iter().any(|(_, t)| t == tag)
    }

    fn push_open(&mut self, id: NodeId, tag: String) -> Result<(), ParseError> {
        self.input.increment_depth()?;
        self.open_elements.push((id, tag));
        Ok(())
    }

    /// Pops open elements until only `len` remain.
    fn pop_to(&mut self, len: usize) {
        while self.open_elements.len() > len {
            self.open_elements.pop();
            self.input.decrement_depth();
        }
    }

    // --- Implied structure ---

    fn child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.doc
            .children(parent)
            .find(|&id| self.doc.node_name(id) == Some(tag))
    }

    fn create_element(&mut self, name: &str, attributes: Vec<Attribute>) -> NodeId {
        self.doc.create_node(NodeKind::Element {
            name: name.to_string(),
            attributes,
        })
    }

    fn html_element(&mut self) -> NodeId {
        let root = self.doc.root();
        if let Some(id) = self.child_element(root, "html") {
            return id;
        }
        let id = self.create_element("html", vec![]);
        self.doc.append_child(root, id);
        id
    }

    fn head_element(&mut self) -> NodeId {
        let html = self.html_element();
        if let Some(id) = self.child_element(html, "head") {
            return id;
        }
        let id = self.create_element("head", vec![]);
        match self.child_element(html, "body") {
            Some(body) => self.doc.insert_before(body, id),
            None => self.doc.append_child(html, id),
        }
        id
    }

    fn body_element(&mut self) -> NodeId {
        let html = self.html_element();
        if let Some(id) = self.child_element(html, "body") {
            return id;
        }
        let id = self.create_element("body", vec![]);
        self.doc.append_child(html, id);
        id
    }

    fn has_body(&self) -> bool {
        self.child_element(self.doc.root(), "html")
            .and_then(|html| self.child_element(html, "body"))
            .is_some()
    }

    fn open_html(&mut self) -> Result<NodeId, ParseError> {
        let id = self.html_element();
        if !self.is_open("html") {
            self.pop_to(0);
            self.push_open(id, "html".to_string())?;
        }
        Ok(id)
    }

    /// Makes `head` or `body` the insertion point, closing anything open
    /// inside `html` first.
    fn open_section(&mut self, tag: &str) -> Result<NodeId, ParseError> {
        self.open_html()?;
        let id = if tag == "head" {
            self.head_element()
        } else {
            self.body_element()
        };
        if !self.is_open(tag) {
            let html_pos = self
                .open_elements
                .iter()
                .position(|(_, t)| t == "html")
                .map_or(0, |pos| pos + 1);
            self.pop_to(html_pos);
            self.push_open(id, tag.to_string())?;
        }
        Ok(id)
    }

    fn close_head_if_open(&mut self) {
        if self.current_tag() == Some("head") {
            self.pop_to(self.open_elements.len() - 1);
        }
    }

    /// Adds attributes not already present on an existing element.
    fn merge_attributes(&mut self, id: NodeId, attrs: Vec<Attribute>) {
        if let NodeKind::Element { attributes, .. } = &mut self.doc.node_mut(id).kind {
            for attr in attrs {
                if !attributes.iter().any(|a| a.name == attr.name) {
                    attributes.push(attr);
                }
            }
        }
    }

    // --- Start Tag ---

    fn parse_start_tag(&mut self) -> Result<(), ParseError> {
        self.input.advance(1); // consume '<'
        let tag = self.input.take_while(is_tag_name_byte).to_ascii_lowercase();
        let attributes = self.parse_attributes();

        let self_closing = self.input.looking_at(b"/>");
        if self_closing {
            self.input.advance(2);
        } else {
            self.input.skip_past(b">");
        }

        if !self.options.no_implied {
            match tag.as_str() {
                "html" => {
                    let id = self.open_html()?;
                    self.merge_attributes(id, attributes);
                    return Ok(());
                }
                "head" => {
                    if !self.has_body() {
                        let id = self.open_section("head")?;
                        self.merge_attributes(id, attributes);
                    }
                    return Ok(());
                }
                "body" => {
                    let id = self.open_section("body")?;
                    self.merge_attributes(id, attributes);
                    return Ok(());
                }
                _ if is_head_content_element(&tag) && !self.has_body() => {
                    if !self.is_open("head") {
                        self.open_section("head")?;
                    }
                }
                _ => {
                    self.close_head_if_open();
                    if !self.is_open("body") {
                        self.open_section("body")?;
                    }
                }
            }
        }

        while self
            .current_tag()
            .is_some_and(|open| auto_closes(open, &tag))
        {
            self.pop_to(self.open_elements.len() - 1);
        }

        let parent = self.current_parent();
        let id = self.create_element(&tag, attributes);
        self.doc.append_child(parent, id);

        if is_void_element(&tag) || self_closing {
            return Ok(());
        }
        if is_raw_text_element(&tag) {
            self.parse_raw_text(id, &tag);
            return Ok(());
        }
        self.push_open(id, tag)
    }

    // --- End Tag ---

    fn parse_end_tag(&mut self) {
        self.input.advance(2); // consume '</'
        let tag = self.input.take_while(is_tag_name_byte).to_ascii_lowercase();
        self.input.skip_past(b">");

        if tag.is_empty() || is_void_element(&tag) {
            return;
        }
        // Content after </body> or </html> still belongs to the body.
        if !self.options.no_implied && matches!(tag.as_str(), "body" | "html") {
            return;
        }
        if let Some(index) = self.open_elements.iter().rposition(|(_, t)| *t == tag) {
            self.pop_to(index);
        }
    }

    // --- Attributes ---

    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();

        loop {
            self.input.skip_whitespace();
            if self.input.at_end() || self.input.peek() == Some(b'>') || self.input.looking_at(b"/>")
            {
                break;
            }

            let name = self.input.take_while(|b| !ends_attr_name(b));
            if name.is_empty() {
                // Stray '/', quote or '=': skip it.
                self.input.advance(1);
                continue;
            }

            self.input.skip_whitespace();
            let value = if self.input.peek() == Some(b'=') {
                self.input.advance(1);
                self.input.skip_whitespace();
                self.parse_attr_value()
            } else {
                String::new()
            };

            attributes.push(Attribute::new(name.to_ascii_lowercase(), value));
        }

        attributes
    }

    fn parse_attr_value(&mut self) -> String {
        let mut value = String::new();
        match self.input.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.input.advance(1);
                while let Some(b) = self.input.peek() {
                    if b == quote {
                        self.input.advance(1);
                        break;
                    }
                    self.push_char_or_reference(&mut value, true);
                }
            }
            _ => {
                while self
                    .input
                    .peek()
                    .is_some_and(|b| !is_html_whitespace(b) && b != b'>')
                {
                    self.push_char_or_reference(&mut value, true);
                }
            }
        }
        value
    }

    // --- Text ---

    fn parse_text(&mut self) -> Result<(), ParseError> {
        let mut text = String::new();
        // The first character is never markup, so at least one is consumed.
        loop {
            self.push_char_or_reference(&mut text, false);
            if self.input.at_end() || self.at_markup() {
                break;
            }
        }

        let blank = text.chars().all(char::is_whitespace);
        if blank && self.options.no_blanks {
            return Ok(());
        }
        if !self.options.no_implied {
            let outside = matches!(self.current_tag(), None | Some("html"));
            let in_head = self.current_tag() == Some("head");
            if blank && outside {
                return Ok(());
            }
            if !blank && (outside || in_head) {
                self.close_head_if_open();
                self.open_section("body")?;
            }
        }

        self.append_text(text);
        Ok(())
    }

    /// Appends text to the insertion point, merging with a preceding text node.
    fn append_text(&mut self, text: String) {
        let parent = self.current_parent();
        if let Some(last) = self.doc.last_child(parent) {
            if let NodeKind::Text { content } = &mut self.doc.node_mut(last).kind {
                content.push_str(&text);
                return;
            }
        }
        let id = self.doc.create_node(NodeKind::Text { content: text });
        self.doc.append_child(parent, id);
    }

    fn parse_raw_text(&mut self, element: NodeId, tag: &str) {
        let end_tag = format!("</{tag}");
        let mut content = String::new();
        while !self.input.at_end() && !self.input.looking_at_ci(end_tag.as_bytes()) {
            if let Some(ch) = self.input.next_char() {
                content.push(ch);
            }
        }
        self.input.skip_past(b">");

        if !content.is_empty() {
            let id = self.doc.create_node(NodeKind::Text { content });
            self.doc.append_child(element, id);
        }
    }

    // --- Comments and declarations ---

    fn parse_comment(&mut self) {
        self.input.advance(4); // consume '<!--'
        let start = self.input.pos();
        let mut end = start;
        while !self.input.at_end() {
            if self.input.looking_at(b"-->") {
                end = self.input.pos();
                self.input.advance(3);
                break;
            }
            self.input.advance(1);
            end = self.input.pos();
        }
        let content = self.input.slice_str(start, end);
        self.append_comment(content);
    }

    /// `<!...>` and `<?...>` that are neither comments nor a doctype become
    /// comments holding everything up to the next `>`.
    fn parse_bogus_comment(&mut self) {
        self.input.advance(2);
        let content = self.input.take_while(|b| b != b'>');
        self.input.advance(1);
        self.append_comment(content);
    }

    fn append_comment(&mut self, content: String) {
        let parent = self.current_parent();
        let id = self.doc.create_node(NodeKind::Comment { content });
        self.doc.append_child(parent, id);
    }

    fn parse_doctype(&mut self) {
        self.input.advance(9); // "<!doctype"
        self.input.skip_whitespace();
        let name = self.input.take_while(is_tag_name_byte).to_ascii_lowercase();
        self.input.skip_past(b">");

        // Only a doctype before any content counts.
        if self.doc.doctype.is_none() && self.doc.first_child(self.doc.root()).is_none() {
            self.doc.doctype = Some(name);
        }
    }

    // --- Character references ---

    /// Consumes one character, or a whole character reference when the
    /// cursor is on `&`, and appends the result to `out`.
    fn push_char_or_reference(&mut self, out: &mut String, in_attribute: bool) {
        if self.input.peek() == Some(b'&') {
            if let Some(decoded) = self.parse_reference(in_attribute) {
                out.push(decoded);
                return;
            }
        }
        if let Some(ch) = self.input.next_char() {
            out.push(ch);
        }
    }

    /// Parses a character reference at `&`. On failure the cursor is left
    /// on the `&` so it is taken literally.
    fn parse_reference(&mut self, in_attribute: bool) -> Option<char> {
        let saved = self.input.save_position();
        self.input.advance(1); // consume '&'

        let decoded = if self.input.peek() == Some(b'#') {
            self.input.advance(1);
            let hex = matches!(self.input.peek(), Some(b'x' | b'X'));
            if hex {
                self.input.advance(1);
            }
            let digits = if hex {
                self.input.take_while(|b| b.is_ascii_hexdigit())
            } else {
                self.input.take_while(|b| b.is_ascii_digit())
            };
            if !digits.is_empty() && self.input.peek() == Some(b';') {
                self.input.advance(1);
                let radix = if hex { 16 } else { 10 };
                Some(
                    u32::from_str_radix(&digits, radix)
                        .ok()
                        .filter(|&cp| cp != 0)
                        .and_then(char::from_u32)
                        .unwrap_or('\u{FFFD}'),
                )
            } else {
                None
            }
        } else {
            let name = self.input.take_while(|b| b.is_ascii_alphanumeric());
            if self.input.peek() == Some(b';') {
                let found = entities::lookup_entity(&name);
                if found.is_some() {
                    self.input.advance(1);
                }
                found
            } else if in_attribute {
                // `href="?a=1&copy=2"` keeps its text.
                None
            } else {
                entities::lookup_entity(&name)
            }
        };

        if decoded.is_none() {
            self.input.restore_position(saved);
        }
        decoded
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Document {
        parse_html(input).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn parse_no_implied(input: &str) -> Document {
        let opts = HtmlParseOptions::default().no_implied(true);
        parse_html_with_options(input, &opts).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn names(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.children(parent)
            .map(|id| match &doc.node(id).kind {
                NodeKind::Element { name, .. } => name.clone(),
                NodeKind::Text { content } => format!("#text({content})"),
                NodeKind::Comment { content } => format!("#comment({content})"),
                NodeKind::Document => "#document".to_string(),
            })
            .collect()
    }

    fn element(doc: &Document, tag: &str) -> NodeId {
        std::iter::once(doc.root())
            .chain(doc.descendants(doc.root()))
            .find(|&id| doc.node_name(id) == Some(tag))
            .unwrap_or_else(|| panic!("no <{tag}> in tree"))
    }

    #[test]
    fn test_implied_structure() {
        let doc = parse("<div>x</div>");
        let html = element(&doc, "html");
        assert_eq!(names(&doc, doc.root()), vec!["html"]);
        assert_eq!(names(&doc, html), vec!["head", "body"]);
        assert_eq!(names(&doc, element(&doc, "body")), vec!["div"]);
    }

    #[test]
    fn test_empty_input_still_has_structure() {
        let doc = parse("");
        let html = element(&doc, "html");
        assert_eq!(names(&doc, html), vec!["head", "body"]);
    }

    #[test]
    fn test_explicit_structure_is_not_duplicated() {
        let doc = parse(
            "<!DOCTYPE html><html lang=\"en\"><head><title>T</title></head>\
             <body class=\"main\"><p>Hi</p></body></html>",
        );
        assert_eq!(doc.doctype.as_deref(), Some("html"));
        let html = element(&doc, "html");
        assert_eq!(doc.attribute(html, "lang"), Some("en"));
        assert_eq!(names(&doc, html), vec!["head", "body"]);
        assert_eq!(names(&doc, element(&doc, "head")), vec!["title"]);
        let body = element(&doc, "body");
        assert_eq!(doc.attribute(body, "class"), Some("main"));
        assert_eq!(names(&doc, body), vec!["p"]);
    }

    #[test]
    fn test_head_content_goes_to_head() {
        let doc = parse("<title>T</title><meta charset=utf-8><p>x</p>");
        assert_eq!(names(&doc, element(&doc, "head")), vec!["title", "meta"]);
        assert_eq!(names(&doc, element(&doc, "body")), vec!["p"]);
    }

    #[test]
    fn test_whitespace_preserved_inside_elements() {
        let doc = parse("<div>\n  <span>a</span>\n</div>");
        let div = element(&doc, "div");
        assert_eq!(names(&doc, div), vec!["#text(\n  )", "span", "#text(\n)"]);
    }

    #[test]
    fn test_no_blanks_drops_whitespace_text() {
        let opts = HtmlParseOptions::default().no_blanks(true);
        let doc = parse_html_with_options("<div>\n  <span>a</span>\n</div>", &opts).unwrap();
        assert_eq!(names(&doc, element(&doc, "div")), vec!["span"]);
    }

    #[test]
    fn test_names_are_lowercased() {
        let doc = parse_no_implied("<DIV ID=\"x\" Class=y></div>");
        let div = element(&doc, "div");
        assert_eq!(
            doc.attributes(div),
            &[Attribute::new("id", "x"), Attribute::new("class", "y")]
        );
    }

    #[test]
    fn test_attribute_forms() {
        let doc = parse_no_implied("<input type=text disabled value='a b' data-x = \"1\">");
        let input = element(&doc, "input");
        assert_eq!(
            doc.attributes(input),
            &[
                Attribute::new("type", "text"),
                Attribute::new("disabled", ""),
                Attribute::new("value", "a b"),
                Attribute::new("data-x", "1"),
            ]
        );
    }

    #[test]
    fn test_duplicate_attributes_are_kept() {
        let doc = parse_no_implied("<a id=1 id=2></a>");
        let a = element(&doc, "a");
        assert_eq!(doc.attributes(a).len(), 2);
        assert_eq!(doc.attribute(a, "id"), Some("1"));
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let doc = parse_no_implied("<p>a<br>b<img src=\"x.png\"/>c<span/>d</p>");
        let p = element(&doc, "p");
        assert_eq!(
            names(&doc, p),
            vec!["#text(a)", "br", "#text(b)", "img", "#text(c)", "span", "#text(d)"]
        );
        assert_eq!(doc.attribute(element(&doc, "img"), "src"), Some("x.png"));
    }

    #[test]
    fn test_optional_end_tags() {
        let doc = parse_no_implied("<ul><li>a<li>b</ul><p>one<p>two<div>three</div>");
        assert_eq!(names(&doc, element(&doc, "ul")), vec!["li", "li"]);
        assert_eq!(names(&doc, doc.root()), vec!["ul", "p", "p", "div"]);
    }

    #[test]
    fn test_table_cells_close() {
        let doc = parse_no_implied("<table><tr><td>1<td>2<tr><td>3</table>");
        let table = element(&doc, "table");
        assert_eq!(names(&doc, table), vec!["tr", "tr"]);
        let first_row = doc.first_child(table).unwrap();
        assert_eq!(names(&doc, first_row), vec!["td", "td"]);
    }

    #[test]
    fn test_mismatched_end_tag_closes_inner_elements() {
        let doc = parse_no_implied("<div><span><b>x</div>after");
        assert_eq!(names(&doc, doc.root()), vec!["div", "#text(after)"]);
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = parse_no_implied("<div>a</span>b</div>");
        assert_eq!(names(&doc, element(&doc, "div")), vec!["#text(ab)"]);
    }

    #[test]
    fn test_raw_text_elements() {
        let doc = parse("<script>if (a < b && c) { x = \"</div>\"; }</script><p>&amp;</p>");
        let script = element(&doc, "script");
        assert_eq!(
            names(&doc, script),
            vec!["#text(if (a < b && c) { x = \"</div>\"; })"]
        );
        assert_eq!(names(&doc, element(&doc, "p")), vec!["#text(&)"]);
    }

    #[test]
    fn test_character_references() {
        let doc = parse_no_implied("<p>&lt;&#65;&#x42;&copy &bogus; & x&#0;</p>");
        assert_eq!(
            names(&doc, element(&doc, "p")),
            vec!["#text(<AB\u{a9} &bogus; & x\u{fffd})"]
        );
    }

    #[test]
    fn test_attribute_references_need_semicolon() {
        let doc = parse_no_implied("<a href=\"?a=1&copy=2&amp;b\"></a>");
        assert_eq!(doc.attribute(element(&doc, "a"), "href"), Some("?a=1&copy=2&b"));
    }

    #[test]
    fn test_comments_and_bogus_comments() {
        let doc = parse_no_implied("<div><!-- hi --><![CDATA[x]]><?pi y?></div>");
        assert_eq!(
            names(&doc, element(&doc, "div")),
            vec!["#comment( hi )", "#comment([CDATA[x]])", "#comment(pi y?)"]
        );
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let doc = parse_no_implied("<div><!-- open");
        assert_eq!(names(&doc, element(&doc, "div")), vec!["#comment( open)"]);
    }

    #[test]
    fn test_lone_less_than_is_text() {
        let doc = parse_no_implied("<p>a < b</p>");
        assert_eq!(names(&doc, element(&doc, "p")), vec!["#text(a < b)"]);
    }

    #[test]
    fn test_text_after_body_end_stays_in_body() {
        let doc = parse("<body><p>x</p></body></html>tail");
        let body = element(&doc, "body");
        assert_eq!(names(&doc, body), vec!["p", "#text(tail)"]);
    }

    #[test]
    fn test_depth_limit() {
        let opts = HtmlParseOptions::default().no_implied(true).max_depth(3);
        assert!(parse_html_with_options("<a><b><c></c></b></a>", &opts).is_ok());
        let err = parse_html_with_options("<a><b><c><d></d></c></b></a>", &opts).unwrap_err();
        assert_eq!(err.message, "maximum nesting depth exceeded (3)");
    }

    #[test]
    fn test_depth_counts_implied_elements() {
        let opts = HtmlParseOptions::default().max_depth(3);
        assert!(parse_html_with_options("<div></div>", &opts).is_ok());
        assert!(parse_html_with_options("<div><div></div></div>", &opts).is_err());
    }

    #[test]
    fn test_document_records_peak_depth() {
        let opts = HtmlParseOptions::default().no_implied(true);
        let doc = parse_html_with_options("<a><b></b></a><c><d><e></e></d></c>", &opts).unwrap();
        assert_eq!(doc.depth(), 3);
        assert_eq!(parse("<p>x</p>").depth(), 3);
    }

    #[test]
    fn test_underscore_does_not_start_a_tag() {
        let doc = parse_no_implied("<_x>y");
        assert_eq!(names(&doc, doc.root()), vec!["#text(<_x>y)"]);
    }

    #[test]
    fn test_deep_sibling_runs_do_not_accumulate_depth() {
        let opts = HtmlParseOptions::default().no_implied(true).max_depth(1);
        let input = "<li>a<li>b".repeat(50);
        assert!(parse_html_with_options(&input, &opts).is_ok());
    }
}
