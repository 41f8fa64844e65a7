//! End-to-end tests for parsing and searching documents.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use oxsoup::html::HtmlParseOptions;
use oxsoup::{parse_document, Attributes, Document, Element, SoupError, SoupOptions, Traversal};

const FIXTURE: &str = "<div name=\"outerDiv\">
\t\t<div id=\"divId1\" class=\"class1\">
\t\t
\t\t</div>
\t\t<div id=\"divId2\" class=\"class1\">
\t\t
\t\t</div>
\t\t<div id=\"divId3\" class=\"class2\">
\t\t
\t\t</div>
\t</div>";

const COMPACT: &str = "<div name=\"outerDiv\"><div id=\"divId1\" class=\"class1\"></div>\
                       <div id=\"divId2\" class=\"class1\"></div>\
                       <div id=\"divId3\" class=\"class2\"></div></div>";

fn ids(elements: &[Element<'_>]) -> Vec<String> {
    elements
        .iter()
        .map(|e| e.attribute_or_empty("id").0.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_parses() {
    let doc = parse_document(FIXTURE).unwrap();
    assert!(doc.root_element().is_some());
    assert_eq!(doc.find_all_by_tag("div").len(), 4);
}

#[test]
fn test_truncated_end_tag_is_invalid_markup() {
    let err = parse_document("<div></").unwrap_err();
    assert!(matches!(err, SoupError::InvalidMarkup { .. }));
    assert_eq!(err.to_string(), "invalid html: <div></");
    let cause = err.markup_error().unwrap();
    assert_eq!(cause.message, "unexpected end of input after </");
}

#[test]
fn test_invalid_markup_exposes_source() {
    use std::error::Error as _;

    let err = parse_document("<p>\n<a href=\"x></a></p>").unwrap_err();
    let source = err.source().unwrap().to_string();
    assert_eq!(source, "unterminated value for attribute href at 2:9");
}

#[test]
fn test_depth_limit_is_parse_failure() {
    let depth = 300;
    let input = format!("{}{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let err = parse_document(&input).unwrap_err();
    let SoupError::ParseFailure(inner) = &err else {
        panic!("expected ParseFailure, got {err:?}");
    };
    assert!(inner.message.contains("depth"), "{}", inner.message);
}

#[test]
fn test_deep_document_with_iterative_search() {
    let depth = 5_000;
    let input = format!(
        "{}<span id=\"leaf\"></span>{}",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let opts = SoupOptions::default()
        .max_depth(10_000)
        .traversal(Traversal::Iterative);
    let doc = Document::parse_with_options(&input, &opts).unwrap();
    let leaf = doc.find_first_by_tag("span").unwrap();
    assert_eq!(leaf.get_attribute("id"), Some("leaf"));
    assert_eq!(doc.find_all_by_tag("div").len(), depth);
}

#[test]
fn test_very_deep_document_serializes() {
    let depth = 100_000;
    let body = format!(
        "{}<span id=\"leaf\"></span>{}",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let opts = SoupOptions::default()
        .max_depth(200_000)
        .traversal(Traversal::Iterative);
    let doc = Document::parse_with_options(&body, &opts).unwrap();
    assert_eq!(doc.depth(), u32::try_from(depth).unwrap() + 3);

    let rendered = doc.serialize().unwrap();
    assert_eq!(rendered, format!("<html><head></head><body>{body}</body></html>"));

    let outer = doc.find_first_by_tag("div").unwrap();
    assert_eq!(outer.to_string(), body);
}

#[test]
fn test_very_deep_document_with_default_traversal() {
    let depth = 100_000;
    let input = format!(
        "{}<span id=\"leaf\"></span>{}",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let doc = Document::parse_with_options(&input, &SoupOptions::default().max_depth(200_000))
        .unwrap();
    assert_eq!(doc.traversal(), Traversal::Recursive);
    let leaf = doc.find_first_by_tag("span").unwrap();
    assert_eq!(leaf.get_attribute("id"), Some("leaf"));
    assert_eq!(doc.find_all_by_tag("div").len(), depth);
}

// ---------------------------------------------------------------------------
// Searching the fixture
// ---------------------------------------------------------------------------

#[test]
fn test_find_all_by_tag_and_class() {
    for input in [FIXTURE, COMPACT] {
        let doc = parse_document(input).unwrap();
        let found = doc.find_all("div", &Attributes::from([("class", "class1")]));
        assert_eq!(ids(&found), vec!["divId1", "divId2"]);
    }
}

#[test]
fn test_find_first_missing_is_none() {
    let doc = parse_document(COMPACT).unwrap();
    let found = doc.find_first("div", &Attributes::from([("id", "testDiv5")]));
    assert!(found.is_none());
}

#[test]
fn test_find_first_by_id() {
    let doc = parse_document(FIXTURE).unwrap();
    let found = doc
        .find_first("div", &Attributes::from([("id", "divId1")]))
        .unwrap();
    assert_eq!(found.tag_name(), "div");
    assert_eq!(found.attribute_or_empty("id"), ("divId1", true));
}

#[test]
fn test_outer_div_has_no_class() {
    let doc = parse_document(FIXTURE).unwrap();
    let outer = doc.find_first_by_tag("div").unwrap();
    assert_eq!(outer.attribute_or_empty("name"), ("outerDiv", true));
    assert_eq!(outer.attribute_or_empty("class"), ("", false));
    assert_eq!(outer.get_attribute("class"), None);
}

#[test]
fn test_find_by_attributes_only() {
    let doc = parse_document(FIXTURE).unwrap();
    let found = doc.find_all_by_attributes(&Attributes::from([("class", "class2")]));
    assert_eq!(ids(&found), vec!["divId3"]);
    let first = doc
        .find_first_by_attributes(&Attributes::from([("name", "outerDiv")]))
        .unwrap();
    assert_eq!(first.children().count(), 3);
}

#[test]
fn test_empty_attribute_filter_matches_first_element() {
    let doc = parse_document(COMPACT).unwrap();
    let first = doc.find_first_by_attributes(&Attributes::new()).unwrap();
    assert_eq!(first.tag_name(), "html");
    let outer = doc.find_first_by_tag("div").unwrap();
    assert_eq!(outer.find_first_by_attributes(&Attributes::new()), Some(outer));
}

#[test]
fn test_element_search_considers_itself() {
    let doc = parse_document(FIXTURE).unwrap();
    let outer = doc.find_first_by_tag("div").unwrap();
    assert_eq!(outer.find_first_by_tag("div"), Some(outer));
    assert_eq!(outer.find_all_by_tag("div").len(), 4);
    let inner = outer
        .find_first_by_attributes(&Attributes::from([("id", "divId2")]))
        .unwrap();
    assert_eq!(ids(&inner.find_all_by_tag("div")), vec!["divId2"]);
}

#[test]
fn test_nested_matches_outer_before_inner() {
    let doc = parse_document(
        "<section class=\"k\" id=\"a\"><section class=\"k\" id=\"b\">\
         <section class=\"k\" id=\"c\"></section></section></section>",
    )
    .unwrap();
    let found = doc.find_all("section", &Attributes::from([("class", "k")]));
    assert_eq!(ids(&found), vec!["a", "b", "c"]);
}

#[test]
fn test_duplicate_attributes_lookup_first() {
    let doc = parse_document("<a id=\"one\" id=\"two\"></a>").unwrap();
    let a = doc.find_first_by_tag("a").unwrap();
    assert_eq!(a.get_attribute("id"), Some("one"));
    assert_eq!(a.attributes().len(), 2);
}

#[test]
fn test_iterative_matches_recursive() {
    let input = format!("<main>{}</main>", COMPACT.repeat(20));
    let recursive = parse_document(&input).unwrap();
    let iterative =
        Document::parse_with_options(&input, &SoupOptions::default().traversal(Traversal::Iterative))
            .unwrap();

    let attrs = Attributes::from([("class", "class1")]);
    let a: Vec<_> = recursive.find_all("div", &attrs).iter().map(Element::node_id).collect();
    let b: Vec<_> = iterative.find_all("div", &attrs).iter().map(Element::node_id).collect();
    assert_eq!(a.len(), 40);
    assert_eq!(a, b);
}

#[test]
fn test_case_sensitive_query_against_lowercased_tree() {
    let doc = parse_document("<DIV CLASS=\"Item\"></DIV>").unwrap();
    assert!(doc.find_first_by_tag("DIV").is_none());
    let div = doc.find_first_by_tag("div").unwrap();
    assert_eq!(div.get_attribute("class"), Some("Item"));
    assert!(doc
        .find_first_by_attributes(&Attributes::from([("class", "item")]))
        .is_none());
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_outer_div_round_trips() {
    let doc = parse_document(FIXTURE).unwrap();
    let outer = doc.find_first_by_tag("div").unwrap();
    assert_eq!(outer.serialize().unwrap(), FIXTURE);
    assert_eq!(outer.to_string(), FIXTURE);
}

#[test]
fn test_document_serialize_includes_implied_structure() {
    let opts = SoupOptions::default().html(HtmlParseOptions::default().no_implied(true));
    let doc = Document::parse_with_options(COMPACT, &opts).unwrap();
    assert_eq!(doc.serialize().unwrap(), COMPACT);

    let doc = parse_document("<title>t</title><p>x</p>").unwrap();
    assert_eq!(
        doc.serialize().unwrap(),
        "<html><head><title>t</title></head><body><p>x</p></body></html>"
    );
}

#[test]
fn test_documents_are_shareable_across_threads() {
    let doc = parse_document(COMPACT).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = ["divId1", "divId2", "divId3"]
            .into_iter()
            .map(|id| {
                let doc = &doc;
                scope.spawn(move || {
                    doc.find_first_by_attributes(&Attributes::from([("id", id)]))
                        .map(|e| e.node_id())
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_some());
        }
    });
}
