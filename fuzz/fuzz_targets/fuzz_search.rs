#![no_main]
use libfuzzer_sys::fuzz_target;
use oxsoup::{Attributes, Document, SoupOptions, Traversal};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // First line is the query tag, second an attribute name, rest the document
    let mut parts = s.splitn(3, '\n');
    let (Some(tag), Some(attr), Some(html)) = (parts.next(), parts.next(), parts.next()) else {
        return;
    };
    let recursive = SoupOptions::default().validate(false);
    let iterative = recursive.clone().traversal(Traversal::Iterative);
    let (Ok(a), Ok(b)) = (
        Document::parse_with_options(html, &recursive),
        Document::parse_with_options(html, &iterative),
    ) else {
        return;
    };

    let attrs = Attributes::from([(attr, "")]);
    let found_a: Vec<_> = a.find_all(tag, &attrs).iter().map(|e| e.node_id()).collect();
    let found_b: Vec<_> = b.find_all(tag, &attrs).iter().map(|e| e.node_id()).collect();
    assert_eq!(found_a, found_b);
    assert_eq!(
        a.find_first_by_tag(tag).map(|e| e.node_id()),
        b.find_first_by_tag(tag).map(|e| e.node_id())
    );
});
