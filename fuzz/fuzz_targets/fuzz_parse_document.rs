#![no_main]
use libfuzzer_sys::fuzz_target;
use oxsoup::{Document, SoupOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Neither the pre-check nor the parser may panic on any input
        let _ = Document::parse(s);
        if let Ok(doc) = Document::parse_with_options(s, &SoupOptions::default().validate(false)) {
            let _ = doc.serialize();
        }
    }
});
