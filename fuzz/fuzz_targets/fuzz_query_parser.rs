#![no_main]

use knowledge_query::query::{ParseFlags, QueryParser, StandardParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, bool)| {
    // Arbitrary query text must produce a tree or an error, never a panic
    let (text, partial) = data;
    let flags = if partial { ParseFlags::PARTIAL } else { ParseFlags::DEFAULT };
    let _ = StandardParser::default().parse_query(text, flags, "S");
});
