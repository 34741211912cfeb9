#![no_main]

use arbitrary::Arbitrary;
use knowledge_query::query::{QueryMatch, QueryMode, QuerySpec, StandardParser, compile};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    search_terms: Option<&'a str>,
    corrected_terms: Option<&'a str>,
    standard: bool,
    synopsis: bool,
    tags: Vec<&'a str>,
    ids: Vec<&'a str>,
}

fuzz_target!(|input: Input| {
    let mut builder = QuerySpec::builder()
        .tags_match_any(input.tags)
        .ids(input.ids);
    if let Some(terms) = input.search_terms {
        builder = builder.search_terms(terms);
    }
    if let Some(terms) = input.corrected_terms {
        builder = builder.corrected_terms(terms);
    }
    if input.standard {
        builder = builder.mode(QueryMode::Standard);
    }
    if input.synopsis {
        builder = builder.match_(QueryMatch::TitleAndSynopsis);
    }

    // Sanitized terms never carry parser syntax, so compilation must succeed
    let spec = builder.build();
    compile(&spec, &StandardParser::default()).expect("sanitized terms failed to parse");
});
