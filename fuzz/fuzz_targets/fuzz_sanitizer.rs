#![no_main]

use knowledge_query::utils::{MAX_TERM_LENGTH, sanitize_terms};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    for term in sanitize_terms(data) {
        assert!(!term.is_empty());
        assert!(term.len() <= MAX_TERM_LENGTH);
        assert!(!term.contains(['(', ')', '+', '-', '\'', '"', ';']));
        assert!(!term.chars().any(char::is_whitespace));
    }
});
