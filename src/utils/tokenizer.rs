use regex::Regex;
use std::sync::LazyLock;

/// Maximum term length accepted by the backend, in bytes.
/// Longer terms are truncated on a codepoint boundary.
pub const MAX_TERM_LENGTH: usize = 245;

/// Characters with meaning in the backend query syntax
static SYNTAX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[()+\-'"]"#).expect("valid syntax regex"));

/// Reserved boolean operator keywords (uppercase only)
static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("AND|OR|NOT|XOR|NEAR|ADJ").expect("valid operator regex"));

static DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-;]+").expect("valid delimiter regex"));

/// Sanitize and split user query text into backend-safe terms.
///
/// Syntax characters are stripped, operator keywords are lowercased so they
/// are searched as words, and the rest is split on whitespace, hyphens and
/// semicolons. Every returned term is non-empty and at most
/// [`MAX_TERM_LENGTH`] bytes.
pub fn sanitize_terms(query: &str) -> Vec<String> {
    sanitize_terms_with_limit(query, MAX_TERM_LENGTH)
}

/// [`sanitize_terms`] with an explicit byte limit per term
pub fn sanitize_terms_with_limit(query: &str, max_len: usize) -> Vec<String> {
    let without_syntax = SYNTAX_RE.replace_all(query, "");
    let without_operators =
        OPERATOR_RE.replace_all(&without_syntax, |caps: &regex::Captures| caps[0].to_lowercase());

    DELIMITER_RE
        .split(&without_operators)
        .map(|t| truncate_term(t, max_len))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cut `term` to at most `max_len` bytes without splitting a codepoint
pub fn truncate_term(term: &str, max_len: usize) -> &str {
    if term.len() <= max_len {
        return term;
    }

    let mut end = max_len;
    while !term.is_char_boundary(end) {
        end -= 1;
    }
    &term[..end]
}

/// Number of codepoints in a term
pub fn codepoint_len(term: &str) -> usize {
    term.chars().count()
}
