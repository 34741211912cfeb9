use super::error::ParseFailure;
use super::node::{QueryNode, QueryOp};
use crate::utils::FieldPrefixes;
use std::collections::BTreeMap;

/// Parser feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseFlags {
    /// Expand the final term as a prefix wildcard (as-you-type search)
    pub partial: bool,
}

impl ParseFlags {
    pub const DEFAULT: ParseFlags = ParseFlags { partial: false };
    pub const PARTIAL: ParseFlags = ParseFlags { partial: true };
}

/// Query-string parsing context of the search backend.
///
/// Implementations must be usable from several threads at once when a spec
/// is compiled concurrently; the compiler only ever takes `&self`.
pub trait QueryParser {
    /// Parse `text`, prefixing every bare term with `prefix`
    fn parse_query(
        &self,
        text: &str,
        flags: ParseFlags,
        prefix: &str,
    ) -> Result<QueryNode, ParseFailure>;
}

impl<P: QueryParser + ?Sized> QueryParser for &P {
    fn parse_query(
        &self,
        text: &str,
        flags: ParseFlags,
        prefix: &str,
    ) -> Result<QueryNode, ParseFailure> {
        (**self).parse_query(text, flags, prefix)
    }
}

/// Reference parser for the backend query language.
///
/// Supports `OR`, `AND`, `NOT`, `AND NOT` (uppercase only), parentheses,
/// quoted phrases and `field:value` for registered fields. Adjacent terms
/// are joined with `OR`. Parentheses nest at most [`MAX_DEPTH`] deep.
///
/// The default parser has no registered fields, so `tag:x` in search text
/// stays a plain term of the caller's field. A parser built with
/// [`StandardParser::from_prefixes`] moves `tag:x` into the tag field no
/// matter which prefix the caller passed, exactly like a backend parser with
/// registered prefixes. Use it only for text where field syntax is wanted,
/// such as a literal query.
#[derive(Debug, Clone, Default)]
pub struct StandardParser {
    fields: BTreeMap<String, String>,
}

/// Maximum parenthesis nesting accepted by [`StandardParser`]
pub const MAX_DEPTH: usize = 256;

impl StandardParser {
    /// Parser with no registered fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with the field names `title`, `exact`, `tag`, `id` and `type`
    /// mapped to `prefixes`
    pub fn from_prefixes(prefixes: &FieldPrefixes) -> Self {
        let mut parser = Self::new();
        parser.add_prefix("title", &prefixes.title);
        parser.add_prefix("exact", &prefixes.exact_title);
        parser.add_prefix("tag", &prefixes.tag);
        parser.add_prefix("id", &prefixes.id);
        parser.add_prefix("type", &prefixes.content_type);
        parser
    }

    /// Map `field:value` in query text to the term `{prefix}value`
    pub fn add_prefix(&mut self, field: &str, prefix: &str) {
        self.fields.insert(field.to_string(), prefix.to_string());
    }
}

impl QueryParser for StandardParser {
    fn parse_query(
        &self,
        text: &str,
        flags: ParseFlags,
        prefix: &str,
    ) -> Result<QueryNode, ParseFailure> {
        let mut parser = Parser {
            input: text,
            pos: 0,
            depth: 0,
            prefix,
            flags,
            fields: &self.fields,
        };
        parser.parse()
    }
}

const OPERATORS: [&str; 4] = ["AND", "OR", "NOT", "XOR"];

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Open parentheses around the current position
    depth: usize,
    prefix: &'a str,
    flags: ParseFlags,
    fields: &'a BTreeMap<String, String>,
}

impl<'a> Parser<'a> {
    fn parse(&mut self) -> Result<QueryNode, ParseFailure> {
        self.skip_whitespace();
        if self.is_eof() {
            return Ok(QueryNode::MatchNothing);
        }

        let node = self.parse_or()?;

        self.skip_whitespace();
        if !self.is_eof() {
            // Only a stray ')' stops parse_or before the end
            return Err(ParseFailure::new("unbalanced parenthesis", self.pos));
        }
        Ok(node)
    }

    fn parse_or(&mut self) -> Result<QueryNode, ParseFailure> {
        let mut nodes = vec![self.parse_xor()?];

        while self.consume_operator("OR") {
            nodes.push(self.parse_xor()?);
        }

        Ok(collapse(QueryOp::Or, nodes))
    }

    fn parse_xor(&mut self) -> Result<QueryNode, ParseFailure> {
        let node = self.parse_and()?;

        let op_pos = self.pos;
        if self.consume_operator("XOR") {
            return Err(ParseFailure::new("XOR is not supported", op_pos));
        }
        Ok(node)
    }

    fn parse_and(&mut self) -> Result<QueryNode, ParseFailure> {
        let mut nodes = vec![self.parse_group()?];

        loop {
            if self.consume_operator("AND") {
                if self.consume_operator("NOT") {
                    let right = self.parse_group()?;
                    let left = collapse(QueryOp::And, std::mem::take(&mut nodes));
                    nodes.push(QueryNode::pair(QueryOp::AndNot, left, right));
                } else {
                    nodes.push(self.parse_group()?);
                }
            } else if self.consume_operator("NOT") {
                let right = self.parse_group()?;
                let left = collapse(QueryOp::And, std::mem::take(&mut nodes));
                nodes.push(QueryNode::pair(QueryOp::AndNot, left, right));
            } else {
                break;
            }
        }

        Ok(collapse(QueryOp::And, nodes))
    }

    /// Run of adjacent primaries joined by the default operator
    fn parse_group(&mut self) -> Result<QueryNode, ParseFailure> {
        let mut nodes = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_eof() || self.peek_char() == Some(')') || self.at_operator() {
                break;
            }
            nodes.push(self.parse_primary()?);
        }

        if nodes.is_empty() {
            return Err(ParseFailure::new("expected a term", self.pos));
        }
        Ok(collapse(QueryOp::Or, nodes))
    }

    fn parse_primary(&mut self) -> Result<QueryNode, ParseFailure> {
        self.skip_whitespace();

        if self.peek_char() == Some('(') {
            let open = self.pos;
            if self.depth >= MAX_DEPTH {
                return Err(ParseFailure::new("query nested too deeply", open));
            }
            self.advance();
            self.depth += 1;
            let node = self.parse_or()?;
            self.depth -= 1;
            self.skip_whitespace();
            if !self.consume_char(')') {
                return Err(ParseFailure::new("unbalanced parenthesis", open));
            }
            return Ok(node);
        }

        if self.peek_char() == Some('"') {
            return self.parse_phrase();
        }

        Ok(self.parse_term())
    }

    fn parse_phrase(&mut self) -> Result<QueryNode, ParseFailure> {
        let open = self.pos;
        self.consume_char('"');
        let start = self.pos;

        while !self.is_eof() && self.peek_char() != Some('"') {
            self.advance();
        }

        if !self.consume_char('"') {
            return Err(ParseFailure::new("unterminated phrase", open));
        }

        let words: Vec<QueryNode> = self.input[start..self.pos - 1]
            .split_whitespace()
            .map(|w| QueryNode::Term(format!("{}{}", self.prefix, w.to_lowercase())))
            .collect();

        Ok(match words.len() {
            0 => QueryNode::MatchNothing,
            _ => collapse(QueryOp::And, words),
        })
    }

    fn parse_term(&mut self) -> QueryNode {
        let start = self.pos;

        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }
            self.advance();
        }

        let word = &self.input[start..self.pos];

        // Registered field prefix
        if let Some((field, value)) = word.split_once(':') {
            if let Some(field_prefix) = self.fields.get(field) {
                if !value.is_empty() {
                    return QueryNode::Term(format!("{}{}", field_prefix, value.to_lowercase()));
                }
            }
        }

        let term = format!("{}{}", self.prefix, word.to_lowercase());
        if self.flags.partial && self.is_eof() {
            QueryNode::pair(QueryOp::Or, QueryNode::Wildcard(term.clone()), QueryNode::Term(term))
        } else {
            QueryNode::Term(term)
        }
    }

    /// Check for an operator keyword at the current token boundary
    fn at_operator(&self) -> bool {
        OPERATORS.iter().any(|op| self.keyword_len(op).is_some())
    }

    fn keyword_len(&self, keyword: &str) -> Option<usize> {
        let rest = self.remaining();
        if !rest.starts_with(keyword) {
            return None;
        }
        match rest[keyword.len()..].chars().next() {
            None => Some(keyword.len()),
            Some(c) if c.is_whitespace() || c == '(' || c == '"' => Some(keyword.len()),
            Some(_) => None,
        }
    }

    fn consume_operator(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        match self.keyword_len(keyword) {
            Some(len) => {
                self.pos += len;
                true
            }
            None => false,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map(|c| c.is_whitespace()).unwrap_or(false) {
            self.advance();
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }
}

fn collapse(op: QueryOp, mut nodes: Vec<QueryNode>) -> QueryNode {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        QueryNode::Combine(op, nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> QueryNode {
        StandardParser::default()
            .parse_query(text, ParseFlags::DEFAULT, "")
            .unwrap()
    }

    fn term(t: &str) -> QueryNode {
        QueryNode::term(t)
    }

    #[test]
    fn test_simple_term() {
        assert_eq!(parse("hello"), term("hello"));
    }

    #[test]
    fn test_terms_are_lowercased_and_prefixed() {
        let node = StandardParser::default()
            .parse_query("Hello", ParseFlags::DEFAULT, "S")
            .unwrap();
        assert_eq!(node, term("Shello"));
    }

    #[test]
    fn test_default_operator_is_or() {
        assert_eq!(
            parse("foo bar"),
            QueryNode::Combine(QueryOp::Or, vec![term("foo"), term("bar")])
        );
    }

    #[test]
    fn test_and_query() {
        assert_eq!(
            parse("foo AND bar AND baz"),
            QueryNode::Combine(QueryOp::And, vec![term("foo"), term("bar"), term("baz")])
        );
    }

    #[test]
    fn test_or_binds_looser_than_and() {
        assert_eq!(
            parse("a AND b OR c"),
            QueryNode::Combine(
                QueryOp::Or,
                vec![
                    QueryNode::Combine(QueryOp::And, vec![term("a"), term("b")]),
                    term("c"),
                ]
            )
        );
    }

    #[test]
    fn test_not_query() {
        assert_eq!(
            parse("foo NOT bar"),
            QueryNode::pair(QueryOp::AndNot, term("foo"), term("bar"))
        );
        assert_eq!(
            parse("foo AND NOT bar"),
            QueryNode::pair(QueryOp::AndNot, term("foo"), term("bar"))
        );
    }

    #[test]
    fn test_lowercase_operators_are_terms() {
        assert_eq!(
            parse("foo and bar"),
            QueryNode::Combine(QueryOp::Or, vec![term("foo"), term("and"), term("bar")])
        );
    }

    #[test]
    fn test_operator_prefix_of_word_is_term() {
        assert_eq!(parse("ORANGE"), term("orange"));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            parse("(a OR b) AND c"),
            QueryNode::Combine(
                QueryOp::And,
                vec![
                    QueryNode::Combine(QueryOp::Or, vec![term("a"), term("b")]),
                    term("c"),
                ]
            )
        );
    }

    #[test]
    fn test_phrase_query() {
        assert_eq!(
            parse("\"hello world\""),
            QueryNode::Combine(QueryOp::And, vec![term("hello"), term("world")])
        );
    }

    #[test]
    fn test_field_filter() {
        let parser = StandardParser::from_prefixes(&FieldPrefixes::default());
        let parse = |text: &str| parser.parse_query(text, ParseFlags::DEFAULT, "").unwrap();
        assert_eq!(parse("tag:Animals"), term("Kanimals"));
        assert_eq!(parse("title:cat"), term("Scat"));
        assert_eq!(parse("type:video"), term("Tvideo"));
    }

    #[test]
    fn test_default_parser_keeps_field_syntax_in_caller_field() {
        let node = StandardParser::default()
            .parse_query("tag:secret", ParseFlags::DEFAULT, "S")
            .unwrap();
        assert_eq!(node, term("Stag:secret"));
    }

    #[test]
    fn test_unknown_field_is_literal() {
        assert_eq!(parse("foo:bar"), term("foo:bar"));
    }

    #[test]
    fn test_partial_expands_final_term() {
        let node = StandardParser::default()
            .parse_query("cat do", ParseFlags::PARTIAL, "S")
            .unwrap();
        assert_eq!(
            node,
            QueryNode::Combine(
                QueryOp::Or,
                vec![
                    term("Scat"),
                    QueryNode::pair(QueryOp::Or, QueryNode::wildcard("Sdo"), term("Sdo")),
                ]
            )
        );
    }

    #[test]
    fn test_partial_skips_after_trailing_space() {
        let node = StandardParser::default()
            .parse_query("cat ", ParseFlags::PARTIAL, "S")
            .unwrap();
        assert_eq!(node, term("Scat"));
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(parse(""), QueryNode::MatchNothing);
        assert_eq!(parse("   "), QueryNode::MatchNothing);
    }

    #[test]
    fn test_errors() {
        let parser = StandardParser::default();
        for bad in ["(foo", "foo)", "foo AND", "NOT foo", "\"open", "a XOR b", "()"] {
            assert!(
                parser.parse_query(bad, ParseFlags::DEFAULT, "").is_err(),
                "expected error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let parser = StandardParser::default();
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(
            parser.parse_query(&nested(MAX_DEPTH), ParseFlags::DEFAULT, "").unwrap(),
            term("a")
        );

        let err = parser
            .parse_query(&nested(MAX_DEPTH + 1), ParseFlags::DEFAULT, "")
            .unwrap_err();
        assert_eq!(err.message, "query nested too deeply");
        assert_eq!(err.position, MAX_DEPTH);

        // Far past the limit fails the same way instead of exhausting the stack
        assert!(parser.parse_query(&nested(30_000), ParseFlags::DEFAULT, "").is_err());
    }

    #[test]
    fn test_error_position() {
        let err = StandardParser::default()
            .parse_query("foo AND", ParseFlags::DEFAULT, "")
            .unwrap_err();
        assert_eq!(err.position, 7);
    }

    #[test]
    fn test_multibyte_terms() {
        assert_eq!(parse("ÉCOLE"), term("école"));
    }
}
