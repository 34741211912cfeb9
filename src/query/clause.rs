//! Text clauses: exact-title, title and body matching for search terms.

use super::error::{ClauseStage, QueryError, Result};
use super::node::{QueryNode, QueryOp};
use super::parser::{ParseFlags, QueryParser};
use super::spec::{QueryMatch, QueryMode};
use crate::utils::{FieldPrefixes, codepoint_len};

/// Builds field-scoped sub-queries from sanitized terms
pub struct ClauseBuilder<'a, P: QueryParser + ?Sized> {
    parser: &'a P,
    prefixes: &'a FieldPrefixes,
    mode: QueryMode,
    match_: QueryMatch,
}

impl<'a, P: QueryParser + ?Sized> ClauseBuilder<'a, P> {
    pub fn new(parser: &'a P, prefixes: &'a FieldPrefixes, mode: QueryMode, match_: QueryMatch) -> Self {
        Self {
            parser,
            prefixes,
            mode,
            match_,
        }
    }

    /// Full text clause for the given terms, `None` when there is nothing to
    /// search for.
    ///
    /// `corrected` holds the typo-corrected terms, if a correction was made.
    pub fn text_clause(
        &self,
        terms: &[String],
        corrected: Option<&[String]>,
    ) -> Result<Option<QueryNode>> {
        if terms.is_empty() {
            return Ok(None);
        }

        // A lone character is only matched exactly, never expanded
        if let [term] = terms {
            if codepoint_len(term) == 1 {
                return Ok(Some(QueryNode::Term(format!(
                    "{}{}",
                    self.prefixes.exact_title, term
                ))));
            }
        }

        let exact_title = self.exact_title_clause(terms)?;
        let title = self.title_clause(terms, corrected)?;
        let mut clause = QueryNode::join_optional(QueryOp::Or, exact_title, title);

        if self.match_ == QueryMatch::TitleAndSynopsis {
            let body = self.body_clause(terms)?;
            clause = QueryNode::join_optional(QueryOp::Or, clause, body);

            if let Some(corrected) = corrected {
                let corrected_body = self.body_clause(corrected)?;
                clause = QueryNode::join_optional(QueryOp::Or, clause, corrected_body);
            }
        }

        Ok(clause)
    }

    /// All terms joined into one compound token matched against the exact title
    pub fn exact_title_clause(&self, terms: &[String]) -> Result<Option<QueryNode>> {
        if terms.is_empty() {
            return Ok(None);
        }

        let joined = terms.join("_");
        let flags = match self.mode {
            QueryMode::Incremental => ParseFlags::PARTIAL,
            QueryMode::Standard => ParseFlags::DEFAULT,
        };

        tracing::trace!(text = %joined, ?flags, "exact-title clause");
        self.parse(ClauseStage::ExactTitle, &joined, flags, &self.prefixes.exact_title)
            .map(Some)
    }

    /// Title match on the original terms, or'ed with the corrected terms
    pub fn title_clause(
        &self,
        terms: &[String],
        corrected: Option<&[String]>,
    ) -> Result<Option<QueryNode>> {
        let base = self.title_part(terms)?;
        let corrected = match corrected {
            Some(corrected) => self.title_part(corrected)?,
            None => None,
        };
        Ok(QueryNode::join_optional(QueryOp::Or, base, corrected))
    }

    fn title_part(&self, terms: &[String]) -> Result<Option<QueryNode>> {
        if terms.is_empty() {
            return Ok(None);
        }

        let text = terms.join(" ");
        tracing::trace!(text = %text, "title clause");
        self.parse(ClauseStage::Title, &text, ParseFlags::PARTIAL, &self.prefixes.title)
            .map(Some)
    }

    /// Unprefixed match against the whole document body
    pub fn body_clause(&self, terms: &[String]) -> Result<Option<QueryNode>> {
        if terms.is_empty() {
            return Ok(None);
        }

        let text = terms.join(" ");
        tracing::trace!(text = %text, "body clause");
        self.parse(ClauseStage::Body, &text, ParseFlags::PARTIAL, "")
            .map(Some)
    }

    fn parse(&self, stage: ClauseStage, text: &str, flags: ParseFlags, prefix: &str) -> Result<QueryNode> {
        self.parser
            .parse_query(text, flags, prefix)
            .map_err(|source| QueryError::Parse { stage, source })
    }
}
