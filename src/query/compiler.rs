//! Query compilation.
//!
//! Turns a [`QuerySpec`] into a single [`QueryNode`] in four stages:
//!
//! 1. **Literal override** - a `literal_query` is parsed as-is and returned
//! 2. **Text** - sanitized search terms become exact-title, title and body clauses
//! 3. **Filter** - tags, ids and content type restrict the text clause
//! 4. **Exclusion** - excluded ids, tags and content type are subtracted
//!
//! Compilation has no side effects besides logging, so one compiler can be
//! shared between threads.

use super::clause::ClauseBuilder;
use super::error::{QueryError, Result};
use super::filter::FilterBuilder;
use super::node::{QueryNode, QueryOp};
use super::parser::{ParseFlags, QueryParser};
use super::planner::{ExecutionContext, SortPlan};
use super::spec::QuerySpec;
use crate::utils::{CompilerConfig, sanitize_terms_with_limit};

/// Compiles query specs against a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Build the query tree for `spec`, using `parser` for free-text parsing
    pub fn compile<P: QueryParser + ?Sized>(&self, spec: &QuerySpec, parser: &P) -> Result<QueryNode> {
        tracing::debug!(spec = %spec.debug_describe(), "compiling query");

        if let Some(literal) = spec.literal_query() {
            tracing::debug!(literal, "using literal query override");
            return parser
                .parse_query(literal, ParseFlags::DEFAULT, "")
                .map_err(QueryError::BadLiteralQuery);
        }

        let text = match spec.search_terms() {
            Some(search_terms) => self.text_clause(spec, search_terms, parser)?,
            None => None,
        };

        let filters = FilterBuilder::new(&self.config.prefixes);

        let mut query = match (text, filters.filter_clause(spec)) {
            (Some(text), Some(filter)) => QueryNode::pair(QueryOp::Filter, text, filter),
            (Some(text), None) => text,
            (None, Some(filter)) => filter,
            (None, None) => QueryNode::MatchAll,
        };

        if let Some(exclusion) = filters.exclusion_clause(spec) {
            tracing::trace!("applying exclusion clause");
            query = QueryNode::pair(QueryOp::AndNot, query, exclusion);
        }

        tracing::debug!(query = %query, nodes = query.node_count(), "compiled query");
        Ok(query)
    }

    fn text_clause<P: QueryParser + ?Sized>(
        &self,
        spec: &QuerySpec,
        search_terms: &str,
        parser: &P,
    ) -> Result<Option<QueryNode>> {
        let max_len = self.config.max_term_length;
        let terms = sanitize_terms_with_limit(search_terms, max_len);
        let corrected = spec
            .corrected_terms()
            .map(|text| sanitize_terms_with_limit(text, max_len));

        tracing::trace!(?terms, ?corrected, "sanitized search terms");

        ClauseBuilder::new(parser, &self.config.prefixes, spec.mode(), spec.match_())
            .text_clause(&terms, corrected.as_deref())
    }

    /// Apply the sort or relevance cutoff for `spec` to `ctx`
    pub fn configure_execution<C: ExecutionContext + ?Sized>(&self, spec: &QuerySpec, ctx: &mut C) {
        let plan = SortPlan::for_spec(spec, &self.config);
        tracing::trace!(?plan, "configuring execution");
        plan.apply(ctx);
    }
}

/// Compile `spec` with the default configuration
pub fn compile<P: QueryParser + ?Sized>(spec: &QuerySpec, parser: &P) -> Result<QueryNode> {
    QueryCompiler::default().compile(spec, parser)
}
