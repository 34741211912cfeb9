//! Inclusion and exclusion filters built from tags, ids and content types.

use super::node::{QueryNode, QueryOp};
use super::spec::QuerySpec;
use crate::identifier::extract_content_hash;
use crate::utils::FieldPrefixes;
use std::collections::BTreeSet;

/// Builds the boolean restriction sub-queries of a spec
pub struct FilterBuilder<'a> {
    prefixes: &'a FieldPrefixes,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(prefixes: &'a FieldPrefixes) -> Self {
        Self { prefixes }
    }

    /// Restriction every result must satisfy, `None` when the spec has none
    pub fn filter_clause(&self, spec: &QuerySpec) -> Option<QueryNode> {
        let clauses: Vec<QueryNode> = [
            self.tags_clause(spec.tags_match_any(), QueryOp::Or),
            self.tags_clause(spec.tags_match_all(), QueryOp::And),
            self.ids_clause(spec.ids()),
            self.content_type_clause(spec.content_type()),
        ]
        .into_iter()
        .flatten()
        .collect();

        and_all(clauses)
    }

    /// Documents to remove from the results, `None` when nothing is excluded
    pub fn exclusion_clause(&self, spec: &QuerySpec) -> Option<QueryNode> {
        let clauses: Vec<QueryNode> = [
            self.ids_clause(spec.excluded_ids()),
            self.tags_clause(spec.excluded_tags(), QueryOp::Or),
            self.content_type_clause(spec.excluded_content_type()),
        ]
        .into_iter()
        .flatten()
        .collect();

        and_all(clauses)
    }

    /// One tag term per tag, e.g. `[foo, bar]` => `Kfoo OR Kbar`
    pub fn tags_clause(&self, tags: &BTreeSet<String>, op: QueryOp) -> Option<QueryNode> {
        if tags.is_empty() {
            return None;
        }
        Some(QueryNode::for_terms(op, &self.prefixes.tag, tags))
    }

    /// One id term per resolvable id, joined with `OR`.
    ///
    /// Ids that cannot be resolved are dropped with a warning. If none can
    /// be resolved the clause matches nothing.
    pub fn ids_clause(&self, ids: &[String]) -> Option<QueryNode> {
        if ids.is_empty() {
            return None;
        }

        let hashes: Vec<String> = ids
            .iter()
            .filter_map(|id| {
                let hash = extract_content_hash(id);
                if hash.is_none() {
                    tracing::warn!(id = %id, "unexpected id structure in query, skipping");
                }
                hash
            })
            .collect();

        if hashes.is_empty() {
            return Some(QueryNode::MatchNothing);
        }
        Some(QueryNode::for_terms(QueryOp::Or, &self.prefixes.id, hashes))
    }

    /// Prefix match on the content type, so `video` also matches `video/mp4`
    pub fn content_type_clause(&self, content_type: Option<&str>) -> Option<QueryNode> {
        content_type.map(|ct| QueryNode::Wildcard(format!("{}{}", self.prefixes.content_type, ct)))
    }
}

fn and_all(clauses: Vec<QueryNode>) -> Option<QueryNode> {
    if clauses.is_empty() {
        None
    } else {
        Some(QueryNode::Combine(QueryOp::And, clauses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn or_terms(terms: &[&str]) -> QueryNode {
        QueryNode::Combine(QueryOp::Or, terms.iter().map(|t| QueryNode::term(*t)).collect())
    }

    #[test]
    fn test_no_filters() {
        let prefixes = FieldPrefixes::default();
        let builder = FilterBuilder::new(&prefixes);
        let spec = QuerySpec::builder().search_terms("cat").build();
        assert_eq!(builder.filter_clause(&spec), None);
        assert_eq!(builder.exclusion_clause(&spec), None);
    }

    #[test]
    fn test_empty_lists_are_absent() {
        let prefixes = FieldPrefixes::default();
        let builder = FilterBuilder::new(&prefixes);
        let spec = QuerySpec::builder()
            .tags_match_any(Vec::<String>::new())
            .ids(Vec::<String>::new())
            .build();
        assert_eq!(builder.filter_clause(&spec), None);
    }

    #[test]
    fn test_tags_match_any_and_all() {
        let prefixes = FieldPrefixes::default();
        let builder = FilterBuilder::new(&prefixes);
        let spec = QuerySpec::builder()
            .tags_match_any(["a", "b", "a"])
            .tags_match_all(["c", "d"])
            .build();

        let filter = builder.filter_clause(&spec).unwrap();

        assert_eq!(
            filter,
            QueryNode::Combine(
                QueryOp::And,
                vec![
                    or_terms(&["Ka", "Kb"]),
                    QueryNode::Combine(
                        QueryOp::And,
                        vec![QueryNode::term("Kc"), QueryNode::term("Kd")]
                    ),
                ]
            )
        );
    }

    #[test]
    fn test_ids_resolved_to_hashes() {
        let prefixes = FieldPrefixes::default();
        let builder = FilterBuilder::new(&prefixes);
        let ids = vec![
            "ekn://app/HASH1".to_string(),
            "not-an-id".to_string(),
            "ekn:///HASH2".to_string(),
        ];

        assert_eq!(builder.ids_clause(&ids), Some(or_terms(&["QHASH1", "QHASH2"])));
    }

    #[test]
    fn test_all_ids_invalid_matches_nothing() {
        let prefixes = FieldPrefixes::default();
        let builder = FilterBuilder::new(&prefixes);
        let ids = vec!["bogus".to_string()];

        assert_eq!(builder.ids_clause(&ids), Some(QueryNode::MatchNothing));
    }

    #[test]
    fn test_content_type_is_wildcard() {
        let prefixes = FieldPrefixes::default();
        let builder = FilterBuilder::new(&prefixes);
        let spec = QuerySpec::builder().content_type("video").build();

        assert_eq!(
            builder.filter_clause(&spec),
            Some(QueryNode::Combine(QueryOp::And, vec![QueryNode::wildcard("Tvideo")]))
        );
    }

    #[test]
    fn test_exclusion_clause() {
        let prefixes = FieldPrefixes::default();
        let builder = FilterBuilder::new(&prefixes);
        let spec = QuerySpec::builder()
            .excluded_ids(["ekn://app/H1"])
            .excluded_tags(["spam", "ads"])
            .excluded_content_type("audio")
            .build();

        assert_eq!(
            builder.exclusion_clause(&spec),
            Some(QueryNode::Combine(
                QueryOp::And,
                vec![
                    or_terms(&["QH1"]),
                    or_terms(&["Kads", "Kspam"]),
                    QueryNode::wildcard("Taudio"),
                ]
            ))
        );
        // Exclusions never leak into the positive filter
        assert_eq!(builder.filter_clause(&spec), None);
    }

    #[test]
    fn test_custom_prefixes() {
        let prefixes = FieldPrefixes {
            tag: "XTAG".to_string(),
            ..FieldPrefixes::default()
        };
        let builder = FilterBuilder::new(&prefixes);
        let tags: BTreeSet<String> = ["x".to_string()].into_iter().collect();

        assert_eq!(builder.tags_clause(&tags, QueryOp::Or), Some(or_terms(&["XTAGx"])));
    }
}
