use serde::Serialize;
use std::fmt;

/// Boolean operator joining the children of a [`QueryNode::Combine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOp {
    /// Any child may match
    Or,
    /// All children must match
    And,
    /// First child matches, restricted to documents matching the rest.
    /// Only the first child contributes to relevance.
    Filter,
    /// First child matches, minus documents matching any of the rest
    AndNot,
}

impl QueryOp {
    /// Operator keyword used in query descriptions
    pub fn keyword(self) -> &'static str {
        match self {
            QueryOp::Or => "OR",
            QueryOp::And => "AND",
            QueryOp::Filter => "FILTER",
            QueryOp::AndNot => "AND_NOT",
        }
    }
}

/// Query tree handed to the execution layer.
///
/// Terms carry their field prefix inline (`Kfoo` is the term `foo` in the tag
/// field). Trees are plain owned values: combinators consume their children,
/// so no sub-tree is ever shared between two parents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum QueryNode {
    /// Exact term match
    Term(String),
    /// Matches every term starting with the given prefixed string
    Wildcard(String),
    /// Matches every document
    MatchAll,
    /// Matches no document
    MatchNothing,
    /// Boolean combination of sub-queries
    Combine(QueryOp, Vec<QueryNode>),
}

impl QueryNode {
    pub fn term(prefixed: impl Into<String>) -> Self {
        QueryNode::Term(prefixed.into())
    }

    pub fn wildcard(prefixed: impl Into<String>) -> Self {
        QueryNode::Wildcard(prefixed.into())
    }

    pub fn combine(op: QueryOp, children: Vec<QueryNode>) -> Self {
        QueryNode::Combine(op, children)
    }

    /// Combine two sub-queries with `op`
    pub fn pair(op: QueryOp, left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Combine(op, vec![left, right])
    }

    /// One term per value, each prefixed, joined by `op`
    pub fn for_terms<I, S>(op: QueryOp, prefix: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let children = values
            .into_iter()
            .map(|v| QueryNode::Term(format!("{}{}", prefix, v.as_ref())))
            .collect();
        QueryNode::Combine(op, children)
    }

    /// Join two optional sub-queries, collapsing to whichever side exists
    pub fn join_optional(
        op: QueryOp,
        left: Option<QueryNode>,
        right: Option<QueryNode>,
    ) -> Option<QueryNode> {
        match (left, right) {
            (Some(l), Some(r)) => Some(QueryNode::pair(op, l, r)),
            (Some(l), None) => Some(l),
            (None, r) => r,
        }
    }

    /// Number of nodes in the tree, including this one
    pub fn node_count(&self) -> usize {
        match self {
            QueryNode::Combine(_, children) => {
                1 + children.iter().map(QueryNode::node_count).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// All leaf term and wildcard strings, in tree order
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            QueryNode::Term(t) | QueryNode::Wildcard(t) => out.push(t),
            QueryNode::Combine(_, children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            QueryNode::MatchAll | QueryNode::MatchNothing => {}
        }
    }

    fn write_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term(t) => write!(f, "{}", t),
            QueryNode::Wildcard(t) => write!(f, "WILDCARD {}", t),
            QueryNode::MatchAll => write!(f, "<alldocuments>"),
            QueryNode::MatchNothing => Ok(()),
            QueryNode::Combine(op, children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.keyword())?;
                    }
                    child.write_inner(f)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Renders the conventional backend description, e.g. `Query((Scat OR Sdog))`
impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query(")?;
        self.write_inner(f)?;
        write!(f, ")")
    }
}
