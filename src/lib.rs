//! # knowledge-query - Search query construction for offline content
//!
//! Translates a structured, immutable search request ([`query::QuerySpec`])
//! into a boolean query tree for a Xapian-style full-text backend, and
//! decides how the backend should sort the results.
//!
//! ## Architecture
//!
//! - [`query`] - Spec, query tree, clause and filter builders, compiler and sort planner
//! - [`identifier`] - Content id parsing (`ekn://` and `ekn+zim://`)
//! - [`utils`] - Term sanitization and configuration
//! - [`output`] - Terminal rendering of trees and plans (`cli` feature)
//!
//! ## Quick Start
//!
//! ```
//! use knowledge_query::query::{compile, QueryMatch, QuerySpec, StandardParser};
//!
//! let spec = QuerySpec::builder()
//!     .search_terms("cat dog")
//!     .match_(QueryMatch::TitleAndSynopsis)
//!     .tags_match_any(["animals"])
//!     .build();
//!
//! let query = compile(&spec, &StandardParser::default()).unwrap();
//! println!("{}", query);
//! ```
//!
//! The backend supplies its own [`query::QueryParser`] and
//! [`query::ExecutionContext`]; [`query::StandardParser`] and
//! [`query::ExecutionPlan`] are self-contained stand-ins.

pub mod identifier;
#[cfg(feature = "cli")]
pub mod output;
pub mod query;
pub mod utils;
