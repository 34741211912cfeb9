//! Utility functions shared by the compiler.
//!
//! ## Modules
//!
//! - [`app_data`] - Compiler configuration stored in the app data directory
//! - [`tokenizer`] - Query text sanitization and term splitting
//!
//! ```
//! use knowledge_query::utils::sanitize_terms;
//!
//! let terms = sanitize_terms("(cats) AND dogs");
//! assert_eq!(terms, vec!["cats", "and", "dogs"]);
//! ```

pub mod app_data;
pub mod tokenizer;

pub use app_data::*;
pub use tokenizer::*;
