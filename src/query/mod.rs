pub mod clause;
pub mod compiler;
pub mod error;
pub mod filter;
pub mod node;
pub mod parser;
pub mod planner;
pub mod spec;

pub use clause::ClauseBuilder;
pub use compiler::{QueryCompiler, compile};
pub use error::{ClauseStage, ParseFailure, QueryError};
pub use filter::FilterBuilder;
pub use node::{QueryNode, QueryOp};
pub use parser::{ParseFlags, QueryParser, StandardParser};
pub use planner::{ExecutionContext, ExecutionPlan, SortPlan, configure_execution, sort_slot};
pub use spec::{QueryMatch, QueryMode, QueryOrder, QuerySort, QuerySpec, QuerySpecBuilder, UNLIMITED};
