//! Errors that can occur while compiling a query spec.

use std::fmt;

/// Failure reported by a [`QueryParser`](super::QueryParser) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {position}")]
pub struct ParseFailure {
    pub message: String,
    /// Byte offset into the parsed text
    pub position: usize,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Compilation stage that handed text to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseStage {
    ExactTitle,
    Title,
    Body,
}

impl fmt::Display for ClauseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClauseStage::ExactTitle => "exact-title",
            ClauseStage::Title => "title",
            ClauseStage::Body => "body",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Sanitized search text still failed to parse.
    #[error("failed to parse {stage} clause: {source}")]
    Parse {
        stage: ClauseStage,
        #[source]
        source: ParseFailure,
    },

    /// The debug literal query override failed to parse.
    #[error("bad literal query: {0}")]
    BadLiteralQuery(#[source] ParseFailure),
}

impl QueryError {
    /// Stage that failed, `None` for the literal override
    pub fn stage(&self) -> Option<ClauseStage> {
        match self {
            QueryError::Parse { stage, .. } => Some(*stage),
            QueryError::BadLiteralQuery(_) => None,
        }
    }
}

/// Result type for query compilation.
pub type Result<T> = std::result::Result<T, QueryError>;
