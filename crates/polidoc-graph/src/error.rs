//! Error types for graph gateway operations.

use thiserror::Error;

/// Failure kinds surfaced by the query gateway.
///
/// Each variant maps to exactly one HTTP status in the web layer, so new
/// failure sources should be folded into an existing kind rather than added.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A required parameter was missing, empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single-record lookup matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Neo4j was unreachable, timed out, rejected the query or returned rows
    /// that could not be decoded.
    #[error("Graph store failure: {0}")]
    DependencyFailure(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for gateway operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a dependency failure error.
    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::DependencyFailure(msg.into())
    }

    /// Short machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::DependencyFailure(_) => "dependency_failure",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        Self::DependencyFailure(err.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::DependencyFailure(format!("Failed to decode graph row: {}", err))
    }
}
