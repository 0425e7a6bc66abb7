use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors surfaced by the chat orchestrator.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or malformed session id / message. Raised before any write.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),

    #[error("completion failed: {0}")]
    Gateway(#[from] LlmError),
}
