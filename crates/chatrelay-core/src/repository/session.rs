//! Session registry trait definition.

use chatrelay_types::chat::ChatSession;
use chatrelay_types::error::RepositoryError;

/// Repository trait for the session registry.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteSessionRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SessionRepository: Send + Sync {
    /// Return the session with this external id, creating it first if needed.
    ///
    /// Lookup-then-create is one logical unit: a concurrent duplicate create
    /// must resolve to the existing row, never to a uniqueness error.
    fn ensure_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Whether a session with this external id exists. No side effects.
    fn exists(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Get a session by its external id.
    fn get_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Count all sessions.
    fn count_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
