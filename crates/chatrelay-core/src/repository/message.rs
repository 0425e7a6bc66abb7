//! Message store trait definition.

use chatrelay_types::chat::{ChatMessage, MessageRole};
use chatrelay_types::error::RepositoryError;

/// Append-only store of chat turns.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteMessageRepository`).
/// Messages are never updated, deleted or reordered once written.
pub trait MessageRepository: Send + Sync {
    /// Durably write one message. Returns the stored record.
    fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Write a user turn followed by the assistant reply as a single unit.
    ///
    /// Either both messages are stored, in that order, or neither is.
    fn append_exchange(
        &self,
        session_id: &str,
        user_content: &str,
        reply_content: &str,
    ) -> impl std::future::Future<Output = Result<(ChatMessage, ChatMessage), RepositoryError>> + Send;

    /// All messages of a session in write order (oldest first).
    fn list_by_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Count all messages across all sessions.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
