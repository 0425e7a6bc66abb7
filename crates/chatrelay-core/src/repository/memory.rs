//! In-memory repositories for unit tests.

use std::sync::{Arc, Mutex};

use chatrelay_types::chat::{ChatMessage, ChatSession, MessageRole};
use chatrelay_types::error::RepositoryError;
use chrono::Utc;

use super::message::MessageRepository;
use super::session::SessionRepository;

#[derive(Default)]
struct Inner {
    sessions: Vec<ChatSession>,
    messages: Vec<ChatMessage>,
    writes: usize,
    fail_message_writes: bool,
}

/// Shared in-memory store implementing both repository traits.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of successful writes (sessions + messages).
    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.lock().unwrap().messages.clone()
    }

    pub fn fail_message_writes(&self) {
        self.inner.lock().unwrap().fail_message_writes = true;
    }
}

/// Mirrors the `chat_messages.session_id` foreign key.
fn check_session(inner: &Inner, session_id: &str) -> Result<(), RepositoryError> {
    if inner.sessions.iter().any(|s| s.session_id == session_id) {
        Ok(())
    } else {
        Err(RepositoryError::Query(
            "FOREIGN KEY constraint failed".to_string(),
        ))
    }
}

fn push_message(inner: &mut Inner, session_id: &str, role: MessageRole, content: &str) -> ChatMessage {
    let message = ChatMessage {
        id: inner.messages.len() as i64 + 1,
        session_id: session_id.to_string(),
        role,
        content: content.to_string(),
        created_at: Utc::now(),
    };
    inner.messages.push(message.clone());
    inner.writes += 1;
    message
}

impl SessionRepository for InMemoryStore {
    async fn ensure_session(&self, session_id: &str) -> Result<ChatSession, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.sessions.iter().find(|s| s.session_id == session_id) {
            return Ok(existing.clone());
        }
        let session = ChatSession {
            id: inner.sessions.len() as i64 + 1,
            session_id: session_id.to_string(),
            created_at: Utc::now(),
        };
        inner.sessions.push(session.clone());
        inner.writes += 1;
        Ok(session)
    }

    async fn exists(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.sessions.iter().any(|s| s.session_id == session_id))
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .sessions
            .iter()
            .find(|s| s.session_id == session_id)
            .cloned())
    }

    async fn count_sessions(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.lock().unwrap().sessions.len() as u64)
    }
}

impl MessageRepository for InMemoryStore {
    async fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_message_writes {
            return Err(RepositoryError::Query("disk I/O error".to_string()));
        }
        check_session(&inner, session_id)?;
        Ok(push_message(&mut inner, session_id, role, content))
    }

    async fn append_exchange(
        &self,
        session_id: &str,
        user_content: &str,
        reply_content: &str,
    ) -> Result<(ChatMessage, ChatMessage), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_message_writes {
            return Err(RepositoryError::Query("disk I/O error".to_string()));
        }
        check_session(&inner, session_id)?;
        let user = push_message(&mut inner, session_id, MessageRole::User, user_content);
        let reply = push_message(&mut inner, session_id, MessageRole::Assistant, reply_content);
        Ok((user, reply))
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.lock().unwrap().messages.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_to_unknown_session_is_rejected() {
        let store = InMemoryStore::new();

        let err = store
            .append("ghost", MessageRole::User, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));

        let err = store
            .append_exchange("ghost", "hello", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));

        assert!(store.messages().is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_append_after_ensure_session() {
        let store = InMemoryStore::new();
        store.ensure_session("abc").await.unwrap();
        let (user, reply) = store.append_exchange("abc", "hello", "hi").await.unwrap();
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(store.writes(), 3);
    }
}
