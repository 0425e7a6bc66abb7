//! Chat service orchestrating session provisioning, completion and persistence.
//!
//! One chat turn runs: validate -> ensure session -> lock session ->
//! load history -> complete -> persist user turn and reply -> return reply.
//! Nothing is written for a turn whose completion failed.

use chatrelay_types::chat::{ChatMessage, ChatSession, MAX_SESSION_ID_LEN};
use chatrelay_types::error::ChatError;
use tracing::{info, warn};

use crate::chat::history::HistoryAssembler;
use crate::chat::lock::SessionLocks;
use crate::llm::gateway::CompletionGateway;
use crate::repository::message::MessageRepository;
use crate::repository::session::SessionRepository;

/// Orchestrates the chat flow for every session.
///
/// Generic over `SessionRepository` and `MessageRepository` to maintain
/// clean architecture (chatrelay-core never depends on chatrelay-infra).
pub struct ChatService<S: SessionRepository, M: MessageRepository> {
    sessions: S,
    messages: M,
    gateway: CompletionGateway,
    locks: SessionLocks,
}

impl<S: SessionRepository, M: MessageRepository> ChatService<S, M> {
    pub fn new(sessions: S, messages: M, gateway: CompletionGateway) -> Self {
        Self {
            sessions,
            messages,
            gateway,
            locks: SessionLocks::new(),
        }
    }

    /// Access the session registry.
    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Access the message store.
    pub fn messages(&self) -> &M {
        &self.messages
    }

    /// Access the completion gateway.
    pub fn gateway(&self) -> &CompletionGateway {
        &self.gateway
    }

    /// Explicitly create (or fetch) a session.
    pub async fn create_session(&self, session_id: &str) -> Result<ChatSession, ChatError> {
        validate_session_id(session_id)?;

        let session = self.sessions.ensure_session(session_id).await?;
        info!(session_id = %session_id, "Session ready");
        Ok(session)
    }

    /// Run one chat turn and return the model's reply.
    ///
    /// Unknown sessions are provisioned on the fly. The user turn and the
    /// reply are persisted together, only after the completion succeeded.
    pub async fn handle_chat(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        validate_session_id(session_id)?;
        if message.is_empty() {
            return Err(ChatError::InvalidInput("message is required".to_string()));
        }

        info!(session_id = %session_id, chars = message.chars().count(), "User message received");

        if !self.sessions.exists(session_id).await? {
            warn!(session_id = %session_id, "Session not found, creating it");
        }
        self.sessions.ensure_session(session_id).await?;

        let _turn = self.locks.acquire(session_id).await;

        let history = HistoryAssembler::new(&self.messages)
            .load_history(session_id)
            .await?;

        info!(
            session_id = %session_id,
            provider = self.gateway.provider_name(),
            model = %self.gateway.settings().model,
            history = history.len(),
            "Calling completion provider"
        );
        let reply = self.gateway.complete(&history, message).await?;

        self.messages
            .append_exchange(session_id, message, &reply)
            .await?;

        info!(session_id = %session_id, chars = reply.chars().count(), "Model reply stored");
        Ok(reply)
    }

    /// Stored messages of an existing session, oldest first.
    pub async fn session_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        validate_session_id(session_id)?;

        if !self.sessions.exists(session_id).await? {
            return Err(ChatError::SessionNotFound(session_id.to_string()));
        }
        Ok(self.messages.list_by_session(session_id).await?)
    }
}

fn validate_session_id(session_id: &str) -> Result<(), ChatError> {
    if session_id.is_empty() {
        return Err(ChatError::InvalidInput("session_id is required".to_string()));
    }
    if session_id.chars().count() > MAX_SESSION_ID_LEN {
        return Err(ChatError::InvalidInput(format!(
            "session_id must be at most {MAX_SESSION_ID_LEN} characters"
        )));
    }
    Ok(())
}
