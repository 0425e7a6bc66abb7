//! History assembler: stored turns to provider-ready messages.

use chatrelay_types::error::RepositoryError;
use chatrelay_types::llm::{LlmRole, Message};

use crate::repository::message::MessageRepository;

/// Rebuilds the conversation context of a session from the message store.
///
/// Borrowing the repository keeps this a pure read: it can neither create a
/// session nor write a message.
pub struct HistoryAssembler<'a, M: MessageRepository> {
    messages: &'a M,
}

impl<'a, M: MessageRepository> HistoryAssembler<'a, M> {
    pub fn new(messages: &'a M) -> Self {
        Self { messages }
    }

    /// All turns of `session_id`, oldest first. Empty if there are none.
    pub async fn load_history(&self, session_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let stored = self.messages.list_by_session(session_id).await?;
        Ok(stored
            .into_iter()
            .map(|m| Message {
                role: LlmRole::from(m.role),
                content: m.content,
            })
            .collect())
    }
}
