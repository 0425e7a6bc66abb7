//! Completion gateway: one provider call per chat turn.
//!
//! The gateway owns no storage. It takes the assembled history, appends the
//! new user turn to a private copy, and hands the whole sequence to the
//! provider exactly once.

use std::time::Duration;

use chatrelay_types::llm::{CompletionRequest, LlmError, Message};
use tracing::debug;

use super::box_provider::BoxLlmProvider;

/// Per-call settings forwarded with every completion request.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Model identifier; empty defers to the provider's own default.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    /// Upper bound on a single provider call.
    pub timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 4096,
            temperature: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Sends a conversation to the completion provider and returns the reply text.
pub struct CompletionGateway {
    provider: BoxLlmProvider,
    settings: GatewaySettings,
}

impl CompletionGateway {
    pub fn new(provider: BoxLlmProvider, settings: GatewaySettings) -> Self {
        Self { provider, settings }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Build the request sent for `history` followed by `new_user_message`.
    pub fn build_request(&self, history: &[Message], new_user_message: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(Message::user(new_user_message));

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Complete the conversation. No retry; provider errors are returned as-is.
    pub async fn complete(
        &self,
        history: &[Message],
        new_user_message: &str,
    ) -> Result<String, LlmError> {
        let request = self.build_request(history, new_user_message);
        debug!(
            provider = self.provider.name(),
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = tokio::time::timeout(self.settings.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| LlmError::Timeout {
                secs: self.settings.timeout.as_secs(),
            })??;

        Ok(response.content)
    }
}
