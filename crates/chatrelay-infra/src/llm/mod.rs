//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `chatrelay-core`, plus the factory ([`create_provider`])
//! that builds it from [`ProviderSettings`].
//!
//! [`LlmProvider`]: chatrelay_core::llm::provider::LlmProvider

pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_core::llm::gateway::GatewaySettings;
use chatrelay_types::config::ProviderSettings;
use chatrelay_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Create a [`BoxLlmProvider`] from the relay's provider settings.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is configured.
pub fn create_provider(settings: &ProviderSettings) -> Result<BoxLlmProvider, LlmError> {
    let key = settings
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(LlmError::AuthenticationFailed)?;

    let config = OpenAiCompatConfig::from_settings(settings, SecretString::from(key.to_string()));
    tracing::debug!(
        provider = %config.provider_name,
        model = %config.model,
        "Creating completion provider"
    );
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}

/// Per-call gateway settings derived from the provider section.
pub fn gateway_settings(settings: &ProviderSettings) -> GatewaySettings {
    GatewaySettings {
        model: settings.model.clone(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        timeout: Duration::from_secs(settings.timeout_secs),
    }
}
