//! Connection settings for an OpenAI-compatible endpoint.

use secrecy::SecretString;

use chatrelay_types::config::ProviderSettings;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`]. The API key stays
/// wrapped in a [`SecretString`] until the client is built.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name used in logs.
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier (e.g., "gpt-4o-mini", "Qwen/Qwen3-235B-A22B").
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Build from relay settings plus an already-resolved API key.
    pub fn from_settings(settings: &ProviderSettings, api_key: SecretString) -> Self {
        Self {
            provider_name: provider_name_for(&settings.base_url),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
        }
    }
}

/// Derive a short provider name from the endpoint host, e.g.
/// `https://api.siliconflow.cn/v1/` -> `api.siliconflow.cn`.
fn provider_name_for(base_url: &str) -> String {
    let without_scheme = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    let host = without_scheme.split('/').next().unwrap_or_default();
    if host.is_empty() {
        "openai_compatible".to_string()
    } else {
        host.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_trims_trailing_slash() {
        let settings = ProviderSettings {
            base_url: "https://api.siliconflow.cn/v1/".to_string(),
            model: "Qwen/Qwen3-235B-A22B".to_string(),
            ..ProviderSettings::default()
        };
        let config = OpenAiCompatConfig::from_settings(&settings, SecretString::from("sk-test"));
        assert_eq!(config.base_url, "https://api.siliconflow.cn/v1");
        assert_eq!(config.provider_name, "api.siliconflow.cn");
        assert_eq!(config.model, "Qwen/Qwen3-235B-A22B");
    }

    #[test]
    fn test_provider_name_without_scheme() {
        assert_eq!(provider_name_for("localhost:8080/v1"), "localhost:8080");
        assert_eq!(provider_name_for(""), "openai_compatible");
    }
}
