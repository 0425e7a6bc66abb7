//! Application state wiring the chat service to its concrete dependencies.
//!
//! `ChatService` is generic over its repositories; AppState pins it to the
//! SQLite implementations and the configured completion provider.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use chatrelay_core::chat::service::ChatService;
use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_core::llm::gateway::CompletionGateway;
use chatrelay_core::llm::provider::LlmProvider;
use chatrelay_infra::config::{database_url, default_config_path, load_config, resolve_data_dir};
use chatrelay_infra::llm::{create_provider, gateway_settings};
use chatrelay_infra::sqlite::message::SqliteMessageRepository;
use chatrelay_infra::sqlite::pool::DatabasePool;
use chatrelay_infra::sqlite::session::SqliteSessionRepository;
use chatrelay_types::config::RelayConfig;
use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError};

pub type ConcreteChatService = ChatService<SqliteSessionRepository, SqliteMessageRepository>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Load config, open the database and wire the chat service.
    ///
    /// With `require_provider`, a missing API key is an error. Otherwise the
    /// state is built with a provider that rejects every call, which is enough
    /// for commands that never reach the model.
    pub async fn init(config_path: Option<&Path>, require_provider: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_config_path(&data_dir));
        let config = load_config(&config_path).await;

        let db_url = database_url(&config, &data_dir);
        let db_pool = DatabasePool::new(&db_url)
            .await
            .with_context(|| format!("Failed to open database {db_url}"))?;

        let provider = match create_provider(&config.provider) {
            Ok(provider) => provider,
            Err(e) if require_provider => {
                return Err(e).context(
                    "No API key configured. Set CHATRELAY_API_KEY or [provider] api_key in config.toml",
                );
            }
            Err(_) => BoxLlmProvider::new(UnconfiguredProvider),
        };

        Ok(Self::from_parts(config, data_dir, db_pool, provider))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        config: RelayConfig,
        data_dir: PathBuf,
        db_pool: DatabasePool,
        provider: BoxLlmProvider,
    ) -> Self {
        let gateway = CompletionGateway::new(provider, gateway_settings(&config.provider));
        let chat_service = ChatService::new(
            SqliteSessionRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            gateway,
        );

        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}

/// Stand-in provider when no API key is configured.
struct UnconfiguredProvider;

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::AuthenticationFailed)
    }
}
