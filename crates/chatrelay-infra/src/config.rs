//! Configuration loader for chatrelay.
//!
//! Reads `config.toml` (by default from the data directory, `~/.chatrelay/`)
//! and deserializes it into [`RelayConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies `CHATRELAY_*` environment
//! overrides on top.

use std::path::{Path, PathBuf};

use chatrelay_types::config::RelayConfig;

use crate::sqlite::pool::default_database_url;

/// Environment variable that relocates the data directory.
pub const DATA_DIR_ENV: &str = "CHATRELAY_DATA_DIR";

/// Resolve the data directory: `$CHATRELAY_DATA_DIR`, else `~/.chatrelay`.
///
/// Falls back to `./.chatrelay` when no home directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatrelay")
}

/// Default config file location inside `data_dir`.
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load configuration from `path`, then apply environment overrides.
///
/// - If the file does not exist, starts from [`RelayConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and starts from the default.
pub async fn load_config(path: &Path) -> RelayConfig {
    let mut config = read_config_file(path).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

async fn read_config_file(path: &Path) -> RelayConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            RelayConfig::default()
        }
    }
}

/// Apply `CHATRELAY_*` overrides. `lookup` abstracts the environment so tests
/// don't have to mutate process state.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(url) = lookup("CHATRELAY_DATABASE_URL") {
        config.database.url = Some(url);
    }
    if let Some(base_url) = lookup("CHATRELAY_API_BASE") {
        config.provider.base_url = base_url;
    }
    if let Some(key) = lookup("CHATRELAY_API_KEY") {
        config.provider.api_key = Some(key);
    }
    if let Some(model) = lookup("CHATRELAY_MODEL") {
        config.provider.model = model;
    }
}

/// Database URL from the config, or `{data_dir}/chatrelay.db`.
pub fn database_url(config: &RelayConfig, data_dir: &Path) -> String {
    config
        .database
        .url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_file(&tmp.path().join("config.toml")).await;
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert!(config.provider.api_key.is_none());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
[server]
port = 8080
static_dir = "frontend"

[provider]
base_url = "https://api.siliconflow.cn/v1"
model = "Qwen/Qwen3-235B-A22B"
timeout_secs = 30
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(&path).await;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.static_dir.as_deref(), Some("frontend"));
        assert_eq!(config.provider.base_url, "https://api.siliconflow.cn/v1");
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.provider.max_tokens, 4096);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = read_config_file(&path).await;
        assert_eq!(config.server.port, 5000);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CHATRELAY_DATABASE_URL", "sqlite::memory:"),
            ("CHATRELAY_API_BASE", "http://localhost:8000/v1"),
            ("CHATRELAY_API_KEY", "sk-env"),
            ("CHATRELAY_MODEL", ""),
        ]);

        let mut config = RelayConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.provider.base_url, "http://localhost:8000/v1");
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-env"));
        // Empty values are ignored.
        assert_eq!(config.provider.model, "gpt-4o-mini");
    }

    #[test]
    fn database_url_defaults_to_data_dir() {
        let config = RelayConfig::default();
        let url = database_url(&config, Path::new("/srv/relay"));
        assert_eq!(url, default_database_url(Path::new("/srv/relay")));

        let mut config = RelayConfig::default();
        config.database.url = Some("sqlite:///tmp/other.db".to_string());
        assert_eq!(
            database_url(&config, Path::new("/srv/relay")),
            "sqlite:///tmp/other.db"
        );
    }

    #[test]
    fn default_config_path_is_in_data_dir() {
        assert_eq!(
            default_config_path(Path::new("/srv/relay")),
            PathBuf::from("/srv/relay/config.toml")
        );
    }
}
