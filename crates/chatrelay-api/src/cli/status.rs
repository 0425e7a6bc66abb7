//! System status command.

use anyhow::Result;
use console::style;

use chatrelay_core::repository::message::MessageRepository;
use chatrelay_core::repository::session::SessionRepository;
use chatrelay_infra::config::database_url;

use crate::state::AppState;

/// Display storage location, provider settings and row counts.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let sessions = state.chat_service.sessions().count_sessions().await?;
    let messages = state.chat_service.messages().count_messages().await?;
    let db_url = database_url(&state.config, &state.data_dir);
    let provider = &state.config.provider;
    let key_configured = provider.api_key.as_deref().is_some_and(|k| !k.is_empty());

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database_url": db_url,
            "provider": {
                "base_url": provider.base_url,
                "model": provider.model,
                "api_key_configured": key_configured,
                "timeout_secs": provider.timeout_secs,
            },
            "sessions": sessions,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} chatrelay v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Usage ──").dim());
    println!("  Sessions: {}", style(sessions).bold());
    println!("  Messages: {}", style(messages).bold());
    println!();

    println!("  {}", style("── Provider ──").dim());
    println!("  Endpoint: {}", style(&provider.base_url).cyan());
    println!("  Model:    {}", provider.model);
    println!(
        "  API key:  {}",
        if key_configured {
            style("configured").green()
        } else {
            style("missing (set CHATRELAY_API_KEY)").yellow()
        }
    );
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style(db_url).dim());
    println!();

    Ok(())
}
