//! One-shot chat command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Run a single chat turn and print the reply.
///
/// ```bash
/// chatrelay chat abc123 "hello"
/// ```
pub async fn send_message(
    state: &AppState,
    session_id: &str,
    message: &str,
    json: bool,
) -> Result<()> {
    let reply = state.chat_service.handle_chat(session_id, message).await?;

    if json {
        let out = serde_json::json!({ "session_id": session_id, "reply": reply });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("you").cyan().bold(), message);
    println!("  {} {}", style("bot").green().bold(), reply);
    println!();

    Ok(())
}
