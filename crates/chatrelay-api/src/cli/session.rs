//! Session CLI commands: create, show.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatrelay_types::chat::{ChatMessage, MessageRole};
use chatrelay_types::error::ChatError;

use crate::state::AppState;

/// Create a session (idempotent).
///
/// ```bash
/// chatrelay session create abc123
/// ```
pub async fn create_session(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let session = state.chat_service.create_session(session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session '{}' ready",
        style("✓").green().bold(),
        style(&session.session_id).cyan()
    );
    println!(
        "  {}",
        style(format!(
            "created {}",
            session.created_at.format("%Y-%m-%d %H:%M:%S")
        ))
        .dim()
    );
    println!();

    Ok(())
}

/// Print a session's stored messages as a table (or JSON).
pub async fn show_session(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let messages = match state.chat_service.session_history(session_id).await {
        Ok(messages) => messages,
        Err(ChatError::SessionNotFound(_)) => {
            anyhow::bail!(
                "Session '{session_id}' not found. Create it with: chatrelay session create {session_id}"
            );
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        let out = serde_json::json!({
            "session_id": session_id,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages in '{}' yet. Send one with: {}",
            style("i").blue().bold(),
            style(session_id).cyan(),
            style(format!("chatrelay chat {session_id} \"hello\"")).yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("  Session '{}'", style(session_id).cyan().bold());
    println!();
    println!("{}", message_table(&messages));
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn message_table(messages: &[ChatMessage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for (i, message) in messages.iter().enumerate() {
        let role_cell = match message.role {
            MessageRole::User => Cell::new("user").fg(Color::Cyan),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Green),
        };

        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            role_cell,
            Cell::new(message.created_at.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            Cell::new(truncate(&message.content, 120)),
        ]);
    }

    table
}

/// Shorten `s` to at most `max` characters, marking the cut with "...".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
