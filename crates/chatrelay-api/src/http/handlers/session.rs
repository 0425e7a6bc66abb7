//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /session                       - Create a session (idempotent)
//! - GET  /sessions/{session_id}/messages - Stored messages of a session

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use chatrelay_types::chat::MessageRole;

use crate::http::error::AppError;
use crate::state::AppState;

/// Body of `POST /session`. Fields are optional so a missing id reaches the
/// handler and gets the JSON error body.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One stored message as returned by the history endpoint.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
}

/// POST /session - Create a session if it does not exist yet.
pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let session_id = body
        .session_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Missing session_id".to_string()))?;

    state.chat_service.create_session(&session_id).await?;

    Ok(Json(json!({ "success": true })))
}

/// GET /sessions/{session_id}/messages - Stored messages, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let messages: Vec<MessageView> = state
        .chat_service
        .session_history(&session_id)
        .await?
        .into_iter()
        .map(|m| MessageView {
            role: m.role,
            content: m.content,
            created_at: m.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(json!({
        "session_id": session_id,
        "messages": messages,
    })))
}
