//! Chat HTTP handler.
//!
//! `POST /chat` runs one turn: the user message plus the session's stored
//! history go to the completion provider, and the reply comes back as
//! `{"reply": ...}` once both sides of the exchange are stored.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

/// Body of `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /chat - Send a message and receive the model's reply.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let (Some(session_id), Some(message)) = (
        body.session_id.filter(|s| !s.is_empty()),
        body.message.filter(|m| !m.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Missing required parameters".to_string(),
        ));
    };

    let reply = state.chat_service.handle_chat(&session_id, &message).await?;

    Ok(Json(json!({ "reply": reply })))
}
