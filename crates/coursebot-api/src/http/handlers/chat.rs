//! POST /api/chat - one conversational turn.
//!
//! Requires a session token (401 otherwise) and a JSON body with a non-empty
//! string `message` (400 otherwise). Validation happens before any session
//! state is touched or the completion API is called.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use coursebot_core::chat::service::ChatTurn;

use crate::http::error::AppError;
use crate::http::extractors::auth::SessionToken;
use crate::state::AppState;

const MESSAGE_REQUIRED: &str = "message must be a non-empty string";
const INVALID_BODY: &str = "request body must be a JSON object with a string message";

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub temperature: Option<f64>,
    pub max_completion_tokens: Option<u32>,
    /// One-off system note for this turn only.
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn chat(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "rejected chat body");
        AppError::Validation(INVALID_BODY.to_string())
    })?;

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation(MESSAGE_REQUIRED.to_string()))?;

    let reply = state
        .chat_service
        .chat(
            &token,
            ChatTurn {
                message,
                temperature: request.temperature,
                max_tokens: request.max_completion_tokens,
                context: request.context,
            },
        )
        .await?;

    Ok(Json(ChatResponse { response: reply }))
}
