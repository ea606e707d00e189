//! Session lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST /api/start - Start a session from a JSON body
//! - GET  /api/start - Start a session from query parameters
//! - POST /api/reset - Drop a session's history back to its system prompt

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use coursebot_core::chat::service::StartParams;

use crate::http::error::AppError;
use crate::http::extractors::auth::SessionToken;
use crate::state::AppState;

/// Response body for start.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub token: String,
    pub initial_message: String,
}

/// POST /api/start - Start a session.
///
/// The body is optional. Missing, malformed, or non-string fields are treated
/// as absent, so this never fails.
pub async fn start_post(State(state): State<AppState>, body: Bytes) -> Json<StartResponse> {
    let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let params = StartParams {
        user_name: string_field(&value, "userName"),
        cohort_id: string_field(&value, "cohortId"),
        system_prompt: string_field(&value, "systemPrompt"),
        initial_message: string_field(&value, "initialMessage"),
    };
    start(&state, params)
}

/// GET /api/start - Start a session from query parameters.
pub async fn start_get(
    State(state): State<AppState>,
    Query(mut query): Query<HashMap<String, String>>,
) -> Json<StartResponse> {
    let params = StartParams {
        user_name: query.remove("userName"),
        cohort_id: query.remove("cohortId"),
        system_prompt: query.remove("systemPrompt"),
        initial_message: query.remove("initialMessage"),
    };
    start(&state, params)
}

fn start(state: &AppState, params: StartParams) -> Json<StartResponse> {
    let started = state.chat_service.start(params);
    Json(StartResponse {
        token: started.token,
        initial_message: started.initial_message,
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

/// POST /api/reset - Clear history but keep the session.
pub async fn reset(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<Value>, AppError> {
    state.chat_service.reset(&token).await?;
    Ok(Json(json!({ "ok": true })))
}
