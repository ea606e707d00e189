//! Completion request and error types for the upstream model API.

use serde::{Deserialize, Serialize};

use crate::chat::Turn;

/// A single completion call: the full ordered history plus sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub turns: Vec<Turn>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Errors from the completion gateway.
///
/// These carry upstream detail for server-side logs. They are never shown to
/// HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("completion returned no content")]
    EmptyResponse,
}
