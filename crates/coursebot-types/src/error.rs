use thiserror::Error;

/// Errors from session store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
}

/// Errors from a chat or reset request.
///
/// `Upstream` deliberately carries no detail; the underlying
/// [`crate::llm::LlmError`] is logged where it is caught.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("invalid session")]
    InvalidSession,

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("upstream completion failed")]
    Upstream,
}

impl From<SessionError> for ChatError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound => ChatError::InvalidSession,
        }
    }
}
