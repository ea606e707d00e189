//! Business logic for Coursebot.
//!
//! Owns the session lifecycle (token issuance, history, reset), system prompt
//! composition, and the [`llm::gateway::CompletionGateway`] port that the
//! infrastructure layer implements. Depends only on `coursebot-types`.

pub mod chat;
pub mod llm;
pub mod prompt;
pub mod session;
