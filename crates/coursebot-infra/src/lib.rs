//! Infrastructure layer for Coursebot.
//!
//! Contains the concrete [`coursebot_core::llm::gateway::CompletionGateway`]
//! implementation that talks to Azure OpenAI.

pub mod llm;
