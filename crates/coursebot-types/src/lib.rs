//! Shared domain types for Coursebot.
//!
//! Pure data shapes with no I/O: conversation turns, session records,
//! completion requests, and the error enums shared across crates.

pub mod chat;
pub mod error;
pub mod llm;
