//! HTTP/JSON API layer for Coursebot.
//!
//! Axum routes under `/api/`, token authentication for chat and reset,
//! `{ "error": ... }` bodies on failure, and permissive CORS for browser
//! frontends.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
