//! Conversation and session types.
//!
//! A [`Session`] is the in-memory record behind one opaque token: its ordered
//! turn history, the personalization [`SessionMeta`] captured at start, and
//! the per-session completion defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::System => write!(f, "system"),
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One role-tagged message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Personalization captured when a session starts.
///
/// Kept for the session's lifetime so the system prompt can be rebuilt on
/// reset without the client resending anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Learner's display name.
    pub user_name: Option<String>,
    /// Cohort the learner belongs to.
    pub cohort_id: Option<String>,
    /// Client-supplied replacement for the default instruction template.
    pub system_prompt: Option<String>,
    /// Greeting returned to the client at start.
    pub initial_message: String,
}

/// Completion parameters used when a chat request does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDefaults {
    /// Model or deployment identifier.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// In-memory conversation record behind a token.
///
/// Only constructible through [`Session::new`], so history always starts with
/// a system turn.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    turns: Vec<Turn>,
    pub meta: SessionMeta,
    pub defaults: SessionDefaults,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session whose history is a single system turn.
    pub fn new(meta: SessionMeta, system_prompt: String, defaults: SessionDefaults) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
            meta,
            defaults,
            created_at: Utc::now(),
        }
    }

    /// Full history in chronological order. Index 0 is the system turn.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Append a turn to the end of the history.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Discard all turns and start over from a fresh system turn.
    pub fn reset(&mut self, system_prompt: String) {
        self.turns.clear();
        self.turns.push(Turn::system(system_prompt));
    }
}
