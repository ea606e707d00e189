//! Process-wide session store.
//!
//! Sessions live in a [`DashMap`] keyed by token. Each value is an
//! `Arc<tokio::sync::Mutex<Session>>`: map shard locks are held only for the
//! insert or lookup itself, while the per-session mutex serialises every
//! mutation of one conversation, including across the upstream await in chat.
//!
//! Nothing is ever evicted. Sessions live until the process exits.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Mutex;

use coursebot_types::chat::{Session, SessionDefaults, SessionMeta, Turn, TurnRole};
use coursebot_types::error::SessionError;

use super::token::{generate_token, token_prefix};
use crate::prompt::SystemPromptBuilder;

/// Shared handle to one session. Lock it to read or mutate.
pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session holding one system turn and return its token.
    pub fn create(
        &self,
        meta: SessionMeta,
        system_prompt: String,
        defaults: SessionDefaults,
    ) -> String {
        let handle = Arc::new(Mutex::new(Session::new(meta, system_prompt, defaults)));

        // Retry on collision so a live token is never overwritten.
        let token = loop {
            if let Entry::Vacant(slot) = self.sessions.entry(generate_token()) {
                let token = slot.key().clone();
                slot.insert(handle);
                break token;
            }
        };

        tracing::info!(
            token = token_prefix(&token),
            live_sessions = self.sessions.len(),
            "session created"
        );
        token
    }

    /// Look up a session by token.
    pub fn get(&self, token: &str) -> Option<SessionHandle> {
        self.sessions.get(token).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.sessions.contains_key(token)
    }

    /// Append a turn to the end of a session's history.
    ///
    /// Takes the session lock for this one push. `ChatService::chat` does not
    /// go through here: it keeps its own guard from the user turn to the
    /// assistant turn and pushes through that.
    pub async fn append_turn(
        &self,
        token: &str,
        role: TurnRole,
        content: impl Into<String>,
    ) -> Result<(), SessionError> {
        let handle = self.get(token).ok_or(SessionError::NotFound)?;
        handle.lock().await.push(Turn {
            role,
            content: content.into(),
        });
        tracing::debug!(token = token_prefix(token), role = %role, "turn appended");
        Ok(())
    }

    /// Truncate a session back to a system turn rebuilt from its stored meta.
    pub async fn reset(&self, token: &str) -> Result<(), SessionError> {
        let handle = self.get(token).ok_or(SessionError::NotFound)?;
        let mut session = handle.lock().await;
        let prompt = SystemPromptBuilder::build(session.meta.system_prompt.as_deref(), &session.meta);
        session.reset(prompt);
        tracing::info!(token = token_prefix(token), "session reset");
        Ok(())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn defaults() -> SessionDefaults {
        SessionDefaults {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 800,
        }
    }

    fn meta_for(name: &str) -> SessionMeta {
        SessionMeta {
            user_name: Some(name.to_string()),
            initial_message: "hello".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_returns_unique_tokens_with_one_system_turn() {
        let store = SessionStore::new();
        let mut tokens = HashSet::new();

        for i in 0..50 {
            let token = store.create(meta_for("Sam"), format!("prompt {i}"), defaults());
            let handle = store.get(&token).unwrap();
            let session = handle.lock().await;
            assert_eq!(session.turns(), &[Turn::system(format!("prompt {i}"))]);
            tokens.insert(token);
        }

        assert_eq!(tokens.len(), 50);
        assert_eq!(store.len(), 50);
    }

    #[tokio::test]
    async fn test_get_unknown_token() {
        let store = SessionStore::new();
        assert!(store.get("nope").is_none());
        assert!(!store.contains("nope"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_append_turn_preserves_order() {
        let store = SessionStore::new();
        let token = store.create(SessionMeta::default(), "sys".into(), defaults());

        store.append_turn(&token, TurnRole::User, "q1").await.unwrap();
        store.append_turn(&token, TurnRole::Assistant, "a1").await.unwrap();

        let handle = store.get(&token).unwrap();
        let session = handle.lock().await;
        assert_eq!(
            session.turns(),
            &[Turn::system("sys"), Turn::user("q1"), Turn::assistant("a1")]
        );
    }

    #[tokio::test]
    async fn test_append_turn_unknown_token() {
        let store = SessionStore::new();
        let err = store.append_turn("missing", TurnRole::User, "hi").await;
        assert_eq!(err, Err(SessionError::NotFound));
    }

    #[tokio::test]
    async fn test_reset_rebuilds_from_meta() {
        let store = SessionStore::new();
        let meta = SessionMeta {
            user_name: Some("Sam".into()),
            cohort_id: Some("c1".into()),
            system_prompt: Some("Custom base.".into()),
            initial_message: "hi".into(),
        };
        let expected = SystemPromptBuilder::build(Some("Custom base."), &meta);
        let token = store.create(meta, "stale".into(), defaults());
        store.append_turn(&token, TurnRole::User, "q").await.unwrap();
        store.append_turn(&token, TurnRole::Assistant, "a").await.unwrap();

        store.reset(&token).await.unwrap();

        let handle = store.get(&token).unwrap();
        let session = handle.lock().await;
        assert_eq!(session.turns(), &[Turn::system(expected)]);
    }

    #[tokio::test]
    async fn test_reset_unknown_token() {
        let store = SessionStore::new();
        assert_eq!(store.reset("missing").await, Err(SessionError::NotFound));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.create(meta_for("A"), "a".into(), defaults());
        let b = store.create(meta_for("B"), "b".into(), defaults());

        store.append_turn(&a, TurnRole::User, "only in a").await.unwrap();

        let b_handle = store.get(&b).unwrap();
        assert_eq!(b_handle.lock().await.turns().len(), 1);
    }
}
