//! Chat service: the per-endpoint orchestration behind start, chat and reset.
//!
//! Owns the [`SessionStore`] and the completion gateway. Upstream failures are
//! logged here in full and surface to callers only as [`ChatError::Upstream`].

use tracing::{info_span, Instrument};

use coursebot_types::chat::{SessionDefaults, SessionMeta, Turn};
use coursebot_types::error::ChatError;
use coursebot_types::llm::CompletionRequest;

use crate::llm::box_gateway::BoxCompletionGateway;
use crate::prompt::SystemPromptBuilder;
use crate::session::store::SessionStore;
use crate::session::token::token_prefix;

/// Optional personalization supplied by the client at start.
///
/// Empty or whitespace-only values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct StartParams {
    pub user_name: Option<String>,
    pub cohort_id: Option<String>,
    pub system_prompt: Option<String>,
    pub initial_message: Option<String>,
}

/// Result of starting a session.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub token: String,
    pub initial_message: String,
}

/// One chat request against an existing session.
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub message: String,
    /// Overrides the session's default temperature for this call only.
    pub temperature: Option<f64>,
    /// Overrides the session's default output limit for this call only.
    pub max_tokens: Option<u32>,
    /// One-off system note placed before the user turn. Sent upstream for
    /// this call only, never recorded in history.
    pub context: Option<String>,
}

pub struct ChatService {
    store: SessionStore,
    gateway: BoxCompletionGateway,
    defaults: SessionDefaults,
}

impl ChatService {
    pub fn new(gateway: BoxCompletionGateway, defaults: SessionDefaults) -> Self {
        Self {
            store: SessionStore::new(),
            gateway,
            defaults,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a session and return its token with the greeting to display.
    pub fn start(&self, params: StartParams) -> StartedSession {
        let user_name = normalize(params.user_name);
        let initial_message = normalize(params.initial_message)
            .unwrap_or_else(|| SystemPromptBuilder::default_initial_message(user_name.as_deref()));

        let meta = SessionMeta {
            user_name,
            cohort_id: normalize(params.cohort_id),
            system_prompt: normalize(params.system_prompt),
            initial_message: initial_message.clone(),
        };
        let system_prompt = SystemPromptBuilder::build(meta.system_prompt.as_deref(), &meta);
        let token = self.store.create(meta, system_prompt, self.defaults.clone());

        StartedSession {
            token,
            initial_message,
        }
    }

    /// Run one conversational turn and return the assistant's reply.
    ///
    /// The session lock is held from the user-turn append through the
    /// assistant-turn append, so concurrent calls on one token run one after
    /// another. On upstream failure the user turn stays in history without a
    /// matching assistant turn.
    pub async fn chat(&self, token: &str, turn: ChatTurn) -> Result<String, ChatError> {
        let handle = self.store.get(token).ok_or(ChatError::InvalidSession)?;
        if turn.message.trim().is_empty() {
            return Err(ChatError::InvalidMessage(
                "message must be a non-empty string".to_string(),
            ));
        }

        let mut session = handle.lock().await;
        session.push(Turn::user(turn.message));

        let mut turns = session.turns().to_vec();
        if let Some(context) = normalize(turn.context) {
            turns.insert(turns.len() - 1, Turn::system(context));
        }

        let request = CompletionRequest {
            model: session.defaults.model.clone(),
            turns,
            temperature: turn.temperature.unwrap_or(session.defaults.temperature),
            max_tokens: turn.max_tokens.unwrap_or(session.defaults.max_tokens),
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.gateway.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = request.temperature,
            session = token_prefix(token),
        );

        match self.gateway.complete(&request).instrument(span).await {
            Ok(reply) => {
                session.push(Turn::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(
                    session = token_prefix(token),
                    error = %e,
                    "completion request failed"
                );
                Err(ChatError::Upstream)
            }
        }
    }

    /// Truncate a session's history back to its rebuilt system turn.
    pub async fn reset(&self, token: &str) -> Result<(), ChatError> {
        self.store.reset(token).await?;
        Ok(())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
