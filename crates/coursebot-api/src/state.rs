//! Application state shared by every request handler.

use std::sync::Arc;

use coursebot_core::chat::service::ChatService;
use coursebot_infra::llm::create_gateway;

use crate::cli::Cli;

/// Shared application state.
///
/// Cloned into each handler by axum; the session store inside the chat
/// service is created once at startup and lives until shutdown.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat_service: ChatService) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }

    /// Wire the Azure gateway and chat service from startup configuration.
    pub fn from_cli(cli: &Cli) -> Self {
        let gateway = create_gateway(cli.gateway_config());
        Self::new(ChatService::new(gateway, cli.session_defaults()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use coursebot_core::chat::service::ChatService;
    use coursebot_core::llm::box_gateway::BoxCompletionGateway;
    use coursebot_core::llm::scripted::ScriptedGateway;
    use coursebot_types::chat::SessionDefaults;

    use super::AppState;

    /// App state backed by a scripted gateway.
    pub fn state_with(gateway: &ScriptedGateway) -> AppState {
        AppState::new(ChatService::new(
            BoxCompletionGateway::new(gateway.clone()),
            SessionDefaults {
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 800,
            },
        ))
    }
}
