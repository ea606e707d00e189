//! CompletionGateway trait definition.

use coursebot_types::llm::{CompletionRequest, LlmError};

/// Boundary to the hosted completion API.
///
/// Given the full ordered turn history and sampling parameters, returns the
/// assistant's reply text. Implementations classify upstream failures into
/// [`LlmError`] variants; callers decide how much of that to reveal.
///
/// Implementations live in coursebot-infra (e.g., `AzureOpenAiGateway`).
pub trait CompletionGateway: Send + Sync {
    /// Human-readable backend name (e.g., "azure_openai").
    fn name(&self) -> &str;

    /// Send one completion request and wait for the reply.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
