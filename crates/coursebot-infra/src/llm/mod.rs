//! Completion gateway implementations.

pub mod azure;

use coursebot_core::llm::box_gateway::BoxCompletionGateway;

use self::azure::config::AzureGatewayConfig;
use self::azure::AzureOpenAiGateway;

/// Build the application's gateway from Azure settings.
pub fn create_gateway(config: AzureGatewayConfig) -> BoxCompletionGateway {
    tracing::info!(
        endpoint = %config.endpoint,
        deployment = %config.deployment,
        api_version = %config.api_version,
        "configured Azure OpenAI gateway"
    );
    BoxCompletionGateway::new(AzureOpenAiGateway::new(config))
}
