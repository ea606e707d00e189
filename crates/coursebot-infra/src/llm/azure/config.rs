//! Connection settings for an Azure OpenAI deployment.

use secrecy::SecretString;

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-08-01-preview";

/// Deployment name used when none is configured.
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o-mini";

/// Everything needed to reach one Azure OpenAI deployment.
///
/// Does not derive Debug; the key only leaves its wrapper when the client is
/// built.
pub struct AzureGatewayConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com/`.
    pub endpoint: String,
    pub api_version: String,
    /// Deployment name; also sent as the request's model field.
    pub deployment: String,
    pub api_key: SecretString,
}

impl AzureGatewayConfig {
    pub fn new(endpoint: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            api_key,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }
}
