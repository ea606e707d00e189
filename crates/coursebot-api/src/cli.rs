//! Command-line and environment configuration.
//!
//! Every setting can come from a flag or its environment variable; values are
//! read once at startup.

use clap::Parser;
use secrecy::SecretString;

use coursebot_infra::llm::azure::config::{
    AzureGatewayConfig, DEFAULT_API_VERSION, DEFAULT_DEPLOYMENT,
};
use coursebot_types::chat::SessionDefaults;

/// Coursebot - session-keeping chat proxy for a hosted course assistant.
#[derive(Parser, Debug)]
#[command(name = "coursebot", version, about)]
pub struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Azure OpenAI API key.
    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Azure OpenAI resource endpoint.
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    pub endpoint: String,

    /// Azure OpenAI REST API version.
    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Deployment (model) name used for every session.
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT", default_value = DEFAULT_DEPLOYMENT)]
    pub deployment: String,

    /// Sampling temperature when a chat request does not set one.
    #[arg(long, env = "DEFAULT_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f64,

    /// Output token limit when a chat request does not set one.
    #[arg(long, env = "DEFAULT_MAX_TOKENS", default_value_t = 800)]
    pub max_tokens: u32,

    /// Emit logs as JSON lines.
    #[arg(long, env = "COURSEBOT_LOG_JSON")]
    pub log_json: bool,

    /// Export spans via OpenTelemetry (stdout exporter).
    #[arg(long, env = "COURSEBOT_OTEL")]
    pub otel: bool,
}

impl Cli {
    /// Listen address as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            model: self.deployment.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn gateway_config(&self) -> AzureGatewayConfig {
        AzureGatewayConfig::new(&self.endpoint, SecretString::from(self.api_key.clone()))
            .with_api_version(&self.api_version)
            .with_deployment(&self.deployment)
    }
}
