//! Azure OpenAI completion gateway.
//!
//! Uses [`async_openai`] with an [`AzureConfig`] so requests go to
//! `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...`.

pub mod config;

use std::time::Duration;

use async_openai::config::AzureConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use secrecy::ExposeSecret;

use coursebot_core::llm::gateway::CompletionGateway;
use coursebot_types::chat::{Turn, TurnRole};
use coursebot_types::llm::{CompletionRequest, LlmError};

use self::config::AzureGatewayConfig;

/// Gateway to a single Azure OpenAI deployment.
///
/// Does NOT derive Debug: the `async_openai::Client` holds the API key.
pub struct AzureOpenAiGateway {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureOpenAiGateway {
    pub fn new(config: AzureGatewayConfig) -> Self {
        let azure_config = AzureConfig::new()
            .with_api_base(config.endpoint.trim_end_matches('/'))
            .with_api_version(&config.api_version)
            .with_deployment_id(&config.deployment)
            .with_api_key(config.api_key.expose_secret());

        Self {
            client: Client::with_config(azure_config).with_backoff(single_attempt()),
            deployment: config.deployment,
        }
    }

    /// Translate a [`CompletionRequest`] into the chat completions wire shape.
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request.turns.iter().map(to_chat_message).collect();

        // Azure routes by deployment; the model field only has to be present.
        let model = if request.model.is_empty() {
            self.deployment.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: Some(request.temperature as f32),
            ..Default::default()
        }
    }
}

/// Backoff that gives up after the first failure, so each call makes exactly
/// one upstream attempt. The client default retries 5xx and 429 responses for
/// up to 15 minutes.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

fn to_chat_message(turn: &Turn) -> ChatCompletionRequestMessage {
    match turn.role {
        TurnRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(turn.content.clone()),
                name: None,
            })
        }
        TurnRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(turn.content.clone()),
            name: None,
        }),
        TurnRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    turn.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl CompletionGateway for AzureOpenAiGateway {
    fn name(&self) -> &str {
        "azure_openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.prompt_tokens,
                output_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "401"
                || code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Access denied")
            {
                LlmError::Authentication(api_err.message.clone())
            } else if code == "429" || code == "rate_limit_exceeded" {
                LlmError::RateLimited(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => LlmError::Authentication(err.to_string()),
            Some(429) => LlmError::RateLimited(err.to_string()),
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_openai::error::{ApiError, OpenAIError};
    use axum::http::StatusCode;
    use axum::{Json, Router};
    use secrecy::SecretString;
    use serde_json::json;

    fn gateway() -> AzureOpenAiGateway {
        gateway_at("https://example.openai.azure.com/")
    }

    fn request(turns: Vec<Turn>) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            turns,
            temperature: 0.5,
            max_tokens: 256,
        }
    }

    #[test]
    fn test_build_request_maps_every_turn_in_order() {
        let gw = gateway();
        let req = request(vec![
            Turn::system("be helpful"),
            Turn::user("hi"),
            Turn::assistant("hello"),
            Turn::system("context note"),
            Turn::user("next"),
        ]);

        let oai = gw.build_request(&req);

        assert_eq!(oai.model, "gpt-4o-mini");
        assert_eq!(oai.messages.len(), 5);
        assert!(matches!(oai.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(oai.messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(oai.messages[2], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(oai.messages[3], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(oai.messages[4], ChatCompletionRequestMessage::User(_)));
        assert_eq!(oai.max_completion_tokens, Some(256));
        assert_eq!(oai.temperature, Some(0.5));
        assert!(oai.stream.is_none());
    }

    #[test]
    fn test_build_request_empty_model_uses_deployment() {
        let gw = gateway();
        let mut req = request(vec![Turn::user("hi")]);
        req.model = String::new();

        let oai = gw.build_request(&req);
        assert_eq!(oai.model, config::DEFAULT_DEPLOYMENT);
    }

    #[test]
    fn test_gateway_name() {
        assert_eq!(gateway().name(), "azure_openai");
    }

    #[test]
    fn test_map_invalid_argument_is_provider_error() {
        let err = async_openai::error::OpenAIError::InvalidArgument("bad".to_string());
        assert!(matches!(map_openai_error(err), LlmError::Provider { .. }));
    }

    fn api_error(message: &str, r#type: Option<&str>, code: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: message.to_string(),
            r#type: r#type.map(str::to_string),
            param: None,
            code: code.map(str::to_string),
        })
    }

    #[test]
    fn test_map_openai_error_api_auth() {
        let cases = [
            api_error("Incorrect API key provided", Some("authentication_error"), None),
            api_error("Unauthorized", None, Some("401")),
            api_error("bad key", None, Some("invalid_api_key")),
            api_error("Access denied due to invalid subscription key", None, None),
        ];
        for err in cases {
            assert!(matches!(map_openai_error(err), LlmError::Authentication(_)));
        }
    }

    #[test]
    fn test_map_openai_error_rate_limit() {
        for code in ["429", "rate_limit_exceeded"] {
            let err = map_openai_error(api_error("Rate limit exceeded", None, Some(code)));
            assert!(matches!(err, LlmError::RateLimited(ref m) if m == "Rate limit exceeded"));
        }
    }

    #[test]
    fn test_map_openai_error_other_api_error_is_provider() {
        let err = map_openai_error(api_error(
            "content filtered",
            Some("invalid_request_error"),
            None,
        ));
        match err {
            LlmError::Provider { message } => assert!(message.contains("content filtered")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_map_openai_error_json_deserialize() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = map_openai_error(OpenAIError::JSONDeserialize(parse_err, "{not json".to_string()));
        match err {
            LlmError::Deserialization(message) => assert!(message.contains("{not json")),
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    /// Serve `status` with an OpenAI-shaped error body on every path, counting hits.
    async fn failing_upstream(
        status: StatusCode,
        code: &'static str,
    ) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().fallback(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let body = json!({
                    "error": {
                        "message": "upstream unavailable",
                        "type": "server_error",
                        "param": null,
                        "code": code,
                    }
                });
                (status, Json(body))
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), hits)
    }

    fn gateway_at(endpoint: &str) -> AzureOpenAiGateway {
        AzureOpenAiGateway::new(AzureGatewayConfig::new(
            endpoint,
            SecretString::from("test-key".to_string()),
        ))
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (endpoint, hits) = failing_upstream(StatusCode::INTERNAL_SERVER_ERROR, "500").await;
        let gw = gateway_at(&endpoint);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            gw.complete(&request(vec![Turn::user("hi")])),
        )
        .await
        .expect("completion should fail promptly");

        assert!(matches!(result, Err(LlmError::Provider { .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let (endpoint, hits) =
            failing_upstream(StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded").await;
        let gw = gateway_at(&endpoint);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            gw.complete(&request(vec![Turn::user("hi")])),
        )
        .await
        .expect("completion should fail promptly");

        assert!(matches!(result, Err(LlmError::RateLimited(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
