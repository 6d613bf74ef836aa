// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-generation adapter backed by `POST /chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use lore_config::model::OpenAiConfig;
use lore_core::LoreError;
use lore_core::traits::{GenerationAdapter, PluginAdapter};
use lore_core::types::{AdapterType, GenerationRequest, GenerationResponse, HealthStatus};
use tracing::{debug, info};

use crate::client::{ApiError, OpenAiClient};
use crate::types::{ChatMessage, ChatRequest, ChatResponse};
use crate::{health_from_ping, resolve_api_key};

/// Chat-completion adapter used for answers and memory extraction.
pub struct OpenAiGenerator {
    client: Option<OpenAiClient>,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: &OpenAiConfig) -> Result<Self, LoreError> {
        let client = match resolve_api_key(&config.api_key) {
            Some(key) => Some(
                OpenAiClient::new(
                    &key,
                    &config.base_url,
                    Duration::from_secs(config.timeout_secs),
                    config.max_retries,
                )
                .map_err(LoreError::Config)?,
            ),
            None => None,
        };

        info!(
            model = config.chat_model,
            configured = client.is_some(),
            "OpenAI generator initialized"
        );

        Ok(Self {
            client,
            model: config.chat_model.clone(),
        })
    }

    /// Creates a generator around an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: OpenAiClient, model: &str) -> Self {
        Self {
            client: Some(client),
            model: model.to_string(),
        }
    }

    fn to_chat_request(&self, request: GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt),
                ChatMessage::user(request.user_message),
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai-chat"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, LoreError> {
        match &self.client {
            Some(client) => Ok(health_from_ping(client.ping().await)),
            None => Ok(HealthStatus::Unhealthy(
                "no API key: set openai.api_key or OPENAI_API_KEY".into(),
            )),
        }
    }
}

#[async_trait]
impl GenerationAdapter for OpenAiGenerator {
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, LoreError> {
        let client = self.client.as_ref().ok_or_else(|| {
            LoreError::Config("OpenAI API key not found. Set openai.api_key or OPENAI_API_KEY.".into())
        })?;

        let chat = self.to_chat_request(request);
        let response: ChatResponse =
            client
                .post_json("/chat/completions", &chat)
                .await
                .map_err(|e| match e {
                    ApiError::Timeout(duration) => LoreError::Timeout { duration },
                    other => LoreError::Generation {
                        message: other.to_string(),
                        source: Some(Box::new(other)),
                    },
                })?;

        let choice = response.choices.into_iter().next().ok_or_else(|| LoreError::Generation {
            message: "response contained no choices".into(),
            source: None,
        })?;
        let content = choice
            .message
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LoreError::Generation {
                message: "response contained an empty message".into(),
                source: None,
            })?;

        debug!(
            model = %response.model,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            chars = content.len(),
            "completion received"
        );

        Ok(GenerationResponse {
            content,
            model: if response.model.is_empty() {
                self.model.clone()
            } else {
                response.model
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer) -> OpenAiGenerator {
        let client = OpenAiClient::new("sk-test", &server.uri(), Duration::from_secs(5), 1)
            .expect("client")
            .with_retry_delay(Duration::from_millis(10));
        OpenAiGenerator::with_client(client, "gpt-4o-mini")
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "You are lore.".into(),
            user_message: "what time do you open".into(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    #[tokio::test]
    async fn completes_with_system_and_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 500,
                "messages": [
                    {"role": "system", "content": "You are lore."},
                    {"role": "user", "content": "what time do you open"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{
                    "message": {"role": "assistant", "content": " We open at 9. "},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = generator(&server).complete(request()).await.unwrap();
        assert_eq!(response.content, "We open at 9.");
        assert_eq!(response.model, "gpt-4o-mini-2024-07-18");
    }

    #[tokio::test]
    async fn empty_choices_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = generator(&server).complete(request()).await.unwrap_err();
        assert!(matches!(err, LoreError::Generation { .. }));
    }

    #[tokio::test]
    async fn api_error_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "max_tokens is too large", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let err = generator(&server).complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("max_tokens is too large"));
    }

    #[tokio::test]
    async fn unauthorized_health_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let status = generator(&server).health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Unhealthy(_)));
    }
}
