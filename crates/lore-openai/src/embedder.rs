// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter backed by `POST /embeddings`.

use std::time::Duration;

use async_trait::async_trait;
use lore_config::model::OpenAiConfig;
use lore_core::traits::{EmbeddingAdapter, PluginAdapter};
use lore_core::types::{AdapterType, HealthStatus};
use lore_core::{EmbedError, LoreError};
use tracing::{debug, info};

use crate::client::{ApiError, OpenAiClient};
use crate::sanitize::sanitize_input;
use crate::types::{EmbeddingRequest, EmbeddingResponse};
use crate::{health_from_ping, resolve_api_key};

/// Embeds text with an OpenAI-compatible embedding model.
///
/// Construction succeeds without an API key so the process can start; every
/// `embed` call then fails with [`EmbedError::Unconfigured`] and the health
/// check reports the adapter as unhealthy.
pub struct OpenAiEmbedder {
    client: Option<OpenAiClient>,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
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
            model = config.embedding_model,
            dimensions = config.embedding_dimensions,
            configured = client.is_some(),
            "OpenAI embedder initialized"
        );

        Ok(Self {
            client,
            model: config.embedding_model.clone(),
            dimensions: config.embedding_dimensions,
        })
    }

    /// Creates an embedder around an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: OpenAiClient, model: &str, dimensions: usize) -> Self {
        Self {
            client: Some(client),
            model: model.to_string(),
            dimensions,
        }
    }

    fn supports_dimensions(&self) -> bool {
        self.model.starts_with("text-embedding-3")
    }
}

#[async_trait]
impl PluginAdapter for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai-embeddings"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
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
impl EmbeddingAdapter for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let client = self.client.as_ref().ok_or_else(|| {
            EmbedError::Unconfigured("set openai.api_key or OPENAI_API_KEY".into())
        })?;
        if self.model.trim().is_empty() {
            return Err(EmbedError::Unconfigured("openai.embedding_model is empty".into()));
        }

        let input = sanitize_input(text);
        if input.is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        let request = EmbeddingRequest {
            model: self.model.clone(),
            input,
            dimensions: self.supports_dimensions().then_some(self.dimensions),
        };

        let response: EmbeddingResponse =
            client
                .post_json("/embeddings", &request)
                .await
                .map_err(|e| match e {
                    ApiError::Decode(msg) => EmbedError::InvalidResponse(msg),
                    other => EmbedError::ServiceUnavailable {
                        message: other.to_string(),
                        source: Some(Box::new(other)),
                    },
                })?;

        let vector = response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| EmbedError::InvalidResponse("response contained no embeddings".into()))?;

        if vector.len() != self.dimensions {
            return Err(EmbedError::InvalidResponse(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                vector.len()
            )));
        }

        debug!(model = %self.model, dims = vector.len(), "embedded text");
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }
}
