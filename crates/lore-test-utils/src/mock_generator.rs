// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text-generation adapter for deterministic testing.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use lore_core::LoreError;
use lore_core::traits::{GenerationAdapter, PluginAdapter};
use lore_core::types::{AdapterType, GenerationRequest, GenerationResponse, HealthStatus};
use tokio::sync::Mutex;

/// A mock generator that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a default
/// "mock response" text is returned. Every request is captured.
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    fail_all: Option<String>,
    delay: Option<Duration>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fail_all: None,
            delay: None,
        }
    }

    /// Create a mock generator pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            ..Self::new()
        }
    }

    /// A generator whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_all: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Sleep before answering, to exercise timeouts and cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a single failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, LoreError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl GenerationAdapter for MockGenerator {
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, LoreError> {
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.fail_all {
            return Err(LoreError::Generation {
                message: message.clone(),
                source: None,
            });
        }

        let next = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()));
        match next {
            Ok(content) => Ok(GenerationResponse {
                content,
                model: "mock-model".to_string(),
            }),
            Err(message) => Err(LoreError::Generation {
                message,
                source: None,
            }),
        }
    }
}
