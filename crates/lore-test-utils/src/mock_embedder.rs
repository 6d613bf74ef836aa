// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter backed by a lookup table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lore_core::traits::{EmbeddingAdapter, PluginAdapter};
use lore_core::types::{AdapterType, HealthStatus};
use lore_core::{EmbedError, LoreError};

/// Returns a configured vector for each known text.
///
/// Lookups use the trimmed text. Unknown text fails with
/// `ServiceUnavailable` unless a default vector is set.
pub struct MockEmbedder {
    table: HashMap<String, Vec<f32>>,
    default: Option<Vec<f32>>,
    fail: bool,
    dimensions: usize,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            default: None,
            fail: false,
            dimensions: 2,
            calls: AtomicUsize::new(0),
        }
    }

    /// An embedder whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.dimensions = vector.len();
        self.table.insert(text.trim().to_string(), vector);
        self
    }

    /// Vector returned for text not in the table.
    pub fn with_default(mut self, vector: Vec<f32>) -> Self {
        self.dimensions = vector.len();
        self.default = Some(vector);
        self
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, LoreError> {
        if self.fail {
            Ok(HealthStatus::Unhealthy("mock embedder set to fail".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbedError::ServiceUnavailable {
                message: "mock embedder set to fail".into(),
                source: None,
            });
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        self.table
            .get(text)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| EmbedError::ServiceUnavailable {
                message: format!("no vector configured for {text:?}"),
                source: None,
            })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        "mock-embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn looks_up_trimmed_text() {
        let embedder = MockEmbedder::new().with_vector("hours", vec![1.0, 0.0, 0.0]);
        assert_eq!(embedder.embed(" hours ").await.unwrap(), vec![1.0, 0.0, 0.0]);
        assert_eq!(embedder.dimensions(), 3);
        assert!(embedder.embed("unknown").await.is_err());
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn default_vector_covers_unknown_text() {
        let embedder = MockEmbedder::new().with_default(vec![0.0, 1.0]);
        assert_eq!(embedder.embed("anything").await.unwrap(), vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn failing_embedder_is_unhealthy() {
        let embedder = MockEmbedder::failing().with_default(vec![1.0]);
        assert!(embedder.embed("hours").await.is_err());
        assert!(matches!(
            embedder.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}
