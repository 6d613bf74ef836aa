// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry builders and a table-driven embedder for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use lore_core::EmbedError;
use lore_core::LoreError;
use lore_core::traits::{EmbeddingAdapter, PluginAdapter};
use lore_core::types::{AdapterType, EntryKind, HealthStatus, KnowledgeEntry};

pub(crate) fn entry(id: &str, kind: EntryKind, embedding: Vec<f32>) -> KnowledgeEntry {
    let now = Utc::now();
    KnowledgeEntry {
        id: id.to_string(),
        bot_id: "bot-1".to_string(),
        kind,
        embedding,
        keywords: Vec::new(),
        category: None,
        summary: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn qa(id: &str, question: &str, answer: &str, embedding: Vec<f32>) -> KnowledgeEntry {
    entry(
        id,
        EntryKind::Qa {
            question: question.to_string(),
            answer: answer.to_string(),
        },
        embedding,
    )
}

pub(crate) fn image(id: &str, description: &str, embedding: Vec<f32>) -> KnowledgeEntry {
    entry(
        id,
        EntryKind::Image {
            description: description.to_string(),
            alt_text: String::new(),
            url: format!("https://cdn.example.com/{id}.png"),
        },
        embedding,
    )
}

/// Unit vector whose cosine similarity with `[1, 0]` is exactly `sim`.
pub(crate) fn at_similarity(sim: f64) -> Vec<f32> {
    vec![sim as f32, (1.0 - sim * sim).sqrt() as f32]
}

/// Embedder answering from a fixed text-to-vector table.
pub(crate) struct TableEmbedder {
    pub(crate) table: HashMap<String, Vec<f32>>,
    pub(crate) fail: bool,
}

impl TableEmbedder {
    pub(crate) fn with(query: &str, vector: Vec<f32>) -> Self {
        Self {
            table: HashMap::from([(query.to_string(), vector)]),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            table: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl PluginAdapter for TableEmbedder {
    fn name(&self) -> &str {
        "table"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, LoreError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingAdapter for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if self.fail {
            return Err(EmbedError::ServiceUnavailable {
                message: "connection refused".into(),
                source: None,
            });
        }
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| EmbedError::InvalidResponse(format!("no vector for {text:?}")))
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn model(&self) -> &str {
        "table"
    }
}
