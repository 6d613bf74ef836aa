// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator-facing training: teach, edit, and forget knowledge entries.
//!
//! Embeddings are computed once when content is taught and recomputed when
//! it is edited. If the embedding service is unavailable the entry is still
//! stored, without an embedding, so the keyword strategy can find it.

use std::sync::Arc;

use chrono::Utc;
use lore_core::LoreError;
use lore_core::traits::{EmbeddingAdapter, KnowledgeStore};
use lore_core::types::{EntryKind, KnowledgeEntry};
use tracing::{info, warn};
use uuid::Uuid;

use crate::metrics;

/// Optional keyword-strategy metadata attached to a taught entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryLabels {
    pub keywords: Vec<String>,
    pub category: Option<String>,
    pub summary: Option<String>,
}

impl EntryLabels {
    fn normalized(self) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        for k in self.keywords {
            let k = k.trim().to_lowercase();
            if !k.is_empty() && !keywords.contains(&k) {
                keywords.push(k);
            }
        }
        Self {
            keywords,
            category: non_blank(self.category),
            summary: non_blank(self.summary),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Writes knowledge entries for one store, embedding them on the way in.
pub struct Trainer {
    store: Arc<dyn KnowledgeStore>,
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl Trainer {
    pub fn new(store: Arc<dyn KnowledgeStore>, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { store, embedder }
    }

    pub async fn teach_qa(
        &self,
        bot_id: &str,
        question: &str,
        answer: &str,
        labels: EntryLabels,
    ) -> Result<KnowledgeEntry, LoreError> {
        let kind = EntryKind::Qa {
            question: question.to_string(),
            answer: answer.to_string(),
        };
        self.teach(bot_id, kind, labels).await
    }

    pub async fn teach_context(
        &self,
        bot_id: &str,
        block: &str,
        labels: EntryLabels,
    ) -> Result<KnowledgeEntry, LoreError> {
        let kind = EntryKind::Context {
            block: block.to_string(),
        };
        self.teach(bot_id, kind, labels).await
    }

    pub async fn teach_image(
        &self,
        bot_id: &str,
        description: &str,
        alt_text: &str,
        url: &str,
        labels: EntryLabels,
    ) -> Result<KnowledgeEntry, LoreError> {
        let kind = EntryKind::Image {
            description: description.to_string(),
            alt_text: alt_text.to_string(),
            url: url.to_string(),
        };
        self.teach(bot_id, kind, labels).await
    }

    /// Replaces an entry's content and recomputes its embedding.
    ///
    /// Labels are kept. Returns `None` when the entry does not exist.
    pub async fn edit_entry(
        &self,
        bot_id: &str,
        id: &str,
        kind: EntryKind,
    ) -> Result<Option<KnowledgeEntry>, LoreError> {
        let kind = trimmed(kind);
        validate(&kind)?;
        let Some(mut entry) = self.store.get_entry(bot_id, id).await? else {
            return Ok(None);
        };

        entry.kind = kind;
        entry.embedding = self.embed_or_empty(&entry).await;
        entry.updated_at = Utc::now();
        self.store.save_entry(&entry).await?;

        info!(bot_id, id, kind = entry.kind.as_str(), "knowledge entry edited");
        Ok(Some(entry))
    }

    pub async fn delete_entry(&self, bot_id: &str, id: &str) -> Result<bool, LoreError> {
        let deleted = self.store.delete_entry(bot_id, id).await?;
        if deleted {
            info!(bot_id, id, "knowledge entry deleted");
        }
        Ok(deleted)
    }

    async fn teach(
        &self,
        bot_id: &str,
        kind: EntryKind,
        labels: EntryLabels,
    ) -> Result<KnowledgeEntry, LoreError> {
        if bot_id.trim().is_empty() {
            return Err(LoreError::InvalidInput("bot id is empty".into()));
        }
        let kind = trimmed(kind);
        validate(&kind)?;

        let labels = labels.normalized();
        let now = Utc::now();
        let mut entry = KnowledgeEntry {
            id: Uuid::new_v4().to_string(),
            bot_id: bot_id.to_string(),
            kind,
            embedding: Vec::new(),
            keywords: labels.keywords,
            category: labels.category,
            summary: labels.summary,
            created_at: now,
            updated_at: now,
        };
        entry.embedding = self.embed_or_empty(&entry).await;
        self.store.save_entry(&entry).await?;

        info!(
            bot_id,
            id = %entry.id,
            kind = entry.kind.as_str(),
            embedded = entry.has_embedding(),
            "knowledge entry taught"
        );
        Ok(entry)
    }

    async fn embed_or_empty(&self, entry: &KnowledgeEntry) -> Vec<f32> {
        match self.embedder.embed(&entry.embedding_text()).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(
                    bot_id = %entry.bot_id,
                    id = %entry.id,
                    error = %e,
                    "embedding failed, storing entry for keyword search only"
                );
                metrics::record_fallback("train_embedding");
                Vec::new()
            }
        }
    }
}

/// Trims every text field, so taught and edited content embed the same way.
fn trimmed(kind: EntryKind) -> EntryKind {
    let trim = |s: String| s.trim().to_string();
    match kind {
        EntryKind::Qa { question, answer } => EntryKind::Qa {
            question: trim(question),
            answer: trim(answer),
        },
        EntryKind::Context { block } => EntryKind::Context { block: trim(block) },
        EntryKind::Image {
            description,
            alt_text,
            url,
        } => EntryKind::Image {
            description: trim(description),
            alt_text: trim(alt_text),
            url: trim(url),
        },
    }
}

fn validate(kind: &EntryKind) -> Result<(), LoreError> {
    let missing = match kind {
        EntryKind::Qa { question, .. } if question.trim().is_empty() => Some("question"),
        EntryKind::Qa { answer, .. } if answer.trim().is_empty() => Some("answer"),
        EntryKind::Context { block } if block.trim().is_empty() => Some("context block"),
        EntryKind::Image { description, .. } if description.trim().is_empty() => {
            Some("image description")
        }
        EntryKind::Image { url, .. } if url.trim().is_empty() => Some("image url"),
        _ => None,
    };
    match missing {
        Some(field) => Err(LoreError::InvalidInput(format!("{field} is empty"))),
        None => Ok(()),
    }
}
