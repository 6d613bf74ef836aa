// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only view over one bot's knowledge entries.

use lore_core::LoreError;
use lore_core::traits::KnowledgeStore;
use lore_core::types::KnowledgeEntry;

/// Snapshot of a bot's taught knowledge, read once per chat turn.
///
/// Entries that belong to another bot are dropped at construction, so every
/// ranking pass only ever sees the owning bot's knowledge.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeView {
    bot_id: String,
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeView {
    pub fn new(bot_id: impl Into<String>, entries: Vec<KnowledgeEntry>) -> Self {
        let bot_id = bot_id.into();
        let before = entries.len();
        let entries: Vec<KnowledgeEntry> =
            entries.into_iter().filter(|e| e.bot_id == bot_id).collect();
        if entries.len() != before {
            tracing::warn!(
                bot_id = %bot_id,
                dropped = before - entries.len(),
                "ignoring knowledge entries owned by another bot"
            );
        }
        Self { bot_id, entries }
    }

    /// Reads every entry for `bot_id` from the store.
    pub async fn load(store: &dyn KnowledgeStore, bot_id: &str) -> Result<Self, LoreError> {
        let entries = store.entries_for_bot(bot_id).await?;
        Ok(Self::new(bot_id, entries))
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Entries eligible for embedding retrieval.
    pub fn embedded(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter().filter(|e| e.has_embedding())
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::qa;

    #[test]
    fn foreign_entries_are_dropped() {
        let mut other = qa("x", "q", "a", vec![1.0]);
        other.bot_id = "other-bot".into();
        let view = KnowledgeView::new("bot-1", vec![qa("a", "q", "a", vec![1.0]), other]);
        assert_eq!(view.len(), 1);
        assert!(view.get("x").is_none());
        assert!(view.get("a").is_some());
    }

    #[test]
    fn embedded_skips_entries_without_vectors() {
        let view = KnowledgeView::new(
            "bot-1",
            vec![qa("a", "q", "a", vec![1.0]), qa("b", "q", "a", vec![])],
        );
        let ids: Vec<&str> = view.embedded().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }
}
