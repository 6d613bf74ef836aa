// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only listings: entries, memories, and unanswered questions.

use lore_config::LoreConfig;
use lore_core::LoreError;
use lore_core::traits::{KnowledgeStore, MemoryStore, UnansweredLog};
use lore_core::types::KnowledgeEntry;

use crate::app::open_store;

pub async fn run_entries(config: &LoreConfig, bot: &str) -> Result<(), LoreError> {
    let store = open_store(config).await?;
    let entries = store.entries_for_bot(bot).await?;
    if entries.is_empty() {
        println!("{bot} has not been taught anything yet.");
    }
    for entry in &entries {
        println!("{}", entry_line(entry));
    }
    store.close().await
}

pub async fn run_memories(config: &LoreConfig, bot: &str, user: &str) -> Result<(), LoreError> {
    let store = open_store(config).await?;
    for memory in store.memories_for(user, bot).await? {
        println!(
            "{:<20} {:<30} {:<10} importance={} confidence={:.2}",
            memory.key,
            memory.value,
            memory.memory_type.to_string(),
            memory.importance,
            memory.confidence
        );
    }
    store.close().await
}

pub async fn run_unanswered(config: &LoreConfig, bot: &str) -> Result<(), LoreError> {
    let store = open_store(config).await?;
    for q in store.unanswered_for_bot(bot).await? {
        println!(
            "{}  {:.2}  {}  ({})",
            q.asked_at.format("%Y-%m-%d %H:%M"),
            q.confidence,
            q.question,
            q.user_id
        );
    }
    store.close().await
}

/// One line per entry: id, kind, embedding marker, and a short title.
fn entry_line(entry: &KnowledgeEntry) -> String {
    let marker = if entry.has_embedding() { "E" } else { "-" };
    let title: String = entry
        .embedding_text()
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(60)
        .collect();
    format!("{}  {:<7} {marker}  {title}", entry.id, entry.kind.as_str())
}
