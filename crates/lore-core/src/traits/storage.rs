// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for knowledge entries, user memories, and unanswered questions.
//!
//! The pipeline receives these as explicit handles; it never reaches for
//! ambient global state.

use async_trait::async_trait;

use crate::error::LoreError;
use crate::types::{KnowledgeEntry, UnansweredQuestion, UserMemory};

/// Persistence for a bot's taught knowledge.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Reads every entry owned by `bot_id`.
    async fn entries_for_bot(&self, bot_id: &str) -> Result<Vec<KnowledgeEntry>, LoreError>;

    /// Reads one entry.
    async fn get_entry(&self, bot_id: &str, id: &str) -> Result<Option<KnowledgeEntry>, LoreError>;

    /// Inserts or replaces an entry.
    async fn save_entry(&self, entry: &KnowledgeEntry) -> Result<(), LoreError>;

    /// Deletes an entry. Returns false if it did not exist.
    async fn delete_entry(&self, bot_id: &str, id: &str) -> Result<bool, LoreError>;
}

/// Persistence for per-(user, bot) memories.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Reads every memory for the pair.
    async fn memories_for(&self, user_id: &str, bot_id: &str) -> Result<Vec<UserMemory>, LoreError>;

    /// Inserts new memories and updates existing ones in a single write.
    async fn write_memories(
        &self,
        inserted: &[UserMemory],
        updated: &[UserMemory],
    ) -> Result<(), LoreError>;
}

/// Log of questions the bot could not answer, for operator follow-up.
#[async_trait]
pub trait UnansweredLog: Send + Sync {
    async fn record_unanswered(&self, question: &UnansweredQuestion) -> Result<(), LoreError>;

    async fn unanswered_for_bot(&self, bot_id: &str) -> Result<Vec<UnansweredQuestion>, LoreError>;
}
