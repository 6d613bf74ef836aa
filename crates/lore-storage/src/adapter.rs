// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the Lore storage traits.

use async_trait::async_trait;
use lore_config::model::StorageConfig;
use lore_core::types::{AdapterType, HealthStatus, KnowledgeEntry, UnansweredQuestion, UserMemory};
use lore_core::{KnowledgeStore, LoreError, MemoryStore, PluginAdapter, UnansweredLog};
use tracing::debug;

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for knowledge, memories, and unanswered questions.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the database named by `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self, LoreError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite storage initialized");
        Ok(Self { db })
    }

    pub async fn open_in_memory() -> Result<Self, LoreError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoints the WAL before the process exits.
    pub async fn close(&self) -> Result<(), LoreError> {
        self.db.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LoreError> {
        match self.db.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl KnowledgeStore for SqliteStore {
    async fn entries_for_bot(&self, bot_id: &str) -> Result<Vec<KnowledgeEntry>, LoreError> {
        queries::knowledge::entries_for_bot(&self.db, bot_id).await
    }

    async fn get_entry(&self, bot_id: &str, id: &str) -> Result<Option<KnowledgeEntry>, LoreError> {
        queries::knowledge::get_entry(&self.db, bot_id, id).await
    }

    async fn save_entry(&self, entry: &KnowledgeEntry) -> Result<(), LoreError> {
        queries::knowledge::save_entry(&self.db, entry).await
    }

    async fn delete_entry(&self, bot_id: &str, id: &str) -> Result<bool, LoreError> {
        queries::knowledge::delete_entry(&self.db, bot_id, id).await
    }
}

#[async_trait]
impl MemoryStore for SqliteStore {
    async fn memories_for(&self, user_id: &str, bot_id: &str) -> Result<Vec<UserMemory>, LoreError> {
        queries::memories::memories_for(&self.db, user_id, bot_id).await
    }

    async fn write_memories(
        &self,
        inserted: &[UserMemory],
        updated: &[UserMemory],
    ) -> Result<(), LoreError> {
        queries::memories::write_memories(&self.db, inserted, updated).await
    }
}

#[async_trait]
impl UnansweredLog for SqliteStore {
    async fn record_unanswered(&self, question: &UnansweredQuestion) -> Result<(), LoreError> {
        queries::unanswered::record_unanswered(&self.db, question).await
    }

    async fn unanswered_for_bot(&self, bot_id: &str) -> Result<Vec<UnansweredQuestion>, LoreError> {
        queries::unanswered::unanswered_for_bot(&self.db, bot_id).await
    }
}
