// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires the SQLite store and OpenAI adapters into a pipeline and trainer.

use std::sync::Arc;

use lore_agent::{ChatPipeline, PipelineDeps, Trainer};
use lore_config::LoreConfig;
use lore_core::LoreError;
use lore_openai::{OpenAiEmbedder, OpenAiGenerator};
use lore_storage::SqliteStore;

/// Everything a command needs, opened once per invocation.
pub struct App {
    pub store: Arc<SqliteStore>,
    pub pipeline: ChatPipeline,
    pub trainer: Trainer,
}

impl App {
    pub async fn open(config: &LoreConfig) -> Result<Self, LoreError> {
        let store = Arc::new(SqliteStore::open(&config.storage).await?);
        let embedder = Arc::new(OpenAiEmbedder::new(&config.openai)?);
        let generator = Arc::new(OpenAiGenerator::new(&config.openai)?);

        let pipeline = ChatPipeline::new(
            config,
            PipelineDeps {
                knowledge: store.clone(),
                memories: store.clone(),
                unanswered: store.clone(),
                embedder: embedder.clone(),
                generator,
            },
        );
        let trainer = Trainer::new(store.clone(), embedder);

        Ok(Self {
            store,
            pipeline,
            trainer,
        })
    }

    /// Checkpoints the WAL before exit.
    pub async fn close(self) -> Result<(), LoreError> {
        self.store.close().await
    }
}

/// Opens only the store, for commands that never call out to services.
pub async fn open_store(config: &LoreConfig) -> Result<SqliteStore, LoreError> {
    SqliteStore::open(&config.storage).await
}
