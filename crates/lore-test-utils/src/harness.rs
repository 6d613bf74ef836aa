// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` wires a [`ChatPipeline`] and [`Trainer`] to an in-memory
//! SQLite store and the mock adapters, so a test can seed knowledge, send a
//! message, and inspect everything that was written.

use std::sync::Arc;

use chrono::Utc;
use lore_agent::{ChatAnswer, ChatPipeline, ChatRequest, PipelineDeps, Trainer};
use lore_config::LoreConfig;
use lore_core::LoreError;
use lore_core::traits::KnowledgeStore;
use lore_core::types::{ConversationTurn, EntryKind, KnowledgeEntry};
use lore_storage::SqliteStore;
use tokio_util::sync::CancellationToken;

use crate::mock_embedder::MockEmbedder;
use crate::mock_generator::MockGenerator;

pub const TEST_BOT: &str = "test-bot";
pub const TEST_USER: &str = "test-user";
pub const TEST_SESSION: &str = "test-session";

/// A unit vector whose cosine similarity with `[1, 0]` is `similarity`.
pub fn unit_at_similarity(similarity: f32) -> Vec<f32> {
    vec![similarity, (1.0 - similarity * similarity).max(0.0).sqrt()]
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: LoreConfig,
    embedder: MockEmbedder,
    responses: Vec<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: LoreConfig::default(),
            embedder: MockEmbedder::new(),
            responses: Vec::new(),
        }
    }

    /// Adjust the configuration before the pipeline is built.
    pub fn with_config(mut self, edit: impl FnOnce(&mut LoreConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    pub fn with_embedder(mut self, embedder: MockEmbedder) -> Self {
        self.embedder = embedder;
        self
    }

    /// Set mock generator replies, consumed in order by answers and extractions.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    pub async fn build(self) -> Result<TestHarness, LoreError> {
        let store = Arc::new(SqliteStore::open_in_memory().await?);
        let embedder = Arc::new(self.embedder);
        let generator = Arc::new(MockGenerator::with_responses(self.responses));

        let pipeline = ChatPipeline::new(
            &self.config,
            PipelineDeps {
                knowledge: store.clone(),
                memories: store.clone(),
                unanswered: store.clone(),
                embedder: embedder.clone(),
                generator: generator.clone(),
            },
        );
        let trainer = Trainer::new(store.clone(), embedder.clone());

        Ok(TestHarness {
            store,
            embedder,
            generator,
            pipeline,
            trainer,
            config: self.config,
        })
    }
}

/// A complete test environment with mock adapters and in-memory storage.
pub struct TestHarness {
    /// SQLite store backing knowledge, memories, and the unanswered log.
    pub store: Arc<SqliteStore>,
    pub embedder: Arc<MockEmbedder>,
    pub generator: Arc<MockGenerator>,
    pub pipeline: ChatPipeline,
    pub trainer: Trainer,
    pub config: LoreConfig,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Stores an entry for the test bot with an explicit embedding.
    pub async fn seed_entry(
        &self,
        id: &str,
        kind: EntryKind,
        embedding: Vec<f32>,
    ) -> Result<KnowledgeEntry, LoreError> {
        let now = Utc::now();
        let entry = KnowledgeEntry {
            id: id.to_string(),
            bot_id: TEST_BOT.to_string(),
            kind,
            embedding,
            keywords: Vec::new(),
            category: None,
            summary: None,
            created_at: now,
            updated_at: now,
        };
        self.store.save_entry(&entry).await?;
        Ok(entry)
    }

    /// Sends one message from the test user with no history.
    pub async fn ask(&self, message: &str) -> Result<ChatAnswer, LoreError> {
        self.ask_with_history(message, Vec::new()).await
    }

    pub async fn ask_with_history(
        &self,
        message: &str,
        history: Vec<ConversationTurn>,
    ) -> Result<ChatAnswer, LoreError> {
        let request = ChatRequest {
            bot_id: TEST_BOT.to_string(),
            user_id: TEST_USER.to_string(),
            session_id: TEST_SESSION.to_string(),
            message: message.to_string(),
            history,
            ambient: None,
        };
        self.pipeline.answer(request, &CancellationToken::new()).await
    }
}
