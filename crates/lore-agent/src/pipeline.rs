// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat pipeline: one user message in, one grounded reply out.
//!
//! Steps run strictly in order: load knowledge, rank, gate, assemble,
//! generate, extract memories, merge. Every external call is raced against
//! the caller's cancellation token; once cancellation is observed nothing
//! else is written.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use lore_config::LoreConfig;
use lore_config::model::ConfidenceConfig;
use lore_context::{PromptAssembler, PromptInput};
use lore_core::LoreError;
use lore_core::traits::{
    EmbeddingAdapter, GenerationAdapter, KnowledgeStore, MemoryStore, UnansweredLog,
};
use lore_core::types::{
    AmbientContext, ConversationTurn, ImageRef, UnansweredQuestion, UserMemory,
};
use lore_memory::{ExtractedMemory, ExtractionInput, MemoryExtractor, merge_memories};
use lore_retrieval::{ConfidenceGate, KnowledgeView, Ranker};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::metrics;
use crate::responder::ResponseGenerator;

/// One inbound chat message and its surroundings.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub bot_id: String,
    pub user_id: String,
    pub session_id: String,
    pub message: String,
    /// Prior turns of this session, oldest first.
    pub history: Vec<ConversationTurn>,
    pub ambient: Option<AmbientContext>,
}

/// What the caller shows the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    pub reply: String,
    pub confidence: f64,
    pub was_answered: bool,
    pub used_entry_ids: Vec<String>,
    /// Images to display alongside the reply.
    pub images: Vec<ImageRef>,
}

/// Services and stores the pipeline talks to.
pub struct PipelineDeps {
    pub knowledge: Arc<dyn KnowledgeStore>,
    pub memories: Arc<dyn MemoryStore>,
    pub unanswered: Arc<dyn UnansweredLog>,
    pub embedder: Arc<dyn EmbeddingAdapter>,
    pub generator: Arc<dyn GenerationAdapter>,
}

type PairKey = (String, String);

/// Answers chat messages for any bot in the knowledge store.
pub struct ChatPipeline {
    knowledge: Arc<dyn KnowledgeStore>,
    memories: Arc<dyn MemoryStore>,
    unanswered: Arc<dyn UnansweredLog>,
    ranker: Ranker,
    confidence: ConfidenceConfig,
    assembler: PromptAssembler,
    responder: ResponseGenerator,
    extractor: Option<MemoryExtractor>,
    /// Serializes read-merge-write of memories per (user, bot).
    memory_locks: DashMap<PairKey, Arc<Mutex<()>>>,
}

impl ChatPipeline {
    pub fn new(config: &LoreConfig, deps: PipelineDeps) -> Self {
        let extractor = config
            .memory
            .enabled
            .then(|| MemoryExtractor::new(deps.generator.clone(), config.memory.clone()));

        Self {
            knowledge: deps.knowledge,
            memories: deps.memories,
            unanswered: deps.unanswered,
            ranker: Ranker::from_config(&config.retrieval, deps.embedder),
            confidence: config.confidence.clone(),
            assembler: PromptAssembler::new(&config.agent, &config.prompt),
            responder: ResponseGenerator::new(
                deps.generator,
                config.prompt.temperature,
                config.prompt.max_tokens,
            ),
            extractor,
            memory_locks: DashMap::new(),
        }
    }

    /// Answers one message.
    ///
    /// Service and storage failures degrade to their fallbacks and never
    /// surface here; the only error is [`LoreError::Cancelled`].
    pub async fn answer(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatAnswer, LoreError> {
        if cancel.is_cancelled() {
            return Err(LoreError::Cancelled);
        }
        let bot_id = request.bot_id.as_str();
        let user_id = request.user_id.as_str();

        // A failed load says nothing about whether the bot was trained.
        let (view, has_training_data) =
            match cancellable(cancel, KnowledgeView::load(self.knowledge.as_ref(), bot_id))
                .await?
            {
                Ok(view) => {
                    let trained = !view.is_empty();
                    (view, trained)
                }
                Err(e) => {
                    warn!(bot_id, error = %e, "failed to load knowledge, answering without it");
                    metrics::record_fallback("knowledge_load");
                    (KnowledgeView::new(bot_id, Vec::new()), true)
                }
            };

        let ranking = cancellable(cancel, self.ranker.rank(&request.message, &view)).await?;
        let gate = ConfidenceGate::for_strategy(&self.confidence, ranking.strategy);
        let decision = gate.evaluate(&ranking.result);
        metrics::record_confidence(&ranking.strategy.to_string(), decision.confidence);

        debug!(
            bot_id,
            strategy = %ranking.strategy,
            entries = ranking.result.entries.len(),
            confidence = decision.confidence,
            threshold = decision.threshold,
            "retrieval gated"
        );

        if !decision.was_answered {
            self.record_unanswered(&request, decision.confidence, cancel)
                .await?;
        }

        let memories = self.read_memories(user_id, bot_id, cancel).await?;

        let prompt = self.assembler.assemble(&PromptInput {
            query: &request.message,
            retrieval: &ranking.result,
            history: &request.history,
            ambient: request.ambient.as_ref(),
            memories: &memories,
        });

        let reply = cancellable(cancel, self.responder.generate(prompt, has_training_data)).await?;
        if let Some(reason) = reply.fallback {
            metrics::record_fallback(match reason {
                crate::responder::FallbackReason::NoTrainingData => "generation_untrained",
                crate::responder::FallbackReason::GenerationFailed => "generation",
            });
        }

        if !reply.is_fallback() {
            self.remember(&request, &reply.text, &memories, cancel).await?;
        }

        metrics::record_turn(decision.was_answered);
        info!(
            bot_id,
            user_id,
            session_id = %request.session_id,
            was_answered = decision.was_answered,
            confidence = decision.confidence,
            "chat turn complete"
        );

        Ok(ChatAnswer {
            reply: reply.text,
            confidence: decision.confidence,
            was_answered: decision.was_answered,
            used_entry_ids: ranking.result.entry_ids(),
            images: ranking.result.images(),
        })
    }

    async fn record_unanswered(
        &self,
        request: &ChatRequest,
        confidence: f64,
        cancel: &CancellationToken,
    ) -> Result<(), LoreError> {
        let question = UnansweredQuestion {
            id: Uuid::new_v4().to_string(),
            bot_id: request.bot_id.clone(),
            user_id: request.user_id.clone(),
            session_id: request.session_id.clone(),
            question: request.message.clone(),
            confidence,
            asked_at: Utc::now(),
        };

        if cancel.is_cancelled() {
            return Err(LoreError::Cancelled);
        }
        match self.unanswered.record_unanswered(&question).await {
            Ok(()) => {
                metrics::record_unanswered();
                info!(bot_id = %question.bot_id, confidence, "recorded unanswered question");
            }
            Err(e) => {
                warn!(bot_id = %question.bot_id, error = %e, "failed to record unanswered question");
                metrics::record_fallback("unanswered_log");
            }
        }
        Ok(())
    }

    async fn read_memories(
        &self,
        user_id: &str,
        bot_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<UserMemory>, LoreError> {
        match cancellable(cancel, self.memories.memories_for(user_id, bot_id)).await? {
            Ok(memories) => Ok(memories),
            Err(e) => {
                warn!(user_id, bot_id, error = %e, "failed to read memories, answering without them");
                metrics::record_fallback("memory_read");
                Ok(Vec::new())
            }
        }
    }

    /// Extracts facts from this exchange and merges them into stored memory.
    async fn remember(
        &self,
        request: &ChatRequest,
        reply: &str,
        known: &[UserMemory],
        cancel: &CancellationToken,
    ) -> Result<(), LoreError> {
        let Some(extractor) = &self.extractor else {
            return Ok(());
        };

        let input = ExtractionInput {
            message: &request.message,
            reply,
            history: &request.history,
            existing: known,
        };
        let extraction = match cancellable(cancel, extractor.extract(&input)).await? {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!(error = %e, "memory extraction failed, skipping");
                metrics::record_fallback("memory_extraction");
                return Ok(());
            }
        };
        if extraction.is_empty() {
            return Ok(());
        }
        let candidates: Vec<_> = extraction.candidates().cloned().collect();

        let key = (request.user_id.clone(), request.bot_id.clone());
        let lock = self
            .memory_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let result = match cancellable(cancel, lock.lock()).await {
            Ok(_guard) => self.merge_locked(request, &candidates, cancel).await,
            Err(e) => Err(e),
        };
        drop(lock);
        self.memory_locks
            .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

        match result {
            Err(LoreError::Cancelled) => Err(LoreError::Cancelled),
            Err(e) => {
                warn!(error = %e, "failed to merge memories");
                metrics::record_fallback("memory_write");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    /// Read-merge-write; the caller holds the pair's lock.
    async fn merge_locked(
        &self,
        request: &ChatRequest,
        candidates: &[ExtractedMemory],
        cancel: &CancellationToken,
    ) -> Result<(), LoreError> {
        // Compare against what is stored now, not what was read for the prompt.
        let fresh = cancellable(
            cancel,
            self.memories.memories_for(&request.user_id, &request.bot_id),
        )
        .await??;
        let outcome = merge_memories(
            &fresh,
            candidates,
            &request.user_id,
            &request.bot_id,
            Utc::now(),
        );
        if outcome.is_empty() {
            return Ok(());
        }
        if cancel.is_cancelled() {
            return Err(LoreError::Cancelled);
        }

        self.memories
            .write_memories(&outcome.inserted, &outcome.updated)
            .await?;
        metrics::record_memories_written(outcome.inserted.len(), outcome.updated.len());
        debug!(
            user_id = %request.user_id,
            inserted = outcome.inserted.len(),
            updated = outcome.updated.len(),
            "memories merged"
        );
        Ok(())
    }
}

/// Runs `fut` unless `cancel` fires first.
async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, LoreError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LoreError::Cancelled),
        out = fut => Ok(out),
    }
}
