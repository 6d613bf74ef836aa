// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configured ranker: picks the strategy and budget from configuration.

use std::sync::Arc;

use lore_config::model::{RetrievalConfig, StrategyKind};
use lore_core::traits::EmbeddingAdapter;
use lore_core::types::RetrievalResult;

use crate::embedding::EmbeddingStrategy;
use crate::keyword::KeywordStrategy;
use crate::strategy::{RetrievalBudget, ScoringStrategy};
use crate::view::KnowledgeView;

/// A retrieval result tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub strategy: StrategyKind,
    pub result: RetrievalResult,
}

/// Strategy-agnostic entry point for ranking a bot's knowledge.
///
/// When the configured strategy is embedding-based but none of the bot's
/// entries carry an embedding (for example because they were taught while
/// the embedding service was down), the keyword strategy ranks instead.
pub struct Ranker {
    strategy: Arc<dyn ScoringStrategy>,
    keyword: KeywordStrategy,
    config: RetrievalConfig,
}

impl Ranker {
    pub fn new(strategy: Arc<dyn ScoringStrategy>, config: RetrievalConfig) -> Self {
        Self {
            strategy,
            keyword: KeywordStrategy::new(),
            config,
        }
    }

    /// Builds the ranker named by `config.strategy`.
    pub fn from_config(config: &RetrievalConfig, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        let strategy: Arc<dyn ScoringStrategy> = match config.strategy {
            StrategyKind::Embedding => Arc::new(EmbeddingStrategy::new(embedder)),
            StrategyKind::Keyword => Arc::new(KeywordStrategy::new()),
        };
        Self::new(strategy, config.clone())
    }

    pub fn configured_strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub async fn rank(&self, query: &str, view: &KnowledgeView) -> Ranking {
        let kind = self.strategy.kind();
        if kind == StrategyKind::Embedding && !view.is_empty() && view.embedded().next().is_none()
        {
            tracing::info!(
                bot_id = view.bot_id(),
                "no embedded entries, ranking with keyword strategy"
            );
            let budget = RetrievalBudget::for_strategy(&self.config, StrategyKind::Keyword);
            return Ranking {
                strategy: StrategyKind::Keyword,
                result: self.keyword.rank(query, view, &budget).await,
            };
        }

        let budget = RetrievalBudget::for_strategy(&self.config, kind);
        Ranking {
            strategy: kind,
            result: self.strategy.rank(query, view, &budget).await,
        }
    }
}
