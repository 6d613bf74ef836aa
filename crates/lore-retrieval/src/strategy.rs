// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The strategy seam shared by every ranking algorithm.

use async_trait::async_trait;
use lore_config::model::{RetrievalConfig, StrategyKind};
use lore_core::types::RetrievalResult;

use crate::view::KnowledgeView;

/// Limits applied to a single ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalBudget {
    /// Maximum entries in the result.
    pub max_results: usize,
    /// Minimum score for the primary tier.
    pub primary_threshold: f64,
    /// Minimum score for the fallback tier, tried only when the primary
    /// tier is empty.
    pub fallback_threshold: f64,
    /// Score added to image entries when the query has image intent.
    pub image_boost: f64,
}

impl RetrievalBudget {
    /// Budget for `kind`, taking the result cap that strategy is tuned for.
    pub fn for_strategy(config: &RetrievalConfig, kind: StrategyKind) -> Self {
        let max_results = match kind {
            StrategyKind::Embedding => config.max_results,
            StrategyKind::Keyword => config.keyword_max_results,
        };
        Self {
            max_results,
            primary_threshold: config.primary_threshold,
            fallback_threshold: config.fallback_threshold,
            image_boost: config.image_boost,
        }
    }
}

impl Default for RetrievalBudget {
    fn default() -> Self {
        Self::for_strategy(&RetrievalConfig::default(), StrategyKind::Embedding)
    }
}

/// A ranking algorithm over a bot's knowledge.
///
/// Implementations never fail: a strategy that cannot score (for example
/// because the embedding service is down) returns an empty result with its
/// own "no information" confidence floor.
#[async_trait]
pub trait ScoringStrategy: Send + Sync {
    /// Which strategy this is. Callers use it to pick the matching
    /// confidence threshold, since scores are not comparable across kinds.
    fn kind(&self) -> StrategyKind;

    /// Scores and orders `view`'s entries against `query`.
    async fn rank(
        &self,
        query: &str,
        view: &KnowledgeView,
        budget: &RetrievalBudget,
    ) -> RetrievalResult;
}
