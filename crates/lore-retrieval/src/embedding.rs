// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding-similarity ranking with image-intent boosting and tiered thresholds.

use std::sync::Arc;

use async_trait::async_trait;
use lore_config::model::StrategyKind;
use lore_core::traits::EmbeddingAdapter;
use lore_core::types::{RetrievalResult, ScoredEntry};

use crate::strategy::{RetrievalBudget, ScoringStrategy};
use crate::vector::cosine_similarity;
use crate::view::KnowledgeView;

/// Query terms that signal the user wants to see something.
pub const IMAGE_INTENT_TERMS: &[&str] = &[
    "menu", "image", "photo", "picture", "show", "see", "look", "display",
];

/// Confidence reported when no entry survives any tier.
pub const EMBEDDING_CONFIDENCE_FLOOR: f64 = 0.0;

/// Returns true when the lowercased query contains any image-intent term
/// anywhere, so plurals like "photos" count and so does "outlook".
pub fn has_image_intent(query: &str) -> bool {
    let query = query.to_lowercase();
    IMAGE_INTENT_TERMS.iter().any(|t| query.contains(t))
}

/// Ranks entries by cosine similarity between the query embedding and each
/// entry's stored embedding.
pub struct EmbeddingStrategy {
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl EmbeddingStrategy {
    pub fn new(embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl ScoringStrategy for EmbeddingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Embedding
    }

    async fn rank(
        &self,
        query: &str,
        view: &KnowledgeView,
        budget: &RetrievalBudget,
    ) -> RetrievalResult {
        if view.embedded().next().is_none() {
            tracing::debug!(bot_id = view.bot_id(), "no embedded entries to rank");
            return RetrievalResult::empty(EMBEDDING_CONFIDENCE_FLOOR);
        }

        let query_vec = match self.embedder.embed(query).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "query embedding failed, treating as no retrieval");
                return RetrievalResult::empty(EMBEDDING_CONFIDENCE_FLOOR);
            }
        };

        rank_by_similarity(&query_vec, has_image_intent(query), view, budget)
    }
}

/// Scores every eligible entry against `query_vec` and applies the tiered
/// threshold selection.
///
/// Entries whose embedding length differs from the query's are skipped rather
/// than scored as zero.
pub fn rank_by_similarity(
    query_vec: &[f32],
    image_intent: bool,
    view: &KnowledgeView,
    budget: &RetrievalBudget,
) -> RetrievalResult {
    let mut skipped = 0usize;
    let mut scored: Vec<ScoredEntry> = view
        .embedded()
        .filter(|entry| {
            let fits = entry.embedding.len() == query_vec.len();
            if !fits {
                skipped += 1;
            }
            fits
        })
        .map(|entry| {
            let mut score = cosine_similarity(query_vec, &entry.embedding);
            if image_intent && entry.kind.is_image() {
                score += budget.image_boost;
            }
            ScoredEntry {
                entry: entry.clone(),
                score,
            }
        })
        .collect();

    if skipped > 0 {
        tracing::warn!(
            bot_id = view.bot_id(),
            skipped,
            expected = query_vec.len(),
            "skipped entries with mismatched embedding dimensions"
        );
    }

    sort_descending(&mut scored);

    let mut entries = select_tier(&scored, budget.primary_threshold, image_intent, budget);
    if entries.is_empty() {
        entries = select_tier(&scored, budget.fallback_threshold, image_intent, budget);
        if !entries.is_empty() {
            tracing::debug!(
                threshold = budget.fallback_threshold,
                count = entries.len(),
                "primary tier empty, using fallback tier"
            );
        }
    }

    let confidence = entries
        .first()
        .map(|e| e.score)
        .unwrap_or(EMBEDDING_CONFIDENCE_FLOOR);

    tracing::debug!(
        bot_id = view.bot_id(),
        candidates = scored.len(),
        selected = entries.len(),
        confidence,
        image_intent,
        "embedding ranking complete"
    );

    RetrievalResult {
        entries,
        confidence,
    }
}

/// Filters `scored` (already sorted) to `threshold`, caps it, and for
/// image-intent queries guarantees the best qualifying image is present.
fn select_tier(
    scored: &[ScoredEntry],
    threshold: f64,
    image_intent: bool,
    budget: &RetrievalBudget,
) -> Vec<ScoredEntry> {
    let qualifying: Vec<&ScoredEntry> = scored.iter().filter(|s| s.score >= threshold).collect();
    let mut selected: Vec<ScoredEntry> = qualifying
        .iter()
        .take(budget.max_results)
        .map(|s| (*s).clone())
        .collect();

    // An empty tier stays empty so the fallback tier still gets its turn.
    if !image_intent || budget.max_results == 0 || selected.is_empty() {
        return selected;
    }

    // The best image overall, whether or not it cleared the threshold.
    let best_image = scored.iter().find(|s| s.entry.kind.is_image());
    if let Some(image) = best_image
        && !selected.iter().any(|s| s.entry.id == image.entry.id)
    {
        if selected.len() >= budget.max_results {
            selected.pop();
        }
        selected.push((*image).clone());
        sort_descending(&mut selected);
    }

    selected
}

fn sort_descending(entries: &mut [ScoredEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
