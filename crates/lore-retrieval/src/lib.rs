// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge retrieval for the Lore knowledge bot.
//!
//! Ranks a bot's taught entries against a user query with one of two
//! interchangeable [`ScoringStrategy`] implementations:
//!
//! - [`EmbeddingStrategy`]: cosine similarity with image-intent boosting and
//!   a primary/fallback threshold tier.
//! - [`KeywordStrategy`]: additive keyword, text, and synonym scoring.
//!
//! The [`ConfidenceGate`] then decides whether the ranking is good enough to
//! claim an answer, using a threshold specific to the strategy.

pub mod embedding;
pub mod gate;
pub mod keyword;
pub mod ranker;
pub mod strategy;
pub mod synonyms;
pub mod vector;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use embedding::{EmbeddingStrategy, has_image_intent};
pub use gate::{ConfidenceGate, GateDecision, keyword_confidence};
pub use keyword::KeywordStrategy;
pub use ranker::{Ranker, Ranking};
pub use strategy::{RetrievalBudget, ScoringStrategy};
pub use vector::cosine_similarity;
pub use view::KnowledgeView;
