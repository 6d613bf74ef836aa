// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence gate: decides whether a ranking is trustworthy enough to answer.

use lore_config::model::{ConfidenceConfig, StrategyKind};
use lore_core::types::RetrievalResult;

use crate::keyword::KeywordMatch;

const KEYWORD_CONFIDENCE_MIN: f64 = 0.1;
const KEYWORD_CONFIDENCE_MAX: f64 = 1.0;

/// Normalized keyword confidence for the top-ranked entry.
///
/// Counts 2 per query word matched through keywords and 1 per word matched
/// in the entry text, divided by `2 * query_word_count`, clamped to
/// [0.1, 1.0]. Never zero, so a weak match is distinguishable from no query.
pub fn keyword_confidence(query_word_count: usize, top: &KeywordMatch) -> f64 {
    if query_word_count == 0 {
        return KEYWORD_CONFIDENCE_MIN;
    }
    let raw = (2 * top.keyword_hits + top.text_hits) as f64 / (2 * query_word_count) as f64;
    raw.clamp(KEYWORD_CONFIDENCE_MIN, KEYWORD_CONFIDENCE_MAX)
}

/// Outcome of gating one retrieval result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateDecision {
    pub was_answered: bool,
    pub confidence: f64,
    /// Threshold the confidence was compared against.
    pub threshold: f64,
}

/// Compares a result's confidence against the threshold for the strategy
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f64,
}

impl ConfidenceGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Gate for results produced by `strategy`.
    pub fn for_strategy(config: &ConfidenceConfig, strategy: StrategyKind) -> Self {
        Self::new(config.threshold_for(strategy))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// An empty result is never answered, whatever its floor confidence.
    pub fn evaluate(&self, result: &RetrievalResult) -> GateDecision {
        let was_answered = !result.is_empty() && result.confidence >= self.threshold;
        GateDecision {
            was_answered,
            confidence: result.confidence,
            threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::qa;
    use lore_core::types::ScoredEntry;

    fn result(confidence: f64) -> RetrievalResult {
        RetrievalResult {
            entries: vec![ScoredEntry {
                entry: qa("a", "q", "a", vec![]),
                score: confidence,
            }],
            confidence,
        }
    }

    #[test]
    fn keyword_confidence_normalizes_and_clamps() {
        let m = |k, t| KeywordMatch {
            score: 0.0,
            keyword_hits: k,
            text_hits: t,
        };
        assert_eq!(keyword_confidence(2, &m(1, 0)), 0.5);
        assert_eq!(keyword_confidence(4, &m(0, 0)), 0.1);
        assert_eq!(keyword_confidence(1, &m(1, 1)), 1.0);
        assert_eq!(keyword_confidence(0, &m(3, 3)), 0.1);
        assert!((keyword_confidence(3, &m(1, 1)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn thresholds_are_per_strategy() {
        let config = ConfidenceConfig::default();
        let embedding = ConfidenceGate::for_strategy(&config, StrategyKind::Embedding);
        let keyword = ConfidenceGate::for_strategy(&config, StrategyKind::Keyword);

        assert!(!embedding.evaluate(&result(0.55)).was_answered);
        assert!(keyword.evaluate(&result(0.55)).was_answered);
    }

    #[test]
    fn threshold_is_inclusive() {
        let gate = ConfidenceGate::new(0.5);
        assert!(gate.evaluate(&result(0.5)).was_answered);
        assert!(!gate.evaluate(&result(0.4999)).was_answered);
    }

    #[test]
    fn empty_result_never_answers() {
        let gate = ConfidenceGate::new(0.05);
        let decision = gate.evaluate(&RetrievalResult::empty(0.1));
        assert!(!decision.was_answered);
        assert_eq!(decision.confidence, 0.1);
    }
}
