// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Additive keyword and synonym ranking.
//!
//! Needs no external service, so it works for bots whose entries were taught
//! without embeddings.

use async_trait::async_trait;
use lore_config::model::StrategyKind;
use lore_core::types::{KnowledgeEntry, RetrievalResult, ScoredEntry};

use crate::gate::keyword_confidence;
use crate::strategy::{RetrievalBudget, ScoringStrategy};
use crate::synonyms::groups_for;
use crate::view::KnowledgeView;

/// Confidence reported when nothing matches.
pub const KEYWORD_CONFIDENCE_FLOOR: f64 = 0.1;

const KEYWORD_HIT: f64 = 5.0;
const TEXT_HIT: f64 = 2.0;
const CATEGORY_HIT: f64 = 3.0;
const SUMMARY_HIT: f64 = 1.5;

const SYNONYM_KEYWORD_HIT: f64 = 4.0;
const SYNONYM_TEXT_HIT: f64 = 2.0;
const SYNONYM_CATEGORY_HIT: f64 = 2.0;
const SYNONYM_SUMMARY_HIT: f64 = 1.0;

/// Splits a query into distinct lowercased words longer than two characters.
pub fn query_words(query: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
    {
        if !words.iter().any(|w| w == word) {
            words.push(word.to_string());
        }
    }
    words
}

/// How one entry matched a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatch {
    pub score: f64,
    /// Query words that matched one of the entry's keywords directly.
    pub keyword_hits: usize,
    /// Query words found literally in the entry's text.
    pub text_hits: usize,
}

/// Lowercased fields of an entry, prepared once per ranking pass.
struct Haystack {
    keywords: Vec<String>,
    text: String,
    category: Option<String>,
    summary: Option<String>,
}

impl Haystack {
    fn of(entry: &KnowledgeEntry) -> Self {
        Self {
            keywords: entry.keywords.iter().map(|k| k.to_lowercase()).collect(),
            text: entry.searchable_text(),
            category: entry.category.as_ref().map(|c| c.to_lowercase()),
            summary: entry.summary.as_ref().map(|s| s.to_lowercase()),
        }
    }

    fn keyword_matches(&self, term: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && (k.contains(term) || term.contains(k.as_str())))
    }

    fn category_contains(&self, term: &str) -> bool {
        self.category.as_deref().is_some_and(|c| c.contains(term))
    }

    fn summary_contains(&self, term: &str) -> bool {
        self.summary.as_deref().is_some_and(|s| s.contains(term))
    }
}

/// Scores one entry against the tokenized query.
pub fn score_entry(entry: &KnowledgeEntry, words: &[String], query: &str) -> KeywordMatch {
    let hay = Haystack::of(entry);
    let lowered_query = query.to_lowercase();
    let mut m = KeywordMatch::default();

    for word in words {
        if hay.keyword_matches(word) {
            m.score += KEYWORD_HIT;
            m.keyword_hits += 1;
        }
        if hay.text.contains(word.as_str()) {
            m.score += TEXT_HIT;
            m.text_hits += 1;
        }
        if hay.category_contains(word) {
            m.score += CATEGORY_HIT;
        }
        if hay.summary_contains(word) {
            m.score += SUMMARY_HIT;
        }

        for group in groups_for(word, &lowered_query) {
            if group.terms.iter().any(|t| hay.keyword_matches(t)) {
                m.score += SYNONYM_KEYWORD_HIT;
            }
            if group.terms.iter().any(|t| hay.text.contains(t)) {
                m.score += SYNONYM_TEXT_HIT;
            }
            if group.terms.iter().any(|t| hay.category_contains(t)) {
                m.score += SYNONYM_CATEGORY_HIT;
            }
            if group.terms.iter().any(|t| hay.summary_contains(t)) {
                m.score += SYNONYM_SUMMARY_HIT;
            }
        }
    }

    m
}

/// Ranks entries by additive keyword, text, and synonym matches.
///
/// Entry scores are raw sums; the result confidence is the normalized
/// coverage of the top entry (see [`keyword_confidence`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordStrategy;

impl KeywordStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous ranking; the strategy performs no I/O.
    pub fn rank_sync(
        &self,
        query: &str,
        view: &KnowledgeView,
        budget: &RetrievalBudget,
    ) -> RetrievalResult {
        let words = query_words(query);
        if words.is_empty() {
            return RetrievalResult::empty(KEYWORD_CONFIDENCE_FLOOR);
        }

        let mut scored: Vec<(ScoredEntry, KeywordMatch)> = view
            .entries()
            .iter()
            .filter_map(|entry| {
                let m = score_entry(entry, &words, query);
                (m.score > 0.0).then(|| {
                    (
                        ScoredEntry {
                            entry: entry.clone(),
                            score: m.score,
                        },
                        m,
                    )
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.score
                .partial_cmp(&a.0.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(budget.max_results);

        let confidence = scored
            .first()
            .map(|(_, m)| keyword_confidence(words.len(), m))
            .unwrap_or(KEYWORD_CONFIDENCE_FLOOR);

        tracing::debug!(
            bot_id = view.bot_id(),
            words = words.len(),
            selected = scored.len(),
            confidence,
            "keyword ranking complete"
        );

        RetrievalResult {
            entries: scored.into_iter().map(|(s, _)| s).collect(),
            confidence,
        }
    }
}

#[async_trait]
impl ScoringStrategy for KeywordStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Keyword
    }

    async fn rank(
        &self,
        query: &str,
        view: &KnowledgeView,
        budget: &RetrievalBudget,
    ) -> RetrievalResult {
        self.rank_sync(query, view, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::qa;
    use lore_config::model::RetrievalConfig;

    fn budget() -> RetrievalBudget {
        RetrievalBudget::for_strategy(&RetrievalConfig::default(), StrategyKind::Keyword)
    }

    fn with_keywords(mut entry: KnowledgeEntry, keywords: &[&str]) -> KnowledgeEntry {
        entry.keywords = keywords.iter().map(|k| k.to_string()).collect();
        entry
    }

    #[test]
    fn tokenizer_drops_short_words_and_duplicates() {
        assert_eq!(
            query_words("Is the CAFE open? the cafe!"),
            vec!["the".to_string(), "cafe".to_string(), "open".to_string()]
        );
        assert!(query_words("hi, ok").is_empty());
    }

    #[test]
    fn keyword_and_text_hits_add_up() {
        let entry = with_keywords(
            qa("a", "Where is the library?", "Block C, second floor", vec![]),
            &["library"],
        );
        let words = query_words("library");
        let m = score_entry(&entry, &words, "library");
        assert_eq!(m.keyword_hits, 1);
        assert_eq!(m.text_hits, 1);
        assert_eq!(m.score, KEYWORD_HIT + TEXT_HIT);
    }

    #[test]
    fn keyword_substring_matches_either_direction() {
        let entry = with_keywords(qa("a", "q", "a", vec![]), &["lib"]);
        let m = score_entry(&entry, &query_words("library"), "library");
        assert_eq!(m.keyword_hits, 1);

        let entry = with_keywords(qa("a", "q", "a", vec![]), &["libraries"]);
        let m = score_entry(&entry, &query_words("library"), "library");
        assert_eq!(m.keyword_hits, 0);

        let m = score_entry(&entry, &query_words("librar"), "librar");
        assert_eq!(m.keyword_hits, 1);
    }

    #[test]
    fn synonyms_reach_pricing_entries() {
        let entry = with_keywords(
            qa("fees", "What are the hostel fees?", "Rs 40,000 per term", vec![]),
            &["pricing"],
        );
        let query = "how much for hostel";
        let m = score_entry(&entry, &query_words(query), query);
        // "hostel" hits text; "much" triggers pricing: keyword "pricing", text "fee".
        assert_eq!(m.score, TEXT_HIT + SYNONYM_KEYWORD_HIT + SYNONYM_TEXT_HIT);
    }

    #[test]
    fn category_and_summary_bonuses() {
        let mut entry = qa("a", "q", "a", vec![]);
        entry.category = Some("Canteen".into());
        entry.summary = Some("canteen timings".into());
        let m = score_entry(&entry, &query_words("canteen"), "canteen");
        assert_eq!(m.score, CATEGORY_HIT + SUMMARY_HIT);
    }

    #[test]
    fn zero_scores_dropped_and_capped_to_three() {
        let entries = vec![
            with_keywords(qa("a", "library hours", "9-5", vec![]), &["library"]),
            with_keywords(qa("b", "library fines", "Rs 5", vec![]), &["library"]),
            with_keywords(qa("c", "library card", "at desk", vec![]), &["library"]),
            with_keywords(qa("d", "library wifi", "yes", vec![]), &["library"]),
            qa("e", "gym", "open", vec![]),
        ];
        let view = KnowledgeView::new("bot-1", entries);
        let result = KeywordStrategy::new().rank_sync("library", &view, &budget());
        assert_eq!(result.entries.len(), 3);
        assert!(!result.entry_ids().contains(&"e".to_string()));
    }

    #[test]
    fn ordering_is_descending() {
        let entries = vec![
            qa("weak", "the library", "x", vec![]),
            with_keywords(qa("strong", "the library", "x", vec![]), &["library"]),
        ];
        let view = KnowledgeView::new("bot-1", entries);
        let result = KeywordStrategy::new().rank_sync("library", &view, &budget());
        assert_eq!(result.entry_ids(), vec!["strong", "weak"]);
        assert!(result.entries[0].score > result.entries[1].score);
    }

    #[test]
    fn no_match_returns_floor() {
        let view = KnowledgeView::new("bot-1", vec![qa("a", "gym", "open", vec![])]);
        let result = KeywordStrategy::new().rank_sync("do you sell furniture", &view, &budget());
        assert!(result.is_empty());
        assert_eq!(result.confidence, KEYWORD_CONFIDENCE_FLOOR);
    }

    #[test]
    fn confidence_is_normalized_top_coverage() {
        let entry = with_keywords(qa("a", "library timings", "9-5", vec![]), &["library"]);
        let view = KnowledgeView::new("bot-1", vec![entry]);
        // "library": keyword +2, text +1 => 3; "books": nothing. 3 / (2 * 2) = 0.75.
        let result = KeywordStrategy::new().rank_sync("library books", &view, &budget());
        assert!((result.confidence - 0.75).abs() < 1e-9);
    }
}
