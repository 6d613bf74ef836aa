// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent synonym table for keyword ranking.
//!
//! Each group maps the ways users tend to ask about a topic onto the terms
//! operators tend to use when teaching it.

/// One intent group: query triggers and the terms they expand to.
#[derive(Debug)]
pub struct SynonymGroup {
    pub intent: &'static str,
    /// Query words (or phrases) that activate this group.
    pub triggers: &'static [&'static str],
    /// Terms searched for in entry keywords, text, category, and summary.
    pub terms: &'static [&'static str],
}

pub static SYNONYM_GROUPS: &[SynonymGroup] = &[
    SynonymGroup {
        intent: "pricing",
        triggers: &["cost", "costs", "price", "prices", "pricing", "how much", "fee", "fees", "charge"],
        terms: &["pricing", "price", "cost", "rate", "fee", "charge"],
    },
    SynonymGroup {
        intent: "hours",
        triggers: &["hours", "open", "opening", "close", "closing", "time", "timing", "schedule", "when"],
        terms: &["hours", "open", "close", "time", "schedule", "timing"],
    },
    SynonymGroup {
        intent: "location",
        triggers: &["location", "address", "where", "located", "directions", "find"],
        terms: &["location", "address", "where", "directions", "map", "place"],
    },
    SynonymGroup {
        intent: "contact",
        triggers: &["contact", "phone", "call", "email", "reach", "number"],
        terms: &["contact", "phone", "email", "number", "call"],
    },
    SynonymGroup {
        intent: "services",
        triggers: &["services", "service", "offer", "offers", "provide", "available"],
        terms: &["services", "service", "offer", "provide", "facilities"],
    },
    SynonymGroup {
        intent: "help",
        triggers: &["help", "support", "assist", "assistance", "problem", "issue"],
        terms: &["help", "support", "assistance", "guide"],
    },
];

/// Groups activated by `word`, given the full lowercased `query`.
///
/// A multi-word trigger such as "how much" is attributed to its last word,
/// and only when the query contains the whole phrase.
pub fn groups_for(word: &str, query: &str) -> Vec<&'static SynonymGroup> {
    SYNONYM_GROUPS
        .iter()
        .filter(|group| {
            group.triggers.iter().any(|trigger| match trigger.rsplit_once(' ') {
                Some((_, last)) => last == word && query.contains(trigger),
                None => *trigger == word,
            })
        })
        .collect()
}
