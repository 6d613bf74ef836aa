// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any installed recorder can collect these.
//! Without a recorder every call is a no-op.

use metrics::{describe_counter, describe_histogram};

/// Register all Lore metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!("lore_chat_turns_total", "Chat turns processed, by outcome");
    describe_counter!(
        "lore_unanswered_total",
        "Questions recorded as unanswered for operator follow-up"
    );
    describe_histogram!(
        "lore_retrieval_confidence",
        "Retrieval confidence per chat turn, by strategy"
    );
    describe_counter!(
        "lore_fallbacks_total",
        "Degraded paths taken instead of failing the chat turn"
    );
    describe_counter!("lore_memories_written_total", "User memories inserted or updated");
}

pub fn record_turn(answered: bool) {
    metrics::counter!("lore_chat_turns_total", "answered" => answered.to_string()).increment(1);
}

pub fn record_unanswered() {
    metrics::counter!("lore_unanswered_total").increment(1);
}

pub fn record_confidence(strategy: &str, confidence: f64) {
    metrics::histogram!("lore_retrieval_confidence", "strategy" => strategy.to_string())
        .record(confidence);
}

/// Record a degraded path. `kind` names the step that fell back.
pub fn record_fallback(kind: &'static str) {
    metrics::counter!("lore_fallbacks_total", "kind" => kind).increment(1);
}

pub fn record_memories_written(inserted: usize, updated: usize) {
    if inserted > 0 {
        metrics::counter!("lore_memories_written_total", "op" => "insert")
            .increment(inserted as u64);
    }
    if updated > 0 {
        metrics::counter!("lore_memories_written_total", "op" => "update")
            .increment(updated as u64);
    }
}
