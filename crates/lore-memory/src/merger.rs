// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciles extracted candidates with a user's stored memories.

use chrono::{DateTime, Utc};
use lore_core::types::UserMemory;
use uuid::Uuid;

use crate::extractor::ExtractedMemory;

/// Memories to persist after a merge. The two lists never share a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub inserted: Vec<UserMemory>,
    pub updated: Vec<UserMemory>,
}

impl MergeOutcome {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty()
    }
}

/// Merges `candidates` into `existing` for one `(user_id, bot_id)` pair.
///
/// A candidate with a known key replaces the stored value, confidence,
/// source message, and update time only when its confidence is strictly
/// higher; otherwise it is discarded. Unknown keys become new memories.
/// Candidates are applied in order, so a later candidate for the same key
/// is compared against the result of the earlier one.
pub fn merge_memories(
    existing: &[UserMemory],
    candidates: &[ExtractedMemory],
    user_id: &str,
    bot_id: &str,
    now: DateTime<Utc>,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for candidate in candidates {
        if let Some(pending) = outcome.inserted.iter_mut().find(|m| m.key == candidate.key) {
            if candidate.confidence > pending.confidence {
                apply(pending, candidate, now);
            }
            continue;
        }

        if let Some(pending) = outcome.updated.iter_mut().find(|m| m.key == candidate.key) {
            if candidate.confidence > pending.confidence {
                apply(pending, candidate, now);
            }
            continue;
        }

        match existing.iter().find(|m| m.key == candidate.key) {
            Some(stored) if candidate.confidence > stored.confidence => {
                let mut next = stored.clone();
                apply(&mut next, candidate, now);
                outcome.updated.push(next);
            }
            Some(stored) => {
                tracing::debug!(
                    key = %candidate.key,
                    stored = stored.confidence,
                    candidate = candidate.confidence,
                    "discarding memory candidate that is not more confident"
                );
            }
            None => outcome.inserted.push(UserMemory {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                bot_id: bot_id.to_string(),
                key: candidate.key.clone(),
                value: candidate.value.clone(),
                memory_type: candidate.memory_type,
                confidence: candidate.confidence,
                importance: candidate.importance,
                is_verified: false,
                extracted_from: Some(candidate.extracted_from.clone()),
                first_mentioned: now,
                last_updated: now,
            }),
        }
    }

    outcome
}

fn apply(memory: &mut UserMemory, candidate: &ExtractedMemory, now: DateTime<Utc>) {
    memory.value = candidate.value.clone();
    memory.confidence = candidate.confidence;
    memory.extracted_from = Some(candidate.extracted_from.clone());
    memory.last_updated = now;
}
