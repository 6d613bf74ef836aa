// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns an assembled prompt into the user-facing reply.
//!
//! The chat never sees a raw error: any generation failure becomes one of
//! two fixed apologies.

use std::sync::Arc;

use lore_context::AssembledPrompt;
use lore_core::LoreError;
use lore_core::traits::GenerationAdapter;
use tracing::warn;

/// Reply used when generation fails for a bot that has not been taught anything.
pub const NO_TRAINING_APOLOGY: &str = "Sorry, I haven't been taught anything yet, so I can't answer questions right now. Please check back later.";

/// Reply used when generation fails partway through answering.
pub const FAILURE_APOLOGY: &str =
    "Sorry, something went wrong while I was putting together an answer. Please try again in a moment.";

/// Why a fallback reply was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoTrainingData,
    GenerationFailed,
}

impl FallbackReason {
    pub fn apology(self) -> &'static str {
        match self {
            FallbackReason::NoTrainingData => NO_TRAINING_APOLOGY,
            FallbackReason::GenerationFailed => FAILURE_APOLOGY,
        }
    }
}

/// The reply text plus whether it came from the fallback path.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub fallback: Option<FallbackReason>,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Wraps the generation adapter with the answer budget.
pub struct ResponseGenerator {
    generator: Arc<dyn GenerationAdapter>,
    temperature: f32,
    max_tokens: u32,
}

impl ResponseGenerator {
    pub fn new(generator: Arc<dyn GenerationAdapter>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            generator,
            temperature,
            max_tokens,
        }
    }

    /// Generates the reply for `prompt`.
    ///
    /// `has_training_data` picks which apology a failure degrades to.
    pub async fn generate(&self, prompt: AssembledPrompt, has_training_data: bool) -> Reply {
        let request = prompt.into_request(self.temperature, self.max_tokens);
        match self.generator.complete(request).await {
            Ok(response) => Reply {
                text: response.content,
                fallback: None,
            },
            Err(e) => {
                let reason = if has_training_data {
                    FallbackReason::GenerationFailed
                } else {
                    FallbackReason::NoTrainingData
                };
                match &e {
                    LoreError::Timeout { duration } => {
                        warn!(?duration, "generation timed out, replying with apology")
                    }
                    other => warn!(error = %other, ?reason, "generation failed, replying with apology"),
                }
                Reply {
                    text: reason.apology().to_string(),
                    fallback: Some(reason),
                }
            }
        }
    }
}
