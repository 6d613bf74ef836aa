// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat pipeline and training for the Lore knowledge bot.
//!
//! [`ChatPipeline::answer`] drives one chat turn end to end; [`Trainer`]
//! writes the knowledge it answers from. Both take their stores and
//! service adapters as explicit handles.

pub mod metrics;
pub mod pipeline;
pub mod responder;
pub mod trainer;

pub use pipeline::{ChatAnswer, ChatPipeline, ChatRequest, PipelineDeps};
pub use responder::{
    FAILURE_APOLOGY, FallbackReason, NO_TRAINING_APOLOGY, Reply, ResponseGenerator,
};
pub use trainer::{EntryLabels, Trainer};
