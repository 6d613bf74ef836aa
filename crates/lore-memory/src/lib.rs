// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user memory for the Lore knowledge bot.
//!
//! After each answered turn the [`MemoryExtractor`] asks the generation
//! service which facts the user revealed, and [`merge_memories`] reconciles
//! those candidates with what is already stored: higher confidence wins,
//! ties keep the stored value.

pub mod extractor;
pub mod merger;

pub use extractor::{
    EXTRACTION_PROMPT, ExtractedMemory, ExtractionInput, ExtractionResult, MemoryExtractor,
    parse_extraction_response,
};
pub use merger::{MergeOutcome, merge_memories};
