// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external services the core consumes.
//!
//! Service adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod embedding;
pub mod generation;
pub mod storage;

pub use adapter::PluginAdapter;
pub use embedding::EmbeddingAdapter;
pub use generation::GenerationAdapter;
pub use storage::{KnowledgeStore, MemoryStore, UnansweredLog};
