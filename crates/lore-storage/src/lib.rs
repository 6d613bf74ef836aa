// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Lore knowledge bot.
//!
//! One [`SqliteStore`] implements all three storage traits the pipeline
//! depends on: [`KnowledgeStore`](lore_core::KnowledgeStore),
//! [`MemoryStore`](lore_core::MemoryStore), and
//! [`UnansweredLog`](lore_core::UnansweredLog).

pub mod adapter;
pub mod database;
pub mod queries;
pub mod schema;

pub use adapter::SqliteStore;
pub use database::{Database, blob_to_vec, vec_to_blob};
