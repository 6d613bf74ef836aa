// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Lore integration tests.
//!
//! Provides mock service adapters and a test harness for fast,
//! deterministic tests without network access.
//!
//! # Components
//!
//! - [`MockEmbedder`] - text-to-vector lookup table
//! - [`MockGenerator`] - FIFO replies with failure injection and request capture
//! - [`TestHarness`] - in-memory SQLite plus a fully wired chat pipeline

pub mod harness;
pub mod mock_embedder;
pub mod mock_generator;

pub use harness::{
    TEST_BOT, TEST_SESSION, TEST_USER, TestHarness, TestHarnessBuilder, unit_at_similarity,
};
pub use mock_embedder::MockEmbedder;
pub use mock_generator::MockGenerator;
