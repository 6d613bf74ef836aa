// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait.

use async_trait::async_trait;

use crate::error::EmbedError;
use crate::traits::adapter::PluginAdapter;

/// Adapter turning text into a fixed-length vector.
///
/// Implementations sanitize their input before submission. Every vector
/// returned by one adapter has the same length, which must match the
/// stored knowledge embeddings for those entries to be eligible.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Dimensionality of the vectors this adapter produces.
    fn dimensions(&self) -> usize;

    /// Model identifier sent to the service.
    fn model(&self) -> &str;
}
