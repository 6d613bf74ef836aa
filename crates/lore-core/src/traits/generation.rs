// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-generation adapter trait.

use async_trait::async_trait;

use crate::error::LoreError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerationRequest, GenerationResponse};

/// Adapter for a chat-completion style language model.
///
/// Used both for final answers and for memory extraction; the caller
/// chooses temperature and token budget per request.
#[async_trait]
pub trait GenerationAdapter: PluginAdapter {
    /// Sends a system prompt and user message, returning the model's reply.
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, LoreError>;
}
