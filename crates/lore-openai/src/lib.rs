// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible service adapters for the Lore knowledge bot.
//!
//! [`OpenAiEmbedder`] implements [`EmbeddingAdapter`](lore_core::traits::EmbeddingAdapter)
//! over `/embeddings`; [`OpenAiGenerator`] implements
//! [`GenerationAdapter`](lore_core::traits::GenerationAdapter) over
//! `/chat/completions`. Both share one retrying HTTP client.
//!
//! API key resolution order: `openai.api_key` in config, then the
//! `OPENAI_API_KEY` environment variable.

pub mod client;
pub mod embedder;
pub mod generator;
pub mod sanitize;
pub mod types;

use lore_core::types::HealthStatus;

pub use client::{ApiError, OpenAiClient};
pub use embedder::OpenAiEmbedder;
pub use generator::OpenAiGenerator;
pub use sanitize::sanitize_input;

/// Resolves the API key from config, falling back to `OPENAI_API_KEY`.
/// Empty strings count as unset.
pub(crate) fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Some(key.clone());
    }

    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
}

pub(crate) fn health_from_ping(result: Result<(), ApiError>) -> HealthStatus {
    match result {
        Ok(()) => HealthStatus::Healthy,
        Err(e) if e.is_auth() => HealthStatus::Unhealthy(format!("credentials rejected: {e}")),
        Err(ApiError::Transport(e)) => HealthStatus::Unhealthy(format!("unreachable: {e}")),
        Err(e) => HealthStatus::Degraded(e.to_string()),
    }
}
