// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lore knowledge bot.

use thiserror::Error;

/// Failures from the embedding service boundary.
///
/// Callers treat any of these as "no retrieval possible for this query".
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The service is missing credentials or a model identifier.
    #[error("embedding service is not configured: {0}")]
    Unconfigured(String),

    /// The service could not be reached or returned an error status.
    #[error("embedding service unavailable: {message}")]
    ServiceUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The sanitized input was empty, so there is nothing to embed.
    #[error("embedding input is empty after sanitization")]
    EmptyInput,

    /// The service answered but the payload did not contain a usable vector.
    #[error("embedding service returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// The primary error type used across all Lore crates.
#[derive(Debug, Error)]
pub enum LoreError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Embedding service failures.
    #[error(transparent)]
    Embedding(#[from] EmbedError),

    /// Text-generation service failures.
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The generation service answered but its structured output could not be parsed.
    #[error("failed to parse extraction output: {0}")]
    ExtractionParse(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Caller-supplied content was rejected (empty question, blank URL).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller cancelled the chat turn.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LoreError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LoreError::Storage {
            source: Box::new(err),
        }
    }
}
