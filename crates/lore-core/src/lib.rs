// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lore knowledge bot.
//!
//! Provides the domain types (knowledge entries, conversation turns, user
//! memories), the error taxonomy, and the traits through which the
//! retrieval-and-confidence pipeline talks to embedding, generation, and
//! storage services.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{EmbedError, LoreError};
pub use types::{AdapterType, HealthStatus};

pub use traits::{
    EmbeddingAdapter, GenerationAdapter, KnowledgeStore, MemoryStore, PluginAdapter,
    UnansweredLog,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lore_error_variants_render() {
        let config = LoreError::Config("missing api key".into());
        assert_eq!(config.to_string(), "configuration error: missing api key");

        let storage = LoreError::storage(std::io::Error::other("disk"));
        assert!(storage.to_string().contains("disk"));

        let embed: LoreError = EmbedError::Unconfigured("no key".into()).into();
        assert!(matches!(embed, LoreError::Embedding(EmbedError::Unconfigured(_))));

        let _timeout = LoreError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert_eq!(LoreError::Cancelled.to_string(), "operation cancelled");
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Embedding, AdapterType::Generation, AdapterType::Storage] {
            let s = variant.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), variant);
        }
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _embedding(_: &dyn EmbeddingAdapter) {}
        fn _generation(_: &dyn GenerationAdapter) {}
        fn _knowledge(_: &dyn KnowledgeStore) {}
        fn _memory(_: &dyn MemoryStore) {}
        fn _unanswered(_: &dyn UnansweredLog) {}
    }
}
