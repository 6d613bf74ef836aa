// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lore.toml` > `~/.config/lore/lore.toml` > `/etc/lore/lore.toml`
//! with environment variable overrides via `LORE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LoreConfig;

/// Sections whose keys may be overridden from `LORE_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "agent",
    "retrieval",
    "confidence",
    "prompt",
    "memory",
    "openai",
    "storage",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lore/lore.toml` (system-wide)
/// 3. `~/.config/lore/lore.toml` (user XDG config)
/// 4. `./lore.toml` (local directory)
/// 5. `LORE_*` environment variables
pub fn load_config() -> Result<LoreConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LoreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LoreConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LoreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LoreConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LoreConfig::default()))
        .merge(Toml::file("/etc/lore/lore.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("lore/lore.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("lore.toml"))
        .merge(env_provider())
}

/// Map a prefix-stripped, lowercased env key to its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `openai_embedding_model` maps to `openai.embedding_model` rather than
/// `openai.embedding.model`.
pub fn env_key_to_path(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
fn env_provider() -> Env {
    Env::prefixed("LORE_").map(|key| env_key_to_path(key.as_str()).into())
}
