// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lore knowledge bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Lore configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoreConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Knowledge retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Answer confidence gate settings.
    #[serde(default)]
    pub confidence: ConfidenceConfig,

    /// Prompt assembly and answer generation settings.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Per-user memory extraction settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// OpenAI-compatible embedding and generation service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional persona line prepended to every answer prompt.
    #[serde(default)]
    pub persona: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            persona: None,
        }
    }
}

fn default_agent_name() -> String {
    "lore".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which scoring strategy ranks knowledge entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Cosine similarity against precomputed embeddings.
    #[default]
    Embedding,
    /// Additive keyword and synonym heuristic.
    Keyword,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Embedding => write!(f, "embedding"),
            StrategyKind::Keyword => write!(f, "keyword"),
        }
    }
}

/// Knowledge retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Strategy used to rank entries.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Maximum entries returned by the embedding strategy.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Maximum entries returned by the keyword strategy.
    #[serde(default = "default_keyword_max_results")]
    pub keyword_max_results: usize,

    /// Minimum cosine similarity for the primary tier.
    #[serde(default = "default_primary_threshold")]
    pub primary_threshold: f64,

    /// Minimum cosine similarity for the fallback tier. Must stay below
    /// `primary_threshold`.
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: f64,

    /// Score added to image entries when the query shows image intent.
    #[serde(default = "default_image_boost")]
    pub image_boost: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            max_results: default_max_results(),
            keyword_max_results: default_keyword_max_results(),
            primary_threshold: default_primary_threshold(),
            fallback_threshold: default_fallback_threshold(),
            image_boost: default_image_boost(),
        }
    }
}

fn default_max_results() -> usize {
    5
}

fn default_keyword_max_results() -> usize {
    3
}

fn default_primary_threshold() -> f64 {
    0.5
}

fn default_fallback_threshold() -> f64 {
    0.4
}

fn default_image_boost() -> f64 {
    0.1
}

/// Confidence gate configuration.
///
/// The two thresholds gate numerically different scores (cosine similarity
/// vs. normalized keyword coverage) and are tuned independently.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceConfig {
    /// Minimum confidence to claim an answer on the embedding path.
    #[serde(default = "default_embedding_min")]
    pub embedding_min: f64,

    /// Minimum confidence to claim an answer on the keyword path.
    #[serde(default = "default_keyword_min")]
    pub keyword_min: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            embedding_min: default_embedding_min(),
            keyword_min: default_keyword_min(),
        }
    }
}

impl ConfidenceConfig {
    /// Threshold that applies to results produced by `strategy`.
    pub fn threshold_for(&self, strategy: StrategyKind) -> f64 {
        match strategy {
            StrategyKind::Embedding => self.embedding_min,
            StrategyKind::Keyword => self.keyword_min,
        }
    }
}

fn default_embedding_min() -> f64 {
    0.6
}

fn default_keyword_min() -> f64 {
    0.5
}

/// Prompt assembly and answer generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Conversation turns included in the answer prompt (6 = 3 exchanges).
    #[serde(default = "default_prompt_history_turns")]
    pub history_turns: usize,

    /// Maximum remembered facts rendered into the memory block.
    #[serde(default = "default_max_memories")]
    pub max_memories: usize,

    /// Sampling temperature for answers.
    #[serde(default = "default_answer_temperature")]
    pub temperature: f32,

    /// Token budget for answers.
    #[serde(default = "default_answer_max_tokens")]
    pub max_tokens: u32,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            history_turns: default_prompt_history_turns(),
            max_memories: default_max_memories(),
            temperature: default_answer_temperature(),
            max_tokens: default_answer_max_tokens(),
        }
    }
}

fn default_prompt_history_turns() -> usize {
    6
}

fn default_max_memories() -> usize {
    10
}

fn default_answer_temperature() -> f32 {
    0.7
}

fn default_answer_max_tokens() -> u32 {
    500
}

/// Memory extraction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Enable memory extraction after each answered turn.
    #[serde(default = "default_memory_enabled")]
    pub enabled: bool,

    /// Conversation turns shown to the extractor.
    #[serde(default = "default_memory_history_turns")]
    pub history_turns: usize,

    /// Sampling temperature for extraction (near zero for determinism).
    #[serde(default = "default_extraction_temperature")]
    pub temperature: f32,

    /// Token budget for the extraction reply.
    #[serde(default = "default_extraction_max_tokens")]
    pub max_tokens: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_memory_enabled(),
            history_turns: default_memory_history_turns(),
            temperature: default_extraction_temperature(),
            max_tokens: default_extraction_max_tokens(),
        }
    }
}

fn default_memory_enabled() -> bool {
    true
}

fn default_memory_history_turns() -> usize {
    4
}

fn default_extraction_temperature() -> f32 {
    0.1
}

fn default_extraction_max_tokens() -> u32 {
    800
}

/// OpenAI-compatible service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API (no trailing slash).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Dimensionality of the embedding model's vectors.
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// Chat model identifier used for answers and extraction.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient status codes (429, 500, 503).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: default_embedding_dimensions(),
            chat_model: default_chat_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> usize {
    1536
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("lore").join("lore.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("lore.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
