// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Lore configuration system.

use lore_config::diagnostic::ConfigError;
use lore_config::model::{LoreConfig, StrategyKind};
use lore_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_lore_config() {
    let toml = r#"
[agent]
name = "campus-bot"
log_level = "debug"
persona = "You are the canteen assistant."

[retrieval]
strategy = "keyword"
max_results = 4
keyword_max_results = 2
primary_threshold = 0.55
fallback_threshold = 0.45
image_boost = 0.2

[confidence]
embedding_min = 0.5
keyword_min = 0.4

[prompt]
history_turns = 4
max_memories = 3
temperature = 0.3
max_tokens = 256

[memory]
enabled = false
history_turns = 2

[openai]
api_key = "sk-test"
base_url = "http://localhost:8080/v1"
embedding_dimensions = 8

[storage]
database_path = "/tmp/lore.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "campus-bot");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(
        config.agent.persona.as_deref(),
        Some("You are the canteen assistant.")
    );
    assert_eq!(config.retrieval.strategy, StrategyKind::Keyword);
    assert_eq!(config.retrieval.max_results, 4);
    assert_eq!(config.retrieval.keyword_max_results, 2);
    assert_eq!(config.retrieval.primary_threshold, 0.55);
    assert_eq!(config.retrieval.fallback_threshold, 0.45);
    assert_eq!(config.confidence.embedding_min, 0.5);
    assert_eq!(config.confidence.keyword_min, 0.4);
    assert_eq!(config.prompt.history_turns, 4);
    assert_eq!(config.prompt.max_memories, 3);
    assert_eq!(config.prompt.max_tokens, 256);
    assert!(!config.memory.enabled);
    assert_eq!(config.memory.history_turns, 2);
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.embedding_dimensions, 8);
    assert_eq!(config.storage.database_path, "/tmp/lore.db");
    assert!(!config.storage.wal_mode);
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.retrieval.strategy, StrategyKind::Embedding);
    assert_eq!(config.retrieval.max_results, 5);
    assert_eq!(config.retrieval.keyword_max_results, 3);
    assert_eq!(config.retrieval.primary_threshold, 0.5);
    assert_eq!(config.retrieval.fallback_threshold, 0.4);
    assert_eq!(config.confidence.embedding_min, 0.6);
    assert_eq!(config.confidence.keyword_min, 0.5);
    assert_eq!(config.prompt.history_turns, 6);
    assert_eq!(config.memory.history_turns, 4);
    assert!(config.memory.enabled);
    assert_eq!(config.openai.embedding_model, "text-embedding-3-small");
    assert_eq!(config.openai.chat_model, "gpt-4o-mini");
    assert_eq!(config.openai.max_retries, 1);
}

#[test]
fn threshold_for_picks_strategy_gate() {
    let config = LoreConfig::default();
    assert_eq!(config.confidence.threshold_for(StrategyKind::Embedding), 0.6);
    assert_eq!(config.confidence.threshold_for(StrategyKind::Keyword), 0.5);
}

#[test]
fn env_style_override_wins_over_file() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: LoreConfig = Figment::new()
        .merge(Serialized::defaults(LoreConfig::default()))
        .merge(Toml::string("[confidence]\nembedding_min = 0.7\n"))
        .merge(("confidence.embedding_min", 0.55))
        .extract()
        .expect("should merge override");

    assert_eq!(config.confidence.embedding_min, 0.55);
}

#[test]
fn unknown_field_in_retrieval_produces_error() {
    let toml = "[retrieval]\nmax_reslts = 4\n";
    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_reslts"),
        "error should mention the bad key, got: {err_str}"
    );
}

#[test]
fn unknown_top_level_section_rejected() {
    let toml = "[telegram]\nbot_token = \"x\"\n";
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn diagnostic_suggests_close_key() {
    let errors = load_and_validate_str("[retrieval]\nmax_reslts = 4\n")
        .expect_err("typo must be rejected");
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => key == "max_reslts" && suggestion.as_deref() == Some("max_results"),
        _ => false,
    });
    assert!(found, "expected a suggestion for max_results, got {errors:?}");
}

#[test]
fn diagnostic_lists_strategy_variants() {
    let errors = load_and_validate_str("[retrieval]\nstrategy = \"embeding\"\n")
        .expect_err("bad strategy must be rejected");
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(
        rendered.iter().any(|m| m.contains("embeding")),
        "got {rendered:?}"
    );
}

#[test]
fn invalid_type_is_reported() {
    let errors = load_and_validate_str("[retrieval]\nmax_results = \"five\"\n")
        .expect_err("string for usize must fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got {errors:?}"
    );
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let errors = load_and_validate_str("[confidence]\nembedding_min = 1.4\n")
        .expect_err("out of range must fail");
    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    let diagnostic: &dyn Diagnostic = &errors[0];
    handler
        .render_report(&mut buf, diagnostic)
        .expect("render should succeed");
    assert!(buf.contains("confidence.embedding_min"), "rendered: {buf}");
}

#[test]
fn load_and_validate_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.agent.name, "lore");
}

#[test]
fn validation_rejects_inverted_tiers() {
    let toml = "[retrieval]\nprimary_threshold = 0.4\nfallback_threshold = 0.5\n";
    let errors = load_and_validate_str(toml).expect_err("inverted tiers must fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("fallback_threshold"))
    ));
}
