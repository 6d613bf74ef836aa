// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde cannot express: threshold ranges,
//! tier ordering, non-zero budgets. All failures are collected rather than
//! stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::LoreConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LoreConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let retrieval = &config.retrieval;
    check_unit_interval(&mut errors, "retrieval.primary_threshold", retrieval.primary_threshold);
    check_unit_interval(&mut errors, "retrieval.fallback_threshold", retrieval.fallback_threshold);
    check_unit_interval(&mut errors, "retrieval.image_boost", retrieval.image_boost);

    if retrieval.fallback_threshold >= retrieval.primary_threshold {
        errors.push(ConfigError::Validation {
            message: format!(
                "retrieval.fallback_threshold ({}) must be below retrieval.primary_threshold ({})",
                retrieval.fallback_threshold, retrieval.primary_threshold
            ),
        });
    }

    check_non_zero(&mut errors, "retrieval.max_results", retrieval.max_results);
    check_non_zero(
        &mut errors,
        "retrieval.keyword_max_results",
        retrieval.keyword_max_results,
    );

    check_unit_interval(&mut errors, "confidence.embedding_min", config.confidence.embedding_min);
    check_unit_interval(&mut errors, "confidence.keyword_min", config.confidence.keyword_min);

    check_temperature(&mut errors, "prompt.temperature", config.prompt.temperature);
    check_temperature(&mut errors, "memory.temperature", config.memory.temperature);
    check_non_zero(&mut errors, "prompt.max_tokens", config.prompt.max_tokens as usize);
    check_non_zero(&mut errors, "memory.max_tokens", config.memory.max_tokens as usize);

    let openai = &config.openai;
    if !openai.base_url.starts_with("http://") && !openai.base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.base_url `{}` must start with http:// or https://",
                openai.base_url
            ),
        });
    }
    if openai.embedding_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openai.embedding_model must not be empty".to_string(),
        });
    }
    if openai.chat_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openai.chat_model must not be empty".to_string(),
        });
    }
    check_non_zero(&mut errors, "openai.embedding_dimensions", openai.embedding_dimensions);
    check_non_zero(&mut errors, "openai.timeout_secs", openai.timeout_secs as usize);

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unit_interval(errors: &mut Vec<ConfigError>, key: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::OutOfRange {
            key: key.to_string(),
            message: format!("expected a value in [0.0, 1.0], got {value}"),
        });
    }
}

fn check_temperature(errors: &mut Vec<ConfigError>, key: &str, value: f32) {
    if !(0.0..=2.0).contains(&value) {
        errors.push(ConfigError::OutOfRange {
            key: key.to_string(),
            message: format!("expected a value in [0.0, 2.0], got {value}"),
        });
    }
}

fn check_non_zero(errors: &mut Vec<ConfigError>, key: &str, value: usize) {
    if value == 0 {
        errors.push(ConfigError::OutOfRange {
            key: key.to_string(),
            message: "must be at least 1".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_key(errors: &[ConfigError], needle: &str) -> bool {
        errors.iter().any(|e| match e {
            ConfigError::OutOfRange { key, .. } => key == needle,
            ConfigError::Validation { message } => message.contains(needle),
            _ => false,
        })
    }

    #[test]
    fn default_config_validates() {
        let config = LoreConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = LoreConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_key(&errors, "storage.database_path"));
    }

    #[test]
    fn fallback_must_stay_below_primary() {
        let mut config = LoreConfig::default();
        config.retrieval.fallback_threshold = 0.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_key(&errors, "retrieval.fallback_threshold"));
    }

    #[test]
    fn threshold_outside_unit_interval_fails() {
        let mut config = LoreConfig::default();
        config.confidence.embedding_min = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_key(&errors, "confidence.embedding_min"));
    }

    #[test]
    fn zero_max_results_fails() {
        let mut config = LoreConfig::default();
        config.retrieval.max_results = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_key(&errors, "retrieval.max_results"));
    }

    #[test]
    fn bad_log_level_fails() {
        let mut config = LoreConfig::default();
        config.agent.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_key(&errors, "agent.log_level"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = LoreConfig::default();
        config.storage.database_path = " ".to_string();
        config.prompt.temperature = 3.0;
        config.openai.base_url = "api.openai.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
