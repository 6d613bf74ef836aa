// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lore doctor` command implementation.
//!
//! Checks that the database opens and that the embedding and generation
//! services are reachable with the configured key.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use lore_config::LoreConfig;
use lore_core::{HealthStatus, LoreError, PluginAdapter};
use lore_openai::{OpenAiEmbedder, OpenAiGenerator};
use lore_storage::SqliteStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn from_health(name: &str, health: Result<HealthStatus, LoreError>, start: Instant) -> Self {
        let (status, message) = match health {
            Ok(HealthStatus::Healthy) => (CheckStatus::Pass, "healthy".to_string()),
            Ok(HealthStatus::Degraded(why)) => (CheckStatus::Warn, why),
            Ok(HealthStatus::Unhealthy(why)) => (CheckStatus::Fail, why),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        };
        Self {
            name: name.to_string(),
            status,
            message,
            duration: start.elapsed(),
        }
    }
}

/// Run the `lore doctor` command. Fails when any check fails.
pub async fn run_doctor(config: &LoreConfig, plain: bool) -> Result<(), LoreError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = vec![
        check_config(config),
        check_database(config).await,
        check_adapter("embedding", OpenAiEmbedder::new(&config.openai)).await,
        check_adapter("generation", OpenAiGenerator::new(&config.openai)).await,
    ];

    println!();
    println!("  lore doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let fail_count = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    if fail_count > 0 {
        return Err(LoreError::Internal(format!("{fail_count} doctor check(s) failed")));
    }
    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Configuration already loaded by the time doctor runs; report what matters.
fn check_config(config: &LoreConfig) -> CheckResult {
    let start = Instant::now();
    let has_key = config
        .openai
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty())
        || std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.trim().is_empty());

    let (status, message) = if has_key {
        (
            CheckStatus::Pass,
            format!("strategy={}", config.retrieval.strategy),
        )
    } else {
        (
            CheckStatus::Warn,
            "no API key; set openai.api_key or OPENAI_API_KEY".to_string(),
        )
    };
    CheckResult {
        name: "config".into(),
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_database(config: &LoreConfig) -> CheckResult {
    let start = Instant::now();
    match SqliteStore::open(&config.storage).await {
        Ok(store) => {
            let mut result =
                CheckResult::from_health("database", store.health_check().await, start);
            if result.status == CheckStatus::Pass {
                result.message = config.storage.database_path.clone();
            }
            result
        }
        Err(e) => CheckResult::from_health("database", Err(e), start),
    }
}

async fn check_adapter<A: PluginAdapter>(name: &str, adapter: Result<A, LoreError>) -> CheckResult {
    let start = Instant::now();
    match adapter {
        Ok(adapter) => CheckResult::from_health(name, adapter.health_check().await, start),
        Err(e) => CheckResult::from_health(name, Err(e), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_maps_to_status() {
        let start = Instant::now();
        let pass = CheckResult::from_health("x", Ok(HealthStatus::Healthy), start);
        assert_eq!(pass.status, CheckStatus::Pass);

        let warn = CheckResult::from_health("x", Ok(HealthStatus::Degraded("slow".into())), start);
        assert_eq!(warn.status, CheckStatus::Warn);
        assert_eq!(warn.message, "slow");

        let fail = CheckResult::from_health("x", Err(LoreError::Cancelled), start);
        assert_eq!(fail.status, CheckStatus::Fail);
    }

    #[test]
    fn plain_lines_use_tags() {
        let result = CheckResult {
            name: "database".into(),
            status: CheckStatus::Fail,
            message: "locked".into(),
            duration: Duration::from_millis(3),
        };
        let line = render_line(&result, false);
        assert!(line.starts_with("    [FAIL] database"));
        assert!(line.ends_with("locked (3ms)"));
    }

    #[tokio::test]
    async fn database_check_passes_on_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoreConfig::default();
        config.storage.database_path = dir.path().join("lore.db").to_string_lossy().into_owned();

        let result = check_database(&config).await;
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
    }
}
