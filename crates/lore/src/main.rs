// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lore - a knowledge bot that answers only what it has been taught.
//!
//! This is the binary entry point: operator commands for teaching a bot,
//! asking it questions, and reviewing what it could not answer.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod ask;
mod doctor;
mod report;
mod teach;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lore - a knowledge bot that answers only what it has been taught.
#[derive(Parser, Debug)]
#[command(name = "lore", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a bot a question. Without a message, starts an interactive session.
    Ask(ask::AskArgs),
    /// Teach a bot a new fact.
    #[command(subcommand)]
    Teach(teach::TeachCommand),
    /// Edit the content of a taught entry, recomputing its embedding.
    #[command(subcommand)]
    Edit(teach::EditCommand),
    /// Delete a taught entry.
    Forget {
        #[arg(long)]
        bot: String,
        /// Entry id, as shown by `lore entries`.
        id: String,
    },
    /// List a bot's knowledge entries.
    Entries {
        #[arg(long)]
        bot: String,
    },
    /// Show what a bot remembers about a user.
    Memories {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        user: String,
    },
    /// List questions a bot could not answer.
    Unanswered {
        #[arg(long)]
        bot: String,
    },
    /// Check configuration, storage, and service connectivity.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => lore_config::load_and_validate_path(path),
        None => lore_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            lore_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);
    lore_agent::metrics::register_metrics();

    let result = match cli.command {
        Commands::Ask(args) => ask::run_ask(&config, args).await,
        Commands::Teach(cmd) => teach::run_teach(&config, cmd).await,
        Commands::Edit(cmd) => teach::run_edit(&config, cmd).await,
        Commands::Forget { bot, id } => teach::run_forget(&config, &bot, &id).await,
        Commands::Entries { bot } => report::run_entries(&config, &bot).await,
        Commands::Memories { bot, user } => report::run_memories(&config, &bot, &user).await,
        Commands::Unanswered { bot } => report::run_unanswered(&config, &bot).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
        Commands::Config => print_config(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lore={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_config(config: &lore_config::LoreConfig) -> Result<(), lore_core::LoreError> {
    let mut shown = config.clone();
    if shown.openai.api_key.is_some() {
        shown.openai.api_key = Some("<redacted>".into());
    }
    let rendered = toml::to_string_pretty(&shown)
        .map_err(|e| lore_core::LoreError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_teach_qa() {
        let cli = Cli::try_parse_from([
            "lore", "teach", "qa", "--bot", "canteen", "--question", "Hours?", "--answer",
            "9 to 5", "--keyword", "hours",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Teach(_)));
    }

    #[test]
    fn cli_requires_bot_for_unanswered() {
        assert!(Cli::try_parse_from(["lore", "unanswered"]).is_err());
    }

    #[test]
    fn default_config_renders_as_toml() {
        let config = lore_config::load_and_validate_str("").expect("defaults are valid");
        print_config(&config).unwrap();
    }
}
