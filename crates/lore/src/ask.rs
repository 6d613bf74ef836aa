// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lore ask`: one-shot questions and an interactive session.

use clap::Args;
use lore_agent::{ChatAnswer, ChatRequest};
use lore_config::LoreConfig;
use lore_core::LoreError;
use lore_core::types::{AmbientContext, ConversationTurn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::app::App;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Bot to ask.
    #[arg(long)]
    pub bot: String,
    /// Who is asking; memories are kept per user.
    #[arg(long, default_value = "cli")]
    pub user: String,
    /// Session identifier, defaults to a fresh one.
    #[arg(long)]
    pub session: Option<String>,
    /// City to report as the user's location.
    #[arg(long, requires = "country")]
    pub city: Option<String>,
    #[arg(long, requires = "city")]
    pub country: Option<String>,
    /// The question. Omit to read questions from stdin until EOF.
    pub message: Option<String>,
}

pub async fn run_ask(config: &LoreConfig, args: AskArgs) -> Result<(), LoreError> {
    let app = App::open(config).await?;
    let session = args
        .session
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let result = match args.message.clone() {
        Some(message) => {
            let request = build_request(&args, &session, message, Vec::new());
            match ask_once(&app, request).await {
                Ok(answer) => {
                    print_answer(&answer);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        None => interactive(&app, &args, &session, config.prompt.history_turns).await,
    };

    app.close().await?;
    match result {
        Err(LoreError::Cancelled) => {
            eprintln!("cancelled");
            Ok(())
        }
        other => other,
    }
}

/// Reads one question per line, carrying history across turns.
async fn interactive(
    app: &App,
    args: &AskArgs,
    session: &str,
    history_turns: usize,
) -> Result<(), LoreError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut history: Vec<ConversationTurn> = Vec::new();

    loop {
        stdout.write_all(b"> ").await.map_err(io_err)?;
        stdout.flush().await.map_err(io_err)?;

        let Some(line) = lines.next_line().await.map_err(io_err)? else {
            break;
        };
        let message = line.trim().to_string();
        if message.is_empty() {
            continue;
        }

        let request = build_request(args, session, message.clone(), history.clone());
        let answer = ask_once(app, request).await?;
        print_answer(&answer);

        history.push(ConversationTurn::user(message));
        history.push(ConversationTurn::bot(answer.reply));
        let keep = history_turns.max(1) * 2;
        if history.len() > keep {
            history.drain(..history.len() - keep);
        }
    }
    Ok(())
}

/// Answers one request, cancelling it on Ctrl-C.
async fn ask_once(app: &App, request: ChatRequest) -> Result<ChatAnswer, LoreError> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    debug!("interrupt received, cancelling turn");
                    cancel.cancel();
                }
                Err(e) => warn!(error = %e, "failed to listen for interrupt"),
            }
        })
    };

    let result = app.pipeline.answer(request, &cancel).await;
    watcher.abort();
    result
}

fn io_err(e: std::io::Error) -> LoreError {
    LoreError::Internal(format!("terminal I/O failed: {e}"))
}

fn build_request(
    args: &AskArgs,
    session: &str,
    message: String,
    history: Vec<ConversationTurn>,
) -> ChatRequest {
    let ambient = match (&args.city, &args.country) {
        (Some(city), Some(country)) => Some(AmbientContext::from_local(
            city.as_str(),
            country.as_str(),
            &chrono::Local::now(),
        )),
        _ => None,
    };
    ChatRequest {
        bot_id: args.bot.clone(),
        user_id: args.user.clone(),
        session_id: session.to_string(),
        message,
        history,
        ambient,
    }
}

fn print_answer(answer: &ChatAnswer) {
    println!("{}", answer.reply);
    for image in &answer.images {
        println!("  [image] {} ({})", image.url, image.description);
    }
    debug!(
        confidence = answer.confidence,
        was_answered = answer.was_answered,
        entries = ?answer.used_entry_ids,
        "turn complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(city: Option<&str>, country: Option<&str>) -> AskArgs {
        AskArgs {
            bot: "canteen".into(),
            user: "u1".into(),
            session: None,
            city: city.map(String::from),
            country: country.map(String::from),
            message: None,
        }
    }

    #[test]
    fn request_carries_ambient_only_with_location() {
        let req = build_request(&args(None, None), "s", "hi".into(), Vec::new());
        assert!(req.ambient.is_none());

        let req = build_request(&args(Some("Pune"), Some("India")), "s", "hi".into(), Vec::new());
        let ambient = req.ambient.expect("ambient");
        assert_eq!(ambient.city, "Pune");
        assert_eq!(ambient.country, "India");
        assert_eq!(req.session_id, "s");
    }
}
