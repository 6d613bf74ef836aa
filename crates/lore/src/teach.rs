// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lore teach`, `lore edit`, and `lore forget`.

use clap::{Args, Subcommand};
use lore_agent::EntryLabels;
use lore_config::LoreConfig;
use lore_core::LoreError;
use lore_core::types::{EntryKind, KnowledgeEntry};

use crate::app::App;

/// Keyword-strategy labels shared by every `teach` subcommand.
#[derive(Args, Debug, Default)]
pub struct LabelArgs {
    /// Keyword for the keyword strategy; repeatable.
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub summary: Option<String>,
}

impl From<LabelArgs> for EntryLabels {
    fn from(args: LabelArgs) -> Self {
        EntryLabels {
            keywords: args.keywords,
            category: args.category,
            summary: args.summary,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TeachCommand {
    /// A question and its answer.
    Qa {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[command(flatten)]
        labels: LabelArgs,
    },
    /// A free-text block of context.
    Context {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        block: String,
        #[command(flatten)]
        labels: LabelArgs,
    },
    /// An image the bot may show alongside answers.
    Image {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        alt_text: String,
        #[arg(long)]
        url: String,
        #[command(flatten)]
        labels: LabelArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum EditCommand {
    Qa {
        #[arg(long)]
        bot: String,
        id: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    Context {
        #[arg(long)]
        bot: String,
        id: String,
        #[arg(long)]
        block: String,
    },
    Image {
        #[arg(long)]
        bot: String,
        id: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        alt_text: String,
        #[arg(long)]
        url: String,
    },
}

impl EditCommand {
    fn into_parts(self) -> (String, String, EntryKind) {
        match self {
            EditCommand::Qa {
                bot,
                id,
                question,
                answer,
            } => (bot, id, EntryKind::Qa { question, answer }),
            EditCommand::Context { bot, id, block } => (bot, id, EntryKind::Context { block }),
            EditCommand::Image {
                bot,
                id,
                description,
                alt_text,
                url,
            } => (
                bot,
                id,
                EntryKind::Image {
                    description,
                    alt_text,
                    url,
                },
            ),
        }
    }
}

pub async fn run_teach(config: &LoreConfig, cmd: TeachCommand) -> Result<(), LoreError> {
    let app = App::open(config).await?;
    let trainer = &app.trainer;

    let taught = match cmd {
        TeachCommand::Qa {
            bot,
            question,
            answer,
            labels,
        } => trainer.teach_qa(&bot, &question, &answer, labels.into()).await,
        TeachCommand::Context { bot, block, labels } => {
            trainer.teach_context(&bot, &block, labels.into()).await
        }
        TeachCommand::Image {
            bot,
            description,
            alt_text,
            url,
            labels,
        } => {
            trainer
                .teach_image(&bot, &description, &alt_text, &url, labels.into())
                .await
        }
    };

    let result = taught.map(|entry| report_saved("taught", &entry));
    app.close().await?;
    result
}

pub async fn run_edit(config: &LoreConfig, cmd: EditCommand) -> Result<(), LoreError> {
    let app = App::open(config).await?;
    let (bot, id, kind) = cmd.into_parts();

    let result = match app.trainer.edit_entry(&bot, &id, kind).await {
        Ok(Some(entry)) => {
            report_saved("updated", &entry);
            Ok(())
        }
        Ok(None) => Err(LoreError::InvalidInput(format!("no entry {id} for bot {bot}"))),
        Err(e) => Err(e),
    };
    app.close().await?;
    result
}

pub async fn run_forget(config: &LoreConfig, bot: &str, id: &str) -> Result<(), LoreError> {
    let app = App::open(config).await?;
    let result = match app.trainer.delete_entry(bot, id).await {
        Ok(true) => {
            println!("deleted {id}");
            Ok(())
        }
        Ok(false) => Err(LoreError::InvalidInput(format!("no entry {id} for bot {bot}"))),
        Err(e) => Err(e),
    };
    app.close().await?;
    result
}

fn report_saved(verb: &str, entry: &KnowledgeEntry) {
    let embedded = if entry.has_embedding() {
        "embedded"
    } else {
        "keyword-only"
    };
    println!("{verb} {} {} ({embedded})", entry.kind.as_str(), entry.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_convert() {
        let labels: EntryLabels = LabelArgs {
            keywords: vec!["menu".into()],
            category: Some("food".into()),
            summary: None,
        }
        .into();
        assert_eq!(labels.keywords, vec!["menu".to_string()]);
        assert_eq!(labels.category.as_deref(), Some("food"));
    }

    #[test]
    fn edit_image_keeps_fields() {
        let (bot, id, kind) = EditCommand::Image {
            bot: "b".into(),
            id: "e1".into(),
            description: "lunch menu".into(),
            alt_text: String::new(),
            url: "https://example.test/menu.png".into(),
        }
        .into_parts();
        assert_eq!((bot.as_str(), id.as_str()), ("b", "e1"));
        assert!(kind.is_image());
    }
}
