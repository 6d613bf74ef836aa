// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for Lore answer generation.
//!
//! Builds the system prompt sent alongside the raw user message from:
//! - **Knowledge**: the ranked entries that survived the confidence gate
//! - **History**: the most recent conversation turns
//! - **Conditional sections**: ambient time/location and remembered user facts
//!
//! Every grounded prompt ends with the same closing instruction block. When
//! nothing survived retrieval, a fixed decline prompt is used instead.

pub mod conditional;
pub mod history;
pub mod knowledge;

use lore_config::model::{AgentConfig, PromptConfig};
use lore_core::types::{
    AmbientContext, ConversationTurn, GenerationRequest, RetrievalResult, UserMemory,
};

pub use conditional::{render_ambient, render_memories};
pub use history::render_history;
pub use knowledge::render_entries;

/// Closing block appended to every prompt.
pub const CLOSING_INSTRUCTIONS: &str = "\
INSTRUCTIONS:
- Answer using only the knowledge above. Keep the reply short and friendly.
- Never include raw URLs or links to images in your reply. Images are shown to the user separately.
- Personalize the reply with what you know about the user when it is relevant, for example by using their name.
- If the knowledge only partly covers the question, answer that part and say what you don't know.";

/// Prompt used when retrieval found nothing to ground an answer on.
pub const DECLINE_PROMPT: &str = "\
You are a helpful assistant, but you have not been taught anything that answers the user's question.
Politely tell the user that you don't have that information yet and suggest they ask something else.
Do not guess or make up an answer.";

/// Whether a prompt is grounded in retrieved knowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Grounded,
    Decline,
}

/// Everything the assembler reads for one chat turn.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub query: &'a str,
    pub retrieval: &'a RetrievalResult,
    pub history: &'a [ConversationTurn],
    pub ambient: Option<&'a AmbientContext>,
    pub memories: &'a [UserMemory],
}

/// The assembled prompt, ready to become a generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPrompt {
    pub kind: PromptKind,
    pub system_prompt: String,
    pub user_message: String,
}

impl AssembledPrompt {
    pub fn into_request(self, temperature: f32, max_tokens: u32) -> GenerationRequest {
        GenerationRequest {
            system_prompt: self.system_prompt,
            user_message: self.user_message,
            temperature,
            max_tokens,
        }
    }
}

/// Builds bounded generation prompts.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    bot_name: String,
    persona: Option<String>,
    history_turns: usize,
    max_memories: usize,
}

impl PromptAssembler {
    pub fn new(agent: &AgentConfig, prompt: &PromptConfig) -> Self {
        Self {
            bot_name: agent.name.clone(),
            persona: agent.persona.clone(),
            history_turns: prompt.history_turns,
            max_memories: prompt.max_memories,
        }
    }

    pub fn assemble(&self, input: &PromptInput<'_>) -> AssembledPrompt {
        if input.retrieval.is_empty() {
            tracing::debug!("no surviving entries, using decline prompt");
            return decline(input.query);
        }

        let mut sections: Vec<String> = Vec::new();
        sections.push(self.preamble());
        sections.push(format!(
            "KNOWLEDGE:\n{}",
            render_entries(&input.retrieval.entries)
        ));

        if let Some(history) = render_history(input.history, self.history_turns) {
            sections.push(format!("RECENT CONVERSATION:\n{history}"));
        }
        if let Some(ambient) = render_ambient(input.ambient) {
            sections.push(format!("USER CONTEXT:\n{ambient}"));
        }
        if let Some(memories) = render_memories(input.memories, self.max_memories) {
            sections.push(format!("WHAT YOU KNOW ABOUT THIS USER:\n{memories}"));
        }
        sections.push(CLOSING_INSTRUCTIONS.to_string());

        let system_prompt = sections
            .iter()
            .map(|s| s.trim_end())
            .collect::<Vec<_>>()
            .join("\n\n");

        tracing::debug!(
            entries = input.retrieval.entries.len(),
            history = input.history.len().min(self.history_turns),
            memories = input.memories.len().min(self.max_memories),
            chars = system_prompt.len(),
            "assembled grounded prompt"
        );

        AssembledPrompt {
            kind: PromptKind::Grounded,
            system_prompt,
            user_message: input.query.to_string(),
        }
    }

    fn preamble(&self) -> String {
        match &self.persona {
            Some(persona) if !persona.trim().is_empty() => persona.trim().to_string(),
            _ => format!(
                "You are {}, a helpful assistant. Answer the user's question using the knowledge below.",
                self.bot_name
            ),
        }
    }
}

/// The fixed decline prompt. Only the raw query is carried over.
pub fn decline(query: &str) -> AssembledPrompt {
    AssembledPrompt {
        kind: PromptKind::Decline,
        system_prompt: format!("{DECLINE_PROMPT}\n\n{CLOSING_INSTRUCTIONS}"),
        user_message: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lore_core::types::{EntryKind, KnowledgeEntry, MemoryType, ScoredEntry};

    fn assembler() -> PromptAssembler {
        PromptAssembler::new(&AgentConfig::default(), &PromptConfig::default())
    }

    fn retrieval() -> RetrievalResult {
        let now = Utc::now();
        RetrievalResult {
            entries: vec![ScoredEntry {
                entry: KnowledgeEntry {
                    id: "hours".into(),
                    bot_id: "bot".into(),
                    kind: EntryKind::Qa {
                        question: "What are your hours?".into(),
                        answer: "9 to 5".into(),
                    },
                    embedding: vec![],
                    keywords: vec![],
                    category: None,
                    summary: None,
                    created_at: now,
                    updated_at: now,
                },
                score: 0.8,
            }],
            confidence: 0.8,
        }
    }

    fn memory() -> UserMemory {
        let now = Utc::now();
        UserMemory {
            id: "m1".into(),
            user_id: "u".into(),
            bot_id: "bot".into(),
            key: "name".into(),
            value: "John".into(),
            memory_type: MemoryType::Personal,
            confidence: 0.9,
            importance: 9,
            is_verified: false,
            extracted_from: None,
            first_mentioned: now,
            last_updated: now,
        }
    }

    #[test]
    fn grounded_prompt_has_all_sections_in_order() {
        let retrieval = retrieval();
        let history = vec![
            ConversationTurn::user("hello"),
            ConversationTurn::bot("hi there"),
        ];
        let ambient = AmbientContext {
            city: "Pune".into(),
            country: "India".into(),
            local_time: "08:15".into(),
            day_of_week: "Tuesday".into(),
            meal_time: "breakfast".into(),
        };
        let memories = vec![memory()];

        let prompt = assembler().assemble(&PromptInput {
            query: "what time do you open",
            retrieval: &retrieval,
            history: &history,
            ambient: Some(&ambient),
            memories: &memories,
        });

        assert_eq!(prompt.kind, PromptKind::Grounded);
        assert_eq!(prompt.user_message, "what time do you open");

        let p = &prompt.system_prompt;
        let order = [
            "You are lore",
            "KNOWLEDGE:\nQ: What are your hours?\nA: 9 to 5",
            "RECENT CONVERSATION:\nUser: hello\nAssistant: hi there",
            "USER CONTEXT:\nLocation: Pune, India",
            "WHAT YOU KNOW ABOUT THIS USER:\n- name: John",
            "INSTRUCTIONS:",
        ];
        let mut last = 0;
        for needle in order {
            let at = p[last..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {needle}\n{p}"));
            last += at + needle.len();
        }
        assert!(p.ends_with(CLOSING_INSTRUCTIONS));
    }

    #[test]
    fn optional_sections_are_omitted() {
        let retrieval = retrieval();
        let prompt = assembler().assemble(&PromptInput {
            query: "hours?",
            retrieval: &retrieval,
            history: &[],
            ambient: None,
            memories: &[],
        });
        let p = &prompt.system_prompt;
        assert!(!p.contains("RECENT CONVERSATION"));
        assert!(!p.contains("USER CONTEXT"));
        assert!(!p.contains("WHAT YOU KNOW"));
        assert!(p.ends_with(CLOSING_INSTRUCTIONS));
    }

    #[test]
    fn empty_retrieval_uses_decline_prompt() {
        let empty = RetrievalResult::empty(0.0);
        let history = vec![ConversationTurn::user("secret history")];
        let memories = vec![memory()];
        let prompt = assembler().assemble(&PromptInput {
            query: "do you sell furniture",
            retrieval: &empty,
            history: &history,
            ambient: None,
            memories: &memories,
        });

        assert_eq!(prompt.kind, PromptKind::Decline);
        assert!(prompt.system_prompt.starts_with(DECLINE_PROMPT));
        assert!(!prompt.system_prompt.contains("secret history"));
        assert!(!prompt.system_prompt.contains("John"));
        assert_eq!(prompt.user_message, "do you sell furniture");
    }

    #[test]
    fn persona_replaces_default_preamble() {
        let agent = AgentConfig {
            persona: Some("You are the campus canteen bot.".into()),
            ..AgentConfig::default()
        };
        let assembler = PromptAssembler::new(&agent, &PromptConfig::default());
        let retrieval = retrieval();
        let prompt = assembler.assemble(&PromptInput {
            query: "hours?",
            retrieval: &retrieval,
            history: &[],
            ambient: None,
            memories: &[],
        });
        assert!(prompt.system_prompt.starts_with("You are the campus canteen bot."));
    }

    #[test]
    fn into_request_carries_budget() {
        let request = decline("hi").into_request(0.7, 500);
        assert_eq!(request.user_message, "hi");
        assert_eq!(request.max_tokens, 500);
    }
}
