// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-based extraction of user facts from a conversation turn.
//!
//! The generation service is asked for a JSON object listing clearly stated
//! facts about the user plus a one-line summary. Candidates whose key already
//! exists for the user are returned separately as update candidates.

use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

use lore_config::model::MemoryConfig;
use lore_core::LoreError;
use lore_core::traits::GenerationAdapter;
use lore_core::types::{ConversationTurn, GenerationRequest, MemoryType, Role, UserMemory};
use serde::Deserialize;
use tracing::{debug, warn};

/// System prompt for memory extraction.
pub const EXTRACTION_PROMPT: &str = r#"You maintain a profile of facts about a user so a chatbot can personalize future answers.

Read the latest exchange and extract facts ABOUT THE USER that are clearly stated or strongly implied by the user. Do not speculate or infer beyond what was said. Ignore facts about the bot or the knowledge it shared.

Output a single JSON object and nothing else:
{
  "memories": [
    {
      "key": "short_snake_case_name, e.g. name, department, year_of_study, favorite_food",
      "value": "the fact, as free text",
      "memory_type": "personal | academic | preference | context | fact",
      "importance": 1-10 (how useful for future answers),
      "confidence": 0.0-1.0 (how clearly it was stated)
    }
  ],
  "memory_context": "one sentence summarizing what is now known about the user"
}

Reuse an existing key when the user restates or corrects a known fact. If nothing new was said, return {"memories": [], "memory_context": ""}."#;

/// One fact proposed by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMemory {
    pub key: String,
    pub value: String,
    pub memory_type: MemoryType,
    pub importance: u8,
    pub confidence: f64,
    /// The user message the fact came from.
    pub extracted_from: String,
}

/// Output of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    /// Candidates whose key is not yet known for this user.
    pub new_candidates: Vec<ExtractedMemory>,
    /// Candidates whose key matches an existing memory.
    pub update_candidates: Vec<ExtractedMemory>,
    /// Short natural-language summary of the user.
    pub memory_context: String,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.new_candidates.is_empty() && self.update_candidates.is_empty()
    }

    /// All candidates, new first.
    pub fn candidates(&self) -> impl Iterator<Item = &ExtractedMemory> {
        self.new_candidates
            .iter()
            .chain(self.update_candidates.iter())
    }
}

/// Everything the extractor looks at for one turn.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionInput<'a> {
    pub message: &'a str,
    pub reply: &'a str,
    /// Prior turns, oldest first. Only the most recent are shown.
    pub history: &'a [ConversationTurn],
    pub existing: &'a [UserMemory],
}

#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    memories: Vec<RawMemory>,
    #[serde(default)]
    memory_context: String,
}

#[derive(Debug, Deserialize)]
struct RawMemory {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    memory_type: Option<String>,
    #[serde(default)]
    importance: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    extracted_from: Option<String>,
}

/// Extracts candidate memories through the generation service.
pub struct MemoryExtractor {
    generator: Arc<dyn GenerationAdapter>,
    config: MemoryConfig,
}

impl MemoryExtractor {
    pub fn new(generator: Arc<dyn GenerationAdapter>, config: MemoryConfig) -> Self {
        Self { generator, config }
    }

    /// Runs one extraction pass.
    ///
    /// Generation failures are returned to the caller; malformed model output
    /// degrades to an empty result.
    pub async fn extract(&self, input: &ExtractionInput<'_>) -> Result<ExtractionResult, LoreError> {
        let request = GenerationRequest {
            system_prompt: EXTRACTION_PROMPT.to_string(),
            user_message: build_extraction_message(input, self.config.history_turns),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self.generator.complete(request).await?;

        match parse_extraction_response(&response.content, input.existing, input.message) {
            Ok(result) => {
                debug!(
                    new = result.new_candidates.len(),
                    updates = result.update_candidates.len(),
                    "memory extraction complete"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "discarding unparseable extraction output");
                debug!("Raw response: {}", response.content);
                Ok(ExtractionResult::default())
            }
        }
    }
}

/// Builds the user message for the extraction request.
pub fn build_extraction_message(input: &ExtractionInput<'_>, history_turns: usize) -> String {
    let mut out = String::new();

    if !input.existing.is_empty() {
        out.push_str("Known facts about the user:\n");
        for memory in input.existing {
            let _ = writeln!(out, "- {}: {}", memory.key, memory.value);
        }
        out.push('\n');
    }

    let start = input.history.len().saturating_sub(history_turns);
    let recent = &input.history[start..];
    if !recent.is_empty() {
        out.push_str("Earlier conversation:\n");
        for turn in recent {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Bot => "Assistant",
            };
            let _ = writeln!(out, "{speaker}: {}", turn.content);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Latest exchange:\nUser: {}", input.message);
    let _ = write!(out, "Assistant: {}", input.reply);
    out
}

/// Lowercases a key and joins words with underscores.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Parses the model's extraction output.
///
/// Accepts the JSON object optionally wrapped in a markdown code fence or
/// surrounded by prose. Unknown memory types fall back to `fact`; importance
/// and confidence are clamped to their ranges. Candidates without a key or
/// value are dropped, and repeated keys keep the most confident candidate.
pub fn parse_extraction_response(
    response: &str,
    existing: &[UserMemory],
    message: &str,
) -> Result<ExtractionResult, LoreError> {
    let trimmed = response.trim();
    let start = trimmed
        .find('{')
        .ok_or_else(|| LoreError::ExtractionParse("no JSON object in response".into()))?;
    let end = trimmed
        .rfind('}')
        .map(|i| i + 1)
        .filter(|end| *end > start)
        .ok_or_else(|| LoreError::ExtractionParse("unterminated JSON object".into()))?;

    let raw: RawExtraction = serde_json::from_str(&trimmed[start..end])
        .map_err(|e| LoreError::ExtractionParse(e.to_string()))?;

    let existing_keys: HashSet<&str> = existing.iter().map(|m| m.key.as_str()).collect();
    let mut candidates: Vec<ExtractedMemory> = Vec::new();

    for item in raw.memories {
        let key = normalize_key(&item.key);
        let value = match &item.value {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }

        let memory_type = item
            .memory_type
            .as_deref()
            .and_then(|t| t.trim().parse::<MemoryType>().ok())
            .unwrap_or(MemoryType::Fact);
        let importance = item.importance.unwrap_or(5.0).round().clamp(1.0, 10.0) as u8;
        let confidence = item.confidence.unwrap_or(0.5).clamp(0.0, 1.0);
        let extracted_from = item
            .extracted_from
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| message.to_string());

        let candidate = ExtractedMemory {
            key,
            value,
            memory_type,
            importance,
            confidence,
            extracted_from,
        };

        match candidates.iter_mut().find(|c| c.key == candidate.key) {
            Some(prev) if candidate.confidence > prev.confidence => *prev = candidate,
            Some(_) => {}
            None => candidates.push(candidate),
        }
    }

    let (update_candidates, new_candidates): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| existing_keys.contains(c.key.as_str()));

    Ok(ExtractionResult {
        new_candidates,
        update_candidates,
        memory_context: raw.memory_context.trim().to_string(),
    })
}
