// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the retrieval, prompt, memory, and storage crates.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Embedding,
    Generation,
    Storage,
}

// --- Knowledge ---

/// The shape of a taught fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// A question/answer pair.
    Qa { question: String, answer: String },
    /// A free-text context block.
    Context { block: String },
    /// An image with a description the bot can reason about.
    Image {
        description: String,
        alt_text: String,
        url: String,
    },
}

impl EntryKind {
    /// Storage tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Qa { .. } => "qa",
            EntryKind::Context { .. } => "context",
            EntryKind::Image { .. } => "image",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, EntryKind::Image { .. })
    }
}

/// A unit of taught knowledge owned by exactly one bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Identifier, unique within the owning bot.
    pub id: String,
    /// Owning bot.
    pub bot_id: String,
    /// What was taught.
    pub kind: EntryKind,
    /// Precomputed embedding. Empty means the entry is not eligible for
    /// embedding-based retrieval.
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// Short terms used by the keyword strategy.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeEntry {
    /// Returns true when this entry can take part in embedding retrieval.
    pub fn has_embedding(&self) -> bool {
        !self.embedding.is_empty()
    }

    /// The text an embedding for this entry is computed from.
    pub fn embedding_text(&self) -> String {
        match &self.kind {
            EntryKind::Qa { question, answer } => format!("{question}\n{answer}"),
            EntryKind::Context { block } => block.clone(),
            EntryKind::Image {
                description,
                alt_text,
                ..
            } => {
                if alt_text.trim().is_empty() {
                    description.clone()
                } else {
                    format!("{description}\n{alt_text}")
                }
            }
        }
    }

    /// Lowercased text used for literal keyword-strategy matches.
    pub fn searchable_text(&self) -> String {
        self.embedding_text().to_lowercase()
    }

    /// Image reference for image entries, `None` otherwise.
    pub fn image_ref(&self) -> Option<ImageRef> {
        match &self.kind {
            EntryKind::Image {
                description,
                alt_text,
                url,
            } => Some(ImageRef {
                entry_id: self.id.clone(),
                url: url.clone(),
                description: description.clone(),
                alt_text: alt_text.clone(),
            }),
            _ => None,
        }
    }
}

/// A knowledge entry annotated with the score of one ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub entry: KnowledgeEntry,
    pub score: f64,
}

/// Ranked entries plus the confidence derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    /// Highest score first, capped by the retrieval budget.
    pub entries: Vec<ScoredEntry>,
    pub confidence: f64,
}

impl RetrievalResult {
    /// A result with no entries and the given "no information" floor.
    pub fn empty(floor: f64) -> Self {
        Self {
            entries: Vec::new(),
            confidence: floor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers of the ranked entries, in rank order.
    pub fn entry_ids(&self) -> Vec<String> {
        self.entries.iter().map(|s| s.entry.id.clone()).collect()
    }

    /// Image references for every image entry in the result.
    pub fn images(&self) -> Vec<ImageRef> {
        self.entries
            .iter()
            .filter_map(|s| s.entry.image_ref())
            .collect()
    }
}

/// An image the caller should display alongside the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub entry_id: String,
    pub url: String,
    pub description: String,
    pub alt_text: String,
}

// --- Conversation ---

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One message in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Caller-supplied time and location metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientContext {
    pub city: String,
    pub country: String,
    /// Local wall-clock time, already formatted for display (e.g. "12:30").
    pub local_time: String,
    pub day_of_week: String,
    pub meal_time: String,
}

impl AmbientContext {
    /// Builds an ambient context from a local timestamp.
    pub fn from_local<Tz: chrono::TimeZone>(
        city: impl Into<String>,
        country: impl Into<String>,
        local: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            city: city.into(),
            country: country.into(),
            local_time: local.format("%H:%M").to_string(),
            day_of_week: local.format("%A").to_string(),
            meal_time: meal_time_label(local.hour()).to_string(),
        }
    }
}

/// Maps an hour of day (0-23) to a meal-time label.
pub fn meal_time_label(hour: u32) -> &'static str {
    match hour {
        5..=10 => "breakfast",
        11..=14 => "lunch",
        15..=17 => "snacks",
        18..=22 => "dinner",
        _ => "late night",
    }
}

// --- Memory ---

/// Category of a remembered fact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Personal,
    Academic,
    Preference,
    Context,
    Fact,
}

/// A single remembered fact about a user with respect to one bot.
///
/// At most one record exists per `(user_id, bot_id, key)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMemory {
    pub id: String,
    pub user_id: String,
    pub bot_id: String,
    /// Short canonical name, e.g. `name` or `department`.
    pub key: String,
    pub value: String,
    pub memory_type: MemoryType,
    /// Extraction certainty, 0.0-1.0.
    pub confidence: f64,
    /// Usefulness for future answers, 1-10.
    pub importance: u8,
    /// Reserved for an explicit user confirmation flow; the extractor never sets it.
    pub is_verified: bool,
    /// The message the fact was extracted from.
    pub extracted_from: Option<String>,
    pub first_mentioned: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// A query the bot was not confident enough to answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnansweredQuestion {
    pub id: String,
    pub bot_id: String,
    pub user_id: String,
    pub session_id: String,
    pub question: String,
    pub confidence: f64,
    pub asked_at: DateTime<Utc>,
}

// --- Generation ---

/// A request to the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A reply from the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub content: String,
    pub model: String,
}
