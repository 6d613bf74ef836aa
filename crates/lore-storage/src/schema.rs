// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table definitions, applied idempotently on every open.

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS knowledge_entries (
    id TEXT PRIMARY KEY NOT NULL,
    bot_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    payload TEXT NOT NULL,
    embedding BLOB,
    keywords TEXT NOT NULL DEFAULT '[]',
    category TEXT,
    summary TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_knowledge_bot ON knowledge_entries(bot_id);

CREATE TABLE IF NOT EXISTS user_memories (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    bot_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    memory_type TEXT NOT NULL,
    confidence REAL NOT NULL,
    importance INTEGER NOT NULL,
    is_verified INTEGER NOT NULL DEFAULT 0,
    extracted_from TEXT,
    first_mentioned TEXT NOT NULL,
    last_updated TEXT NOT NULL,
    UNIQUE (user_id, bot_id, key)
);

CREATE TABLE IF NOT EXISTS unanswered_questions (
    id TEXT PRIMARY KEY NOT NULL,
    bot_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    session_id TEXT NOT NULL,
    question TEXT NOT NULL,
    confidence REAL NOT NULL,
    asked_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_unanswered_bot ON unanswered_questions(bot_id, asked_at);
";
