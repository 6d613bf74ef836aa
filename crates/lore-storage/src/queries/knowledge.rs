// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge entry CRUD.

use lore_core::LoreError;
use lore_core::types::{EntryKind, KnowledgeEntry};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, blob_to_vec, format_ts, parse_ts, storage_err, vec_to_blob};

const COLUMNS: &str =
    "id, bot_id, payload, embedding, keywords, category, summary, created_at, updated_at";

/// Reads every entry for a bot, oldest first.
pub async fn entries_for_bot(db: &Database, bot_id: &str) -> Result<Vec<KnowledgeEntry>, LoreError> {
    let bot_id = bot_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM knowledge_entries WHERE bot_id = ?1 ORDER BY created_at, id"
            ))?;
            let entries = stmt
                .query_map(params![bot_id], row_to_entry)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
        .map_err(storage_err)
}

/// Reads one entry owned by `bot_id`.
pub async fn get_entry(
    db: &Database,
    bot_id: &str,
    id: &str,
) -> Result<Option<KnowledgeEntry>, LoreError> {
    let bot_id = bot_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM knowledge_entries WHERE bot_id = ?1 AND id = ?2"
            ))?;
            stmt.query_row(params![bot_id, id], row_to_entry).optional()
        })
        .await
        .map_err(storage_err)
}

/// Inserts or replaces an entry.
pub async fn save_entry(db: &Database, entry: &KnowledgeEntry) -> Result<(), LoreError> {
    let payload = serde_json::to_string(&entry.kind).map_err(LoreError::storage)?;
    let keywords = serde_json::to_string(&entry.keywords).map_err(LoreError::storage)?;
    let embedding = entry.has_embedding().then(|| vec_to_blob(&entry.embedding));
    let id = entry.id.clone();
    let bot_id = entry.bot_id.clone();
    let kind = entry.kind.as_str();
    let category = entry.category.clone();
    let summary = entry.summary.clone();
    let created_at = format_ts(&entry.created_at);
    let updated_at = format_ts(&entry.updated_at);

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO knowledge_entries
                     (id, bot_id, kind, payload, embedding, keywords, category, summary, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(id) DO UPDATE SET
                     bot_id = excluded.bot_id,
                     kind = excluded.kind,
                     payload = excluded.payload,
                     embedding = excluded.embedding,
                     keywords = excluded.keywords,
                     category = excluded.category,
                     summary = excluded.summary,
                     updated_at = excluded.updated_at",
                params![
                    id, bot_id, kind, payload, embedding, keywords, category, summary, created_at,
                    updated_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(storage_err)
}

/// Deletes an entry. Returns whether a row was removed.
pub async fn delete_entry(db: &Database, bot_id: &str, id: &str) -> Result<bool, LoreError> {
    let bot_id = bot_id.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM knowledge_entries WHERE bot_id = ?1 AND id = ?2",
                params![bot_id, id],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(storage_err)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<KnowledgeEntry, rusqlite::Error> {
    let payload: String = row.get(2)?;
    let kind: EntryKind = serde_json::from_str(&payload).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let embedding: Option<Vec<u8>> = row.get(3)?;
    let keywords: String = row.get(4)?;
    let keywords: Vec<String> = serde_json::from_str(&keywords).unwrap_or_default();
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(KnowledgeEntry {
        id: row.get(0)?,
        bot_id: row.get(1)?,
        kind,
        embedding: embedding.map(|b| blob_to_vec(&b)).unwrap_or_default(),
        keywords,
        category: row.get(5)?,
        summary: row.get(6)?,
        created_at: parse_ts(7, &created_at)?,
        updated_at: parse_ts(8, &updated_at)?,
    })
}
