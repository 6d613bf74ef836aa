// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User memory reads and transactional merge writes.

use lore_core::LoreError;
use lore_core::types::{MemoryType, UserMemory};
use rusqlite::params;

use crate::database::{Database, format_ts, parse_ts, storage_err};

/// Reads every memory for a (user, bot) pair.
pub async fn memories_for(
    db: &Database,
    user_id: &str,
    bot_id: &str,
) -> Result<Vec<UserMemory>, LoreError> {
    let user_id = user_id.to_string();
    let bot_id = bot_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, bot_id, key, value, memory_type, confidence, importance,
                        is_verified, extracted_from, first_mentioned, last_updated
                 FROM user_memories WHERE user_id = ?1 AND bot_id = ?2
                 ORDER BY importance DESC, last_updated DESC",
            )?;
            let memories = stmt
                .query_map(params![user_id, bot_id], row_to_memory)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(memories)
        })
        .await
        .map_err(storage_err)
}

/// Applies a merge outcome in one transaction: either every row lands or none do.
pub async fn write_memories(
    db: &Database,
    inserted: &[UserMemory],
    updated: &[UserMemory],
) -> Result<(), LoreError> {
    if inserted.is_empty() && updated.is_empty() {
        return Ok(());
    }
    let inserted = inserted.to_vec();
    let updated = updated.to_vec();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut insert = tx.prepare(
                    "INSERT INTO user_memories
                         (id, user_id, bot_id, key, value, memory_type, confidence, importance,
                          is_verified, extracted_from, first_mentioned, last_updated)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                )?;
                for m in &inserted {
                    insert.execute(params![
                        m.id,
                        m.user_id,
                        m.bot_id,
                        m.key,
                        m.value,
                        m.memory_type.to_string(),
                        m.confidence,
                        i64::from(m.importance),
                        m.is_verified,
                        m.extracted_from,
                        format_ts(&m.first_mentioned),
                        format_ts(&m.last_updated),
                    ])?;
                }

                let mut update = tx.prepare(
                    "UPDATE user_memories
                     SET value = ?2, memory_type = ?3, confidence = ?4, importance = ?5,
                         extracted_from = ?6, last_updated = ?7
                     WHERE id = ?1",
                )?;
                for m in &updated {
                    update.execute(params![
                        m.id,
                        m.value,
                        m.memory_type.to_string(),
                        m.confidence,
                        i64::from(m.importance),
                        m.extracted_from,
                        format_ts(&m.last_updated),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(storage_err)
}

fn row_to_memory(row: &rusqlite::Row<'_>) -> Result<UserMemory, rusqlite::Error> {
    let memory_type: String = row.get(5)?;
    let importance: i64 = row.get(7)?;
    let first_mentioned: String = row.get(10)?;
    let last_updated: String = row.get(11)?;

    Ok(UserMemory {
        id: row.get(0)?,
        user_id: row.get(1)?,
        bot_id: row.get(2)?,
        key: row.get(3)?,
        value: row.get(4)?,
        memory_type: memory_type.parse().unwrap_or(MemoryType::Fact),
        confidence: row.get(6)?,
        importance: u8::try_from(importance.clamp(1, 10)).unwrap_or(5),
        is_verified: row.get(8)?,
        extracted_from: row.get(9)?,
        first_mentioned: parse_ts(10, &first_mentioned)?,
        last_updated: parse_ts(11, &last_updated)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn memory(id: &str, key: &str, value: &str, importance: u8) -> UserMemory {
        let now = Utc::now();
        UserMemory {
            id: id.into(),
            user_id: "u1".into(),
            bot_id: "bot".into(),
            key: key.into(),
            value: value.into(),
            memory_type: MemoryType::Personal,
            confidence: 0.8,
            importance,
            is_verified: false,
            extracted_from: Some("my name is John".into()),
            first_mentioned: now,
            last_updated: now,
        }
    }

    #[tokio::test]
    async fn insert_then_update_in_place() {
        let db = Database::open_in_memory().await.unwrap();
        let original = memory("m1", "name", "John", 9);
        write_memories(&db, &[original.clone()], &[]).await.unwrap();

        let mut changed = original.clone();
        changed.value = "Johnny".into();
        changed.confidence = 0.95;
        changed.last_updated = original.last_updated + Duration::seconds(5);
        write_memories(&db, &[], &[changed.clone()]).await.unwrap();

        let stored = memories_for(&db, "u1", "bot").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, "Johnny");
        assert_eq!(stored[0].confidence, 0.95);
        assert_eq!(stored[0].first_mentioned, original.first_mentioned);
    }

    #[tokio::test]
    async fn duplicate_key_rolls_back_whole_batch() {
        let db = Database::open_in_memory().await.unwrap();
        write_memories(&db, &[memory("m1", "name", "John", 9)], &[])
            .await
            .unwrap();

        let batch = [memory("m2", "course", "CS", 7), memory("m3", "name", "Jim", 9)];
        assert!(write_memories(&db, &batch, &[]).await.is_err());

        let stored = memories_for(&db, "u1", "bot").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, "John");
    }

    #[tokio::test]
    async fn ordered_by_importance_and_scoped_to_pair() {
        let db = Database::open_in_memory().await.unwrap();
        let mut other_bot = memory("m9", "name", "John", 9);
        other_bot.bot_id = "other".into();
        write_memories(
            &db,
            &[
                memory("m1", "snack", "samosa", 3),
                memory("m2", "name", "John", 9),
                other_bot,
            ],
            &[],
        )
        .await
        .unwrap();

        let stored = memories_for(&db, "u1", "bot").await.unwrap();
        let keys: Vec<_> = stored.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "snack"]);
    }
}
