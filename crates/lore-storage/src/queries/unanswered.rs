// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unanswered question log.

use lore_core::LoreError;
use lore_core::types::UnansweredQuestion;
use rusqlite::params;

use crate::database::{Database, format_ts, parse_ts, storage_err};

pub async fn record_unanswered(db: &Database, q: &UnansweredQuestion) -> Result<(), LoreError> {
    let q = q.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO unanswered_questions
                     (id, bot_id, user_id, session_id, question, confidence, asked_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    q.id,
                    q.bot_id,
                    q.user_id,
                    q.session_id,
                    q.question,
                    q.confidence,
                    format_ts(&q.asked_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(storage_err)
}

/// Questions for a bot, most recent first.
pub async fn unanswered_for_bot(
    db: &Database,
    bot_id: &str,
) -> Result<Vec<UnansweredQuestion>, LoreError> {
    let bot_id = bot_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, bot_id, user_id, session_id, question, confidence, asked_at
                 FROM unanswered_questions WHERE bot_id = ?1 ORDER BY asked_at DESC",
            )?;
            let rows = stmt
                .query_map(params![bot_id], |row| {
                    let asked_at: String = row.get(6)?;
                    Ok(UnansweredQuestion {
                        id: row.get(0)?,
                        bot_id: row.get(1)?,
                        user_id: row.get(2)?,
                        session_id: row.get(3)?,
                        question: row.get(4)?,
                        confidence: row.get(5)?,
                        asked_at: parse_ts(6, &asked_at)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(storage_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn question(id: &str, text: &str, minutes_ago: i64) -> UnansweredQuestion {
        UnansweredQuestion {
            id: id.into(),
            bot_id: "bot".into(),
            user_id: "u1".into(),
            session_id: "s1".into(),
            question: text.into(),
            confidence: 0.2,
            asked_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn records_and_lists_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        record_unanswered(&db, &question("q1", "do you sell furniture", 10))
            .await
            .unwrap();
        record_unanswered(&db, &question("q2", "is there parking", 1))
            .await
            .unwrap();

        let rows = unanswered_for_bot(&db, "bot").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].question, "is there parking");
        assert_eq!(rows[1].confidence, 0.2);
        assert!(unanswered_for_bot(&db, "other").await.unwrap().is_empty());
    }
}
