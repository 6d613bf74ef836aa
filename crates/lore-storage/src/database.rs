// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and schema.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use lore_core::LoreError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::schema::{SCHEMA, SCHEMA_VERSION};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Converts tokio_rusqlite errors into `LoreError::Storage`.
pub(crate) fn storage_err(e: tokio_rusqlite::Error) -> LoreError {
    LoreError::storage(e)
}

/// Handle to the Lore SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and applies the schema.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, LoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(LoreError::storage)?;
        }

        let conn = Connection::open(path).await.map_err(LoreError::storage)?;
        let db = Self { conn };
        db.initialize(wal_mode).await?;
        debug!(path = %path.display(), wal_mode, "database opened");
        Ok(db)
    }

    /// Opens a private in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, LoreError> {
        let conn = Connection::open_in_memory().await.map_err(LoreError::storage)?;
        let db = Self { conn };
        db.initialize(false).await?;
        Ok(db)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn initialize(&self, wal_mode: bool) -> Result<(), LoreError> {
        self.conn
            .call(move |conn| {
                if wal_mode {
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                        row.get::<_, String>(0)
                    })?;
                }
                conn.busy_timeout(BUSY_TIMEOUT)?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.execute_batch(SCHEMA)?;
                conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Runs `SELECT 1` to confirm the connection is alive.
    pub async fn ping(&self) -> Result<(), LoreError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Checkpoints the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), LoreError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }
}

/// Converts an f32 vector to little-endian bytes for BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Converts a BLOB back to an f32 vector. Trailing partial chunks are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Fixed-width UTC timestamps, so text ordering matches time ordering.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parses an RFC 3339 column value.
pub(crate) fn parse_ts(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lore.db");
        let db = Database::open(&path, true).await.unwrap();
        db.ping().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lore.db");
        Database::open(&path, true).await.unwrap();
        let db = Database::open(&path, true).await.unwrap();

        let version: i64 = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn blob_round_trip() {
        let original = vec![0.1_f32, -0.5, 1.0];
        let blob = vec_to_blob(&original);
        assert_eq!(blob.len(), 12);
        assert_eq!(blob_to_vec(&blob), original);
        assert!(blob_to_vec(&[]).is_empty());
    }

    #[test]
    fn timestamps_round_trip() {
        let now = Utc::now();
        assert_eq!(parse_ts(0, &format_ts(&now)).unwrap(), now);
        assert!(parse_ts(0, "yesterday").is_err());
        assert!(format_ts(&now).ends_with('Z'));
    }
}
