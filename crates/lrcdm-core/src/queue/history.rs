//! Durable download-history snapshot (SQLite via sqlx).
//!
//! A single JSON record under a fixed key: completed track ids, the bounded
//! log, and cumulative counters. Written through after every mutation;
//! reading tolerates a missing or corrupt record (best-effort history, never
//! a correctness requirement).

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

use super::log::LogEntry;
use crate::library::db::path_to_sqlite_uri;
use crate::library::TrackId;

/// Fixed key of the one history record.
const HISTORY_KEY: &str = "download-history";

/// The persisted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedHistory {
    pub completed_ids: Vec<TrackId>,
    pub log: Vec<LogEntry>,
    pub success_count: u64,
    pub failure_count: u64,
    /// ISO-8601 wall-clock time of the write.
    pub saved_at: DateTime<Utc>,
}

/// Handle to the SQLite-backed history store.
///
/// The database file is stored under the XDG state directory:
/// `~/.local/state/lrcdm/history.db`.
#[derive(Clone)]
pub struct HistoryStore {
    pool: Pool<Sqlite>,
}

impl HistoryStore {
    /// Open (or create) the default history database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("lrcdm")?;
        let state_dir = xdg_dirs.get_state_home().join("lrcdm");
        let db_path = state_dir.join("history.db");

        tokio::fs::create_dir_all(&state_dir).await?;

        let uri = path_to_sqlite_uri(&db_path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;

        let store = HistoryStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Open (or create) the store at a specific path. Creates parent dirs if
    /// needed. Intended for tests so the DB can live in a temp directory.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let store = HistoryStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        // Key-value layout; the record body is JSON for schema flexibility.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Write the snapshot, replacing any previous record.
    pub async fn save(&self, history: &SavedHistory) -> Result<()> {
        let value = serde_json::to_string(history)?;
        sqlx::query(
            r#"
            INSERT INTO history (key, value, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(HISTORY_KEY)
        .bind(value)
        .bind(history.saved_at.timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Read the snapshot back. A missing or corrupt record yields `None`
    /// (with a warning), never an error.
    pub async fn load(&self) -> Option<SavedHistory> {
        let row = match sqlx::query(r#"SELECT value FROM history WHERE key = ?1"#)
            .bind(HISTORY_KEY)
            .fetch_optional(&self.pool)
            .await
        {
            Ok(row) => row?,
            Err(e) => {
                tracing::warn!("history load failed: {}", e);
                return None;
            }
        };

        let value: String = row.get("value");
        match serde_json::from_str(&value) {
            Ok(history) => Some(history),
            Err(e) => {
                tracing::warn!("discarding corrupt history record: {}", e);
                None
            }
        }
    }

    /// Delete the record ("start over").
    pub async fn clear(&self) -> Result<()> {
        sqlx::query(r#"DELETE FROM history WHERE key = ?1"#)
            .bind(HISTORY_KEY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = HistoryStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) async fn put_raw(&self, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO history (key, value, saved_at)
            VALUES (?1, ?2, 0)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(HISTORY_KEY)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
