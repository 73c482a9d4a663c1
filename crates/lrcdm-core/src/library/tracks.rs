//! Track query operations: insert, lookup, lyrics-state updates.

use anyhow::Result;
use sqlx::Row;

use super::db::{unix_timestamp, LibraryDb};
use super::types::{LibraryCounts, NewTrack, Track, TrackId};

fn track_from_row(row: &sqlx::sqlite::SqliteRow) -> Track {
    let instrumental: i64 = row.get("instrumental");
    Track {
        id: row.get("id"),
        file_path: row.get("file_path"),
        file_name: row.get("file_name"),
        title: row.get("title"),
        album_name: row.get("album_name"),
        artist_name: row.get("artist_name"),
        duration_secs: row.get("duration_secs"),
        txt_lyrics: row.get("txt_lyrics"),
        lrc_lyrics: row.get("lrc_lyrics"),
        instrumental: instrumental != 0,
    }
}

const TRACK_COLUMNS: &str = "id, file_path, file_name, title, album_name, artist_name, \
                             duration_secs, txt_lyrics, lrc_lyrics, instrumental";

impl LibraryDb {
    /// Insert a scanned track, or refresh its tag metadata if the file path
    /// is already known. Returns the track id either way.
    pub async fn add_track(&self, track: &NewTrack) -> Result<TrackId> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            INSERT INTO tracks (
                file_path, file_name, title, album_name, artist_name,
                duration_secs, txt_lyrics, lrc_lyrics, instrumental,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, 0, ?7, ?7)
            ON CONFLICT(file_path) DO UPDATE SET
                file_name = excluded.file_name,
                title = excluded.title,
                album_name = excluded.album_name,
                artist_name = excluded.artist_name,
                duration_secs = excluded.duration_secs,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&track.file_path)
        .bind(&track.file_name)
        .bind(&track.title)
        .bind(&track.album_name)
        .bind(&track.artist_name)
        .bind(track.duration_secs)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(r#"SELECT id FROM tracks WHERE file_path = ?1"#)
            .bind(&track.file_path)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("id"))
    }

    /// Fetch one track by id.
    pub async fn get_track(&self, id: TrackId) -> Result<Option<Track>> {
        let row = sqlx::query(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(track_from_row))
    }

    /// List every track, in scan order.
    pub async fn list_tracks(&self) -> Result<Vec<Track>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(track_from_row).collect())
    }

    /// List tracks with no lyrics of any kind and no instrumental marker,
    /// in scan order. These are the download candidates.
    pub async fn tracks_missing_lyrics(&self) -> Result<Vec<Track>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks \
             WHERE txt_lyrics IS NULL AND lrc_lyrics IS NULL AND instrumental = 0 \
             ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(track_from_row).collect())
    }

    /// Store synced lyrics (clears the plain body and instrumental marker).
    pub async fn set_synced_lyrics(&self, id: TrackId, lrc: &str, plain: &str) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE tracks
            SET lrc_lyrics = ?1, txt_lyrics = ?2, instrumental = 0, updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(lrc)
        .bind(plain)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Store plain lyrics only.
    pub async fn set_plain_lyrics(&self, id: TrackId, plain: &str) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE tracks
            SET txt_lyrics = ?1, lrc_lyrics = NULL, instrumental = 0, updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(plain)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Mark a track instrumental (no lyrics exist for it by design).
    pub async fn set_instrumental(&self, id: TrackId) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE tracks
            SET txt_lyrics = NULL, lrc_lyrics = ?1, instrumental = 1, updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind("[au: instrumental]")
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Per-kind counts for the `status` command.
    pub async fn counts(&self) -> Result<LibraryCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                SUM(CASE WHEN lrc_lyrics IS NOT NULL AND instrumental = 0 THEN 1 ELSE 0 END) AS synced,
                SUM(CASE WHEN lrc_lyrics IS NULL AND txt_lyrics IS NOT NULL THEN 1 ELSE 0 END) AS plain,
                SUM(CASE WHEN instrumental = 1 THEN 1 ELSE 0 END) AS instrumental,
                SUM(CASE WHEN txt_lyrics IS NULL AND lrc_lyrics IS NULL AND instrumental = 0 THEN 1 ELSE 0 END) AS missing
            FROM tracks
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(LibraryCounts {
            total: row.get("total"),
            synced: row.get::<Option<i64>, _>("synced").unwrap_or(0),
            plain: row.get::<Option<i64>, _>("plain").unwrap_or(0),
            instrumental: row.get::<Option<i64>, _>("instrumental").unwrap_or(0),
            missing: row.get::<Option<i64>, _>("missing").unwrap_or(0),
        })
    }
}
