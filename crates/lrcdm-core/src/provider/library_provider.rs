//! Production provider: resolve from the track library, fetch from LRCLIB,
//! write lyrics sidecar files, and keep the library's lyrics state current.

use async_trait::async_trait;

use super::lrclib::{LrclibClient, LyricsResponse};
use super::{FetchError, LyricsProvider, ResolveError};
use crate::library::{LibraryDb, Track, TrackId};
use crate::lyrics;

pub struct LibraryProvider {
    db: LibraryDb,
    client: LrclibClient,
}

impl LibraryProvider {
    pub fn new(db: LibraryDb, client: LrclibClient) -> Self {
        Self { db, client }
    }

    async fn apply(&self, track: &Track, response: LyricsResponse) -> Result<String, FetchError> {
        match response {
            LyricsResponse::Synced { synced, plain } => {
                lyrics::save_synced_lyrics(&track.file_path, &synced)
                    .map_err(|e| FetchError::Storage(e.to_string()))?;
                self.db
                    .set_synced_lyrics(track.id, &synced, &plain)
                    .await
                    .map_err(|e| FetchError::Storage(e.to_string()))?;
                Ok("downloaded synced lyrics".to_string())
            }
            LyricsResponse::Plain(plain) => {
                lyrics::save_plain_lyrics(&track.file_path, &plain)
                    .map_err(|e| FetchError::Storage(e.to_string()))?;
                self.db
                    .set_plain_lyrics(track.id, &plain)
                    .await
                    .map_err(|e| FetchError::Storage(e.to_string()))?;
                Ok("downloaded plain lyrics".to_string())
            }
            LyricsResponse::Instrumental => {
                lyrics::save_instrumental(&track.file_path)
                    .map_err(|e| FetchError::Storage(e.to_string()))?;
                self.db
                    .set_instrumental(track.id)
                    .await
                    .map_err(|e| FetchError::Storage(e.to_string()))?;
                Ok("marked as instrumental".to_string())
            }
            LyricsResponse::None => Err(FetchError::NotFound),
        }
    }
}

#[async_trait]
impl LyricsProvider for LibraryProvider {
    async fn resolve(&self, id: TrackId) -> Result<Track, ResolveError> {
        match self.db.get_track(id).await {
            Ok(Some(track)) => Ok(track),
            Ok(None) => Err(ResolveError::NotFound(id)),
            Err(e) => Err(ResolveError::Storage(e.to_string())),
        }
    }

    async fn fetch(&self, track: &Track) -> Result<String, FetchError> {
        let response = self
            .client
            .get_lyrics(
                &track.title,
                &track.album_name,
                &track.artist_name,
                track.duration_secs,
            )
            .await?;
        self.apply(track, response).await
    }
}
