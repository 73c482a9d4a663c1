//! Types used by the track library.

/// Track identifier (the queue's dedup key).
pub type TrackId = i64;

/// One track of the scanned library, with its current lyrics state.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub file_path: String,
    pub file_name: String,
    pub title: String,
    pub album_name: String,
    pub artist_name: String,
    /// Track length in seconds (LRCLIB matches on rounded duration).
    pub duration_secs: f64,
    pub txt_lyrics: Option<String>,
    pub lrc_lyrics: Option<String>,
    pub instrumental: bool,
}

impl Track {
    /// True if the track already has lyrics of any kind (or is marked
    /// instrumental) and does not need a download.
    pub fn has_lyrics(&self) -> bool {
        self.txt_lyrics.is_some() || self.lrc_lyrics.is_some() || self.instrumental
    }
}

/// Tag metadata for a file about to be inserted by the scanner.
#[derive(Debug, Clone)]
pub struct NewTrack {
    pub file_path: String,
    pub file_name: String,
    pub title: String,
    pub album_name: String,
    pub artist_name: String,
    pub duration_secs: f64,
}

/// Per-kind track counts shown by the CLI `status` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryCounts {
    pub total: i64,
    pub synced: i64,
    pub plain: i64,
    pub instrumental: i64,
    pub missing: i64,
}
