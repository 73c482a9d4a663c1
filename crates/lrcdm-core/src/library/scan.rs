//! Directory scan: walk music folders and index audio files into the library.

use anyhow::Result;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use lofty::probe::Probe;
use std::path::Path;
use walkdir::WalkDir;

use super::db::LibraryDb;
use super::types::NewTrack;

/// File extensions considered audio tracks.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "flac", "ogg", "opus", "wav", "wv", "ape"];

/// Outcome of one scan pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanReport {
    /// Files indexed (inserted or refreshed).
    pub indexed: usize,
    /// Audio files skipped because tags were missing or unreadable.
    pub skipped: usize,
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read tag metadata for one audio file. Title and artist are required
/// (LRCLIB matches on them); album falls back to empty.
fn read_track_tags(path: &Path) -> Result<NewTrack> {
    let tagged = Probe::open(path)?.read()?;
    let duration_secs = tagged.properties().duration().as_secs_f64();
    let tag = tagged
        .primary_tag()
        .ok_or_else(|| anyhow::anyhow!("no tag found"))?;

    let title = tag
        .title()
        .map(|t| t.to_string())
        .ok_or_else(|| anyhow::anyhow!("no title tag"))?;
    let artist_name = tag
        .artist()
        .map(|a| a.to_string())
        .ok_or_else(|| anyhow::anyhow!("no artist tag"))?;
    let album_name = tag.album().map(|a| a.to_string()).unwrap_or_default();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(NewTrack {
        file_path: path.to_string_lossy().to_string(),
        file_name,
        title,
        album_name,
        artist_name,
        duration_secs,
    })
}

/// Walk `directories` recursively and index every readable audio file.
///
/// Tag reads run on the blocking pool; files without usable tags are
/// skipped with a warning rather than failing the scan.
pub async fn scan_directories(db: &LibraryDb, directories: &[String]) -> Result<ScanReport> {
    let mut report = ScanReport::default();

    for dir in directories {
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("scan: cannot read entry under {}: {}", dir, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_audio_file(entry.path()) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let tags = tokio::task::spawn_blocking(move || read_track_tags(&path)).await?;
            match tags {
                Ok(track) => {
                    db.add_track(&track).await?;
                    report.indexed += 1;
                }
                Err(e) => {
                    tracing::warn!("scan: skipping {}: {}", entry.path().display(), e);
                    report.skipped += 1;
                }
            }
        }
    }

    tracing::info!(
        "scan complete: {} indexed, {} skipped",
        report.indexed,
        report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_extension_filter() {
        assert!(is_audio_file(Path::new("/music/a.mp3")));
        assert!(is_audio_file(Path::new("/music/b.FLAC")));
        assert!(!is_audio_file(Path::new("/music/cover.jpg")));
        assert!(!is_audio_file(Path::new("/music/noext")));
    }
}
