//! Writing fetched lyrics next to the audio files.
//!
//! A track owns at most one sidecar: `song.lrc` for synced lyrics or
//! `song.txt` for plain ones; saving one kind removes the other. Tracks
//! with no real lyrics get an `[au: instrumental]` marker in the `.lrc`.

use anyhow::Result;
use std::fs::{remove_file, write};
use std::path::{Path, PathBuf};

/// Marker content written for instrumental tracks.
pub const INSTRUMENTAL_MARKER: &str = "[au: instrumental]";

fn sidecar_path(track_path: &str, extension: &str) -> Result<PathBuf> {
    let path = Path::new(track_path);
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("track path has no parent: {}", track_path))?;
    let stem = path
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("track path has no file stem: {}", track_path))?;
    Ok(parent.join(format!("{}.{}", stem.to_string_lossy(), extension)))
}

pub fn build_txt_path(track_path: &str) -> Result<PathBuf> {
    sidecar_path(track_path, "txt")
}

pub fn build_lrc_path(track_path: &str) -> Result<PathBuf> {
    sidecar_path(track_path, "lrc")
}

/// Save plain lyrics as `.txt`, removing any `.lrc`. Empty lyrics remove both.
pub fn save_plain_lyrics(track_path: &str, lyrics: &str) -> Result<()> {
    let txt_path = build_txt_path(track_path)?;
    let lrc_path = build_lrc_path(track_path)?;

    let _ = remove_file(lrc_path);

    if lyrics.is_empty() {
        let _ = remove_file(txt_path);
    } else {
        write(txt_path, lyrics)?;
    }
    Ok(())
}

/// Save synced lyrics as `.lrc`, removing any `.txt`. Empty lyrics remove the `.lrc`.
pub fn save_synced_lyrics(track_path: &str, lyrics: &str) -> Result<()> {
    let txt_path = build_txt_path(track_path)?;
    let lrc_path = build_lrc_path(track_path)?;

    if lyrics.is_empty() {
        let _ = remove_file(lrc_path);
    } else {
        let _ = remove_file(txt_path);
        write(lrc_path, lyrics)?;
    }
    Ok(())
}

/// Mark a track instrumental: both sidecars removed, marker written as `.lrc`.
pub fn save_instrumental(track_path: &str) -> Result<()> {
    let txt_path = build_txt_path(track_path)?;
    let lrc_path = build_lrc_path(track_path)?;

    let _ = remove_file(&lrc_path);
    let _ = remove_file(txt_path);

    write(lrc_path, INSTRUMENTAL_MARKER)?;

    Ok(())
}

/// Strip leading `[..]` time/metadata tags from every line of a synced body,
/// yielding the plain-text rendition.
pub fn strip_timestamps(synced_lyrics: &str) -> String {
    let mut out = String::with_capacity(synced_lyrics.len());
    for (i, line) in synced_lyrics.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(strip_timestamp_line(line));
    }
    out
}

fn strip_timestamp_line(line: &str) -> &str {
    if !line.starts_with('[') {
        return line;
    }
    match line.find(']') {
        Some(end) => line[end + 1..].trim_start_matches(' '),
        None => line,
    }
}
