//! `lrcdm search <QUERY>` – search the track library.

use anyhow::Result;
use lrcdm_core::library::LibraryDb;
use lrcdm_core::search::{search, SearchFilters};

pub async fn run_search(
    query: &str,
    synced: bool,
    plain: bool,
    instrumental: bool,
    missing: bool,
) -> Result<()> {
    // With no flags given, search everything.
    let filters = if synced || plain || instrumental || missing {
        SearchFilters {
            synced,
            plain,
            instrumental,
            missing,
        }
    } else {
        SearchFilters::default()
    };

    let db = LibraryDb::open_default().await?;
    let tracks = db.list_tracks().await?;
    let found = search(&tracks, query, &filters);

    if found.is_empty() {
        println!("No matching tracks.");
        return Ok(());
    }
    println!("{:<6} {:<12} {:<30} {}", "ID", "LYRICS", "ARTIST", "TITLE");
    for t in found {
        let state = if t.instrumental {
            "instrumental"
        } else if t.lrc_lyrics.is_some() {
            "synced"
        } else if t.txt_lyrics.is_some() {
            "plain"
        } else {
            "-"
        };
        println!("{:<6} {:<12} {:<30} {}", t.id, state, t.artist_name, t.title);
    }
    Ok(())
}
