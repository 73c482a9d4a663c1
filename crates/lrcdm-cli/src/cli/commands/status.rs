//! `lrcdm status` – library totals and the saved download-history summary.

use anyhow::Result;
use lrcdm_core::library::LibraryDb;
use lrcdm_core::queue::HistoryStore;

pub async fn run_status() -> Result<()> {
    let db = LibraryDb::open_default().await?;
    let counts = db.counts().await?;

    println!("Library");
    println!("  tracks:        {}", counts.total);
    println!("  synced lyrics: {}", counts.synced);
    println!("  plain lyrics:  {}", counts.plain);
    println!("  instrumental:  {}", counts.instrumental);
    println!("  missing:       {}", counts.missing);

    let history = HistoryStore::open_default().await?;
    match history.load().await {
        Some(saved) => {
            println!("Download history (saved {})", saved.saved_at.to_rfc3339());
            println!("  downloaded: {}", saved.completed_ids.len());
            println!("  succeeded:  {}", saved.success_count);
            println!("  failed:     {}", saved.failure_count);
            println!("  log lines:  {}", saved.log.len());
        }
        None => println!("No download history."),
    }
    Ok(())
}
