//! `lrcdm log` – print the saved download log, newest first.

use anyhow::Result;
use lrcdm_core::queue::{HistoryStore, LogStatus};

pub async fn run_log(limit: usize) -> Result<()> {
    let history = HistoryStore::open_default().await?;
    let Some(saved) = history.load().await else {
        println!("No download history.");
        return Ok(());
    };
    if saved.log.is_empty() {
        println!("Download log is empty.");
        return Ok(());
    }

    for entry in saved.log.iter().take(limit) {
        let tag = match entry.status {
            LogStatus::Success => "ok        ",
            LogStatus::Failure => "failed    ",
            LogStatus::ResolutionFailure => "unresolved",
        };
        println!(
            "{} {} {} - {}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            tag,
            entry.title,
            entry.artist_name,
            entry.message
        );
    }
    if saved.log.len() > limit {
        println!("... {} more entries", saved.log.len() - limit);
    }
    Ok(())
}
