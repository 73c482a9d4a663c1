//! `lrcdm reset` – start over: wipe the saved download history and log.

use anyhow::Result;
use lrcdm_core::queue::HistoryStore;

pub async fn run_reset() -> Result<()> {
    let history = HistoryStore::open_default().await?;
    history.clear().await?;
    println!("Download history cleared.");
    Ok(())
}
