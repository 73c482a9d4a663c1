//! `lrcdm scan <DIR>...` – index audio files into the track library.

use anyhow::Result;
use lrcdm_core::library::{scan, LibraryDb};

pub async fn run_scan(directories: &[String]) -> Result<()> {
    let db = LibraryDb::open_default().await?;
    let report = scan::scan_directories(&db, directories).await?;
    println!(
        "Indexed {} tracks ({} files skipped).",
        report.indexed, report.skipped
    );

    let counts = db.counts().await?;
    println!(
        "Library: {} tracks, {} missing lyrics.",
        counts.total, counts.missing
    );
    Ok(())
}
