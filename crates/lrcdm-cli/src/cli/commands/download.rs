//! `lrcdm download` – run the download queue to drain, printing outcomes.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use lrcdm_core::config::LrcdmConfig;
use lrcdm_core::library::{LibraryDb, TrackId};
use lrcdm_core::provider::lrclib::LrclibClient;
use lrcdm_core::provider::LibraryProvider;
use lrcdm_core::queue::{HistoryStore, LogStatus, QueueEvent, QueueManager};

use crate::cli::control_socket;

fn status_tag(status: LogStatus) -> &'static str {
    match status {
        LogStatus::Success => "ok",
        LogStatus::Failure => "failed",
        LogStatus::ResolutionFailure => "unresolved",
    }
}

fn format_eta(eta_secs: Option<f64>) -> String {
    match eta_secs {
        Some(secs) if secs.is_finite() => {
            let secs = secs.round() as u64;
            if secs >= 60 {
                format!("{}m{:02}s", secs / 60, secs % 60)
            } else {
                format!("{}s", secs)
            }
        }
        _ => "unknown".to_string(),
    }
}

pub async fn run_download(cfg: &LrcdmConfig, all: bool, tracks: Vec<TrackId>) -> Result<()> {
    let db = LibraryDb::open_default().await?;

    let candidates: Vec<TrackId> = if !tracks.is_empty() {
        tracks
    } else {
        let listed = if all || !cfg.skip_tracks_with_lyrics {
            db.list_tracks().await?
        } else {
            db.tracks_missing_lyrics().await?
        };
        listed.iter().map(|t| t.id).collect()
    };
    if candidates.is_empty() {
        println!("Nothing to download (library empty or fully fetched).");
        return Ok(());
    }

    let history = HistoryStore::open_default().await?;
    let client = LrclibClient::new(cfg);
    let provider = Arc::new(LibraryProvider::new(db.clone(), client));
    let manager = Arc::new(QueueManager::new(
        provider,
        Some(history),
        Duration::from_millis(cfg.poll_interval_ms),
    ));
    manager.load_history().await;

    let mut rx = manager.subscribe();
    let added = manager.enqueue(&candidates);
    println!("Queued {} of {} tracks.", added, candidates.len());
    if added == 0 {
        println!("Everything was already downloaded; `lrcdm reset` starts over.");
        return Ok(());
    }

    // Let `lrcdm pause/resume/stop` from other terminals steer this session.
    match control_socket::default_control_socket_path() {
        Ok(path) => {
            control_socket::spawn_control_listener(Arc::clone(&manager), &path)?;
        }
        Err(e) => tracing::warn!("control socket unavailable: {}", e),
    }

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(QueueEvent::ItemCompleted(entry)) => {
                    let snap = manager.snapshot();
                    println!(
                        "[{}] {} - {} ({}/{}, eta {})",
                        status_tag(entry.status),
                        entry.title,
                        entry.artist_name,
                        snap.downloaded_count,
                        snap.total_count,
                        format_eta(snap.eta_secs),
                    );
                    if entry.status != LogStatus::Success {
                        println!("        {}", entry.message);
                    }
                }
                Ok(QueueEvent::QueueDrained { success_count, failure_count }) => {
                    println!(
                        "Done: {} succeeded, {} failed.",
                        success_count, failure_count
                    );
                    break;
                }
                Ok(QueueEvent::Stopped) => {
                    println!("Download stopped.");
                    break;
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("event stream lagged by {} messages", n);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("Interrupted; stopping download.");
                manager.stop().await;
                break;
            }
        }
    }

    Ok(())
}
