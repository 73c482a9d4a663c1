//! Control socket: server (during `lrcdm download`) and client (for
//! `lrcdm pause`/`resume`/`stop`).
//! Protocol: one command word per line: "pause", "resume", or "stop".

use anyhow::Result;
use lrcdm_core::queue::QueueManager;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

/// Default path for the control socket (same XDG state dir as the DBs).
pub fn default_control_socket_path() -> Result<PathBuf> {
    let dir = xdg::BaseDirectories::with_prefix("lrcdm")?.get_state_home();
    Ok(dir.join("lrcdm").join("control.sock"))
}

/// Spawns a task that listens on `path` and forwards each command line to
/// the queue facade. Ignores malformed lines.
pub fn spawn_control_listener(
    manager: Arc<QueueManager>,
    path: impl AsRef<Path>,
) -> Result<tokio::task::JoinHandle<()>> {
    let path = path.as_ref().to_path_buf();
    let handle = tokio::spawn(async move {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::remove_file(&path);
        let listener = match UnixListener::bind(&path) {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(path = %path.display(), "control socket bind: {}", e);
                return;
            }
        };
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let manager = Arc::clone(&manager);
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(stream).lines();
                        while let Ok(Some(line)) = reader.next_line().await {
                            match line.trim() {
                                "pause" => {
                                    tracing::info!("pause requested via control socket");
                                    manager.pause();
                                }
                                "resume" => {
                                    tracing::info!("resume requested via control socket");
                                    manager.resume();
                                }
                                "stop" => {
                                    tracing::info!("stop requested via control socket");
                                    manager.stop().await;
                                }
                                other => tracing::debug!("ignoring control command: {}", other),
                            }
                        }
                    });
                }
                Err(e) => tracing::debug!("control socket accept: {}", e),
            }
        }
    });
    Ok(handle)
}

/// Sends one command word to the control socket. Returns false when no
/// download session is listening.
pub async fn send_command(command: &str) -> Result<bool> {
    let path = default_control_socket_path()?;
    if !path.exists() {
        return Ok(false);
    }
    let mut stream = match tokio::net::UnixStream::connect(&path).await {
        Ok(s) => s,
        // Stale socket left by a dead session.
        Err(_) => return Ok(false),
    };
    tokio::io::AsyncWriteExt::write_all(&mut stream, format!("{command}\n").as_bytes()).await?;
    Ok(true)
}
