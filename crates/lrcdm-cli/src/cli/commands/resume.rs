//! `lrcdm resume` – resume a paused download session.

use anyhow::Result;

use crate::cli::control_socket;

pub async fn run_resume() -> Result<()> {
    if control_socket::send_command("resume").await? {
        println!("Resumed the download session.");
    } else {
        println!("No active download session.");
    }
    Ok(())
}
