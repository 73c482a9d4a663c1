//! `lrcdm pause` – pause the active download session.

use anyhow::Result;

use crate::cli::control_socket;

pub async fn run_pause() -> Result<()> {
    if control_socket::send_command("pause").await? {
        println!("Paused the download session.");
    } else {
        println!("No active download session.");
    }
    Ok(())
}
