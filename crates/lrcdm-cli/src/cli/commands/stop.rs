//! `lrcdm stop` – stop the active download session and clear its queue.

use anyhow::Result;

use crate::cli::control_socket;

pub async fn run_stop() -> Result<()> {
    if control_socket::send_command("stop").await? {
        println!("Stopped the download session.");
    } else {
        println!("No active download session.");
    }
    Ok(())
}
