//! CLI for the lrcdm lyrics download manager.

mod commands;
mod control_socket;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lrcdm_core::config;
use lrcdm_core::library::TrackId;

use commands::{
    run_download, run_lint, run_log, run_pause, run_reset, run_resume, run_scan, run_search,
    run_status, run_stop,
};

/// Top-level CLI for the lrcdm lyrics download manager.
#[derive(Debug, Parser)]
#[command(name = "lrcdm")]
#[command(about = "lrcdm: bulk lyrics downloader for local music libraries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan music directories into the track library.
    Scan {
        /// Directories to walk for audio files.
        #[arg(required = true)]
        directories: Vec<String>,
    },

    /// Download lyrics for library tracks (runs the queue to drain).
    Download {
        /// Queue every track, even ones that already have lyrics.
        #[arg(long)]
        all: bool,
        /// Queue specific track ids instead of the whole library.
        #[arg(long = "track", value_name = "ID")]
        tracks: Vec<TrackId>,
    },

    /// Show library totals and the last download-history summary.
    Status,

    /// Print the download log, newest first.
    Log {
        /// Maximum number of entries to print.
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },

    /// Pause an active download session.
    Pause,

    /// Resume a paused download session.
    Resume,

    /// Stop an active download session and clear its queue.
    Stop,

    /// Start over: wipe the saved download history and log.
    Reset,

    /// Lint a `.lrc` or `.txt` lyrics file.
    Lint {
        /// Path to the lyrics file.
        path: String,
    },

    /// Search the track library.
    Search {
        /// Query words (all must match title/artist/album).
        query: String,
        /// Only tracks with synced lyrics.
        #[arg(long)]
        synced: bool,
        /// Only tracks with plain lyrics.
        #[arg(long)]
        plain: bool,
        /// Only instrumental tracks.
        #[arg(long)]
        instrumental: bool,
        /// Only tracks without lyrics.
        #[arg(long)]
        missing: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scan { directories } => run_scan(&directories).await?,
            CliCommand::Download { all, tracks } => run_download(&cfg, all, tracks).await?,
            CliCommand::Status => run_status().await?,
            CliCommand::Log { limit } => run_log(limit).await?,
            CliCommand::Pause => run_pause().await?,
            CliCommand::Resume => run_resume().await?,
            CliCommand::Stop => run_stop().await?,
            CliCommand::Reset => run_reset().await?,
            CliCommand::Lint { path } => run_lint(&path)?,
            CliCommand::Search {
                query,
                synced,
                plain,
                instrumental,
                missing,
            } => run_search(&query, synced, plain, instrumental, missing).await?,
        }

        Ok(())
    }
}
