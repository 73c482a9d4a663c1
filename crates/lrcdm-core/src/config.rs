use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default public LRCLIB instance.
pub const DEFAULT_LRCLIB_INSTANCE: &str = "https://lrclib.net";

/// Global configuration loaded from `~/.config/lrcdm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LrcdmConfig {
    /// Base URL of the LRCLIB instance to query.
    pub lrclib_instance: String,
    /// Skip tracks that already have lyrics (or are marked instrumental)
    /// when enqueueing from the library.
    pub skip_tracks_with_lyrics: bool,
    /// Connect timeout for API requests, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout for API requests, in seconds.
    pub request_timeout_secs: u64,
    /// Worker wake-up backstop interval in milliseconds. The worker is
    /// signal-driven; this only bounds how long a missed signal can stall it.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for LrcdmConfig {
    fn default() -> Self {
        Self {
            lrclib_instance: DEFAULT_LRCLIB_INSTANCE.to_string(),
            skip_tracks_with_lyrics: true,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lrcdm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LrcdmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LrcdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: LrcdmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
