//! The lyrics-provider seam consumed by the download queue.
//!
//! The worker loop only sees this trait: resolve a track id to its
//! metadata, then fetch lyrics for it. The production implementation
//! (`LibraryProvider`) resolves from the local track library and fetches
//! from an LRCLIB instance; tests substitute scripted fakes.

mod library_provider;
pub mod lrclib;

pub use library_provider::LibraryProvider;

use async_trait::async_trait;
use thiserror::Error;

use crate::library::{Track, TrackId};

/// Track metadata could not be obtained; the job is counted as failed and
/// never retried.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("track {0} does not exist in the library")]
    NotFound(TrackId),
    #[error("library lookup failed: {0}")]
    Storage(String),
}

/// A fetch was attempted but failed; the message is what ends up in the log.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("this track does not exist in the LRCLIB database")]
    NotFound,
    /// Structured error body returned by the API (400/500/503).
    #[error("{error}: {message}")]
    Api { error: String, message: String },
    #[error("request failed: {0}")]
    Network(String),
    #[error("could not save lyrics: {0}")]
    Storage(String),
}

/// External collaborator of the worker loop.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Resolve a queued id to full track metadata, just before processing.
    async fn resolve(&self, id: TrackId) -> Result<Track, ResolveError>;

    /// Download and apply lyrics for a resolved track. Returns the
    /// human-readable outcome message recorded in the log.
    async fn fetch(&self, track: &Track) -> Result<String, FetchError>;
}
