//! Bounded, newest-first audit log of download outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::library::{Track, TrackId};

/// Maximum number of retained log entries; inserting past this evicts the oldest.
pub const LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Failure,
    /// Metadata resolution itself failed, before any fetch was attempted.
    ResolutionFailure,
}

/// One recorded outcome. Entries are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub status: LogStatus,
    pub title: String,
    pub artist_name: String,
    pub message: String,
    /// The raw queued id, kept when resolution failed and no metadata exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_id: Option<TrackId>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn success(track: &Track, message: impl Into<String>) -> Self {
        Self {
            status: LogStatus::Success,
            title: track.title.clone(),
            artist_name: track.artist_name.clone(),
            message: message.into(),
            raw_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(track: &Track, message: impl Into<String>) -> Self {
        Self {
            status: LogStatus::Failure,
            title: track.title.clone(),
            artist_name: track.artist_name.clone(),
            message: message.into(),
            raw_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn resolution_failure(id: TrackId, message: impl Into<String>) -> Self {
        Self {
            status: LogStatus::ResolutionFailure,
            title: format!("track #{}", id),
            artist_name: String::new(),
            message: message.into(),
            raw_id: Some(id),
            timestamp: Utc::now(),
        }
    }
}

/// Fixed-capacity log, newest first. No index structure; consumers iterate.
#[derive(Debug, Clone)]
pub struct BoundedLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for BoundedLog {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity,
        }
    }

    /// Insert at the head; evicts the tail entry when over capacity.
    pub fn prepend(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Owned snapshot, newest first (for persistence and the facade view).
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Replace the contents from a restored snapshot, enforcing the bound.
    pub fn restore(&mut self, entries: Vec<LogEntry>) {
        self.entries = entries.into_iter().take(self.capacity).collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> LogEntry {
        LogEntry {
            status: LogStatus::Success,
            title: format!("track {}", n),
            artist_name: "artist".to_string(),
            message: "ok".to_string(),
            raw_id: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn newest_first_order() {
        let mut log = BoundedLog::new();
        log.prepend(entry(1));
        log.prepend(entry(2));
        log.prepend(entry(3));
        let titles: Vec<&str> = log.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["track 3", "track 2", "track 1"]);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut log = BoundedLog::new();
        for n in 0..(LOG_CAPACITY + 1) {
            log.prepend(entry(n));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        // The very first entry fell off the tail; the newest survives at the head.
        let titles: Vec<&str> = log.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles[0], format!("track {}", LOG_CAPACITY));
        assert!(!titles.contains(&"track 0"));
    }

    #[test]
    fn restore_respects_capacity() {
        let mut log = BoundedLog::with_capacity(2);
        log.restore(vec![entry(1), entry(2), entry(3)]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().next().map(|e| e.title.as_str()), Some("track 1"));
    }
}
