//! Moving-average throughput and time-remaining projection.
//!
//! Keeps the last few successful-completion timestamps; consumers read
//! completions-per-minute and an ETA for the remaining queue. Failed jobs
//! never enter the window, so the rate reflects real downloads only.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Number of completion timestamps retained (oldest evicted first).
pub const WINDOW_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct CompletionWindow {
    timestamps: VecDeque<DateTime<Utc>>,
    capacity: usize,
}

impl Default for CompletionWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionWindow {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one successful completion.
    pub fn record(&mut self, at: DateTime<Utc>) {
        self.timestamps.push_back(at);
        if self.timestamps.len() > self.capacity {
            self.timestamps.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn clear(&mut self) {
        self.timestamps.clear();
    }

    /// Completions per minute over the window span (0 with fewer than two
    /// data points, or a zero-width span).
    pub fn throughput_per_min(&self) -> f64 {
        let (Some(oldest), Some(newest)) = (self.timestamps.front(), self.timestamps.back())
        else {
            return 0.0;
        };
        if self.timestamps.len() < 2 {
            return 0.0;
        }
        let span_mins = (*newest - *oldest).num_milliseconds() as f64 / 60_000.0;
        if span_mins <= 0.0 {
            return 0.0;
        }
        (self.timestamps.len() - 1) as f64 / span_mins
    }

    /// Estimated seconds until `remaining` more completions (None when the
    /// throughput is unknown).
    pub fn eta_secs(&self, remaining: u64) -> Option<f64> {
        let rate = self.throughput_per_min();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate * 60.0)
    }
}
