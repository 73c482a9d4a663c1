//! Pending-queue state: ordered ids, dedup sets, counters, run state.
//!
//! All mutation happens under the facade's lock; this module is purely the
//! data structure plus its invariants (no ids duplicated between pending,
//! completed, and the in-flight job; downloaded never exceeds total).

use std::collections::{HashSet, VecDeque};

use crate::library::{Track, TrackId};

/// Externally observable state of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }
}

#[derive(Debug, Default)]
pub struct QueueState {
    pending: VecDeque<TrackId>,
    pending_set: HashSet<TrackId>,
    completed_ids: HashSet<TrackId>,
    current: Option<Track>,
    pub success_count: u64,
    pub failure_count: u64,
    pub total_count: u64,
    pub run_state: RunState,
}

impl Default for RunState {
    fn default() -> Self {
        RunState::Idle
    }
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append ids that are not already pending, completed, or in flight;
    /// preserves the given relative order. Returns how many were added and
    /// bumps `total_count` by that amount.
    pub fn enqueue(&mut self, ids: &[TrackId]) -> usize {
        let current_id = self.current.as_ref().map(|t| t.id);
        let mut added = 0;
        for &id in ids {
            if self.pending_set.contains(&id)
                || self.completed_ids.contains(&id)
                || current_id == Some(id)
            {
                continue;
            }
            self.pending.push_back(id);
            self.pending_set.insert(id);
            added += 1;
        }
        self.total_count += added as u64;
        added
    }

    /// Remove and return the head of the queue (FIFO, no priorities).
    pub fn pop_next(&mut self) -> Option<TrackId> {
        let id = self.pending.pop_front()?;
        self.pending_set.remove(&id);
        Some(id)
    }

    /// Record a finished job: the id joins the completed set, the in-flight
    /// slot is cleared if it was this job, and one counter is bumped.
    pub fn mark_completed(&mut self, id: TrackId, success: bool) {
        self.completed_ids.insert(id);
        if self.current.as_ref().map(|t| t.id) == Some(id) {
            self.current = None;
        }
        if success {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
    }

    pub fn set_current(&mut self, track: Track) {
        self.current = Some(track);
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Snapshot of the pending ids in processing order.
    pub fn pending_ids(&self) -> Vec<TrackId> {
        self.pending.iter().copied().collect()
    }

    pub fn completed_ids(&self) -> Vec<TrackId> {
        self.completed_ids.iter().copied().collect()
    }

    /// Jobs finished so far, success or failure.
    pub fn downloaded_count(&self) -> u64 {
        self.success_count + self.failure_count
    }

    /// Jobs still expected (enqueued but not finished).
    pub fn remaining_count(&self) -> u64 {
        self.total_count.saturating_sub(self.downloaded_count())
    }

    /// Full reset: queue, dedup sets, in-flight job, counters, run state.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.pending_set.clear();
        self.completed_ids.clear();
        self.current = None;
        self.success_count = 0;
        self.failure_count = 0;
        self.total_count = 0;
        self.run_state = RunState::Idle;
    }

    /// "Start over": wipe the run's history (completed set and counters)
    /// while leaving the pending queue and in-flight job untouched. Total is
    /// re-seeded to the still-outstanding work so progress accounting
    /// restarts coherently.
    pub fn clear_history(&mut self) {
        self.completed_ids.clear();
        self.success_count = 0;
        self.failure_count = 0;
        self.total_count = self.pending.len() as u64 + u64::from(self.current.is_some());
    }

    /// Seed state from a persisted history snapshot (process startup).
    pub fn restore_history(&mut self, completed_ids: Vec<TrackId>, success: u64, failure: u64) {
        self.completed_ids = completed_ids.into_iter().collect();
        self.success_count = success;
        self.failure_count = failure;
        // Restored completions count as already-done work.
        self.total_count = success + failure;
    }
}
