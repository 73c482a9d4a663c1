//! Facade over the download queue.
//!
//! One `QueueManager` is constructed per process and passed by reference to
//! whoever needs it; there is no ambient global state. All mutation goes
//! through `enqueue`/`pause`/`resume`/`stop`/`reset` or the worker it owns;
//! the presentation layer only reads snapshots and subscribes to events.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

use super::history::{HistoryStore, SavedHistory};
use super::log::{BoundedLog, LogEntry};
use super::stats::CompletionWindow;
use super::store::{QueueState, RunState};
use super::worker;
use crate::library::{Track, TrackId};
use crate::provider::LyricsProvider;

/// Outcome notifications emitted by the worker.
#[derive(Debug, Clone)]
pub enum QueueEvent {
    /// One job finished (either way); carries the log entry just recorded.
    ItemCompleted(LogEntry),
    /// The queue drained; aggregate tallies for the finished run.
    QueueDrained {
        success_count: u64,
        failure_count: u64,
    },
    /// The run was aborted via `stop()`.
    Stopped,
}

/// Point-in-time view of the queue for the presentation layer.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    pub run_state: RunState,
    pub pending_count: usize,
    pub downloaded_count: u64,
    pub total_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub current: Option<Track>,
    /// Successful completions per minute over the recent window.
    pub throughput_per_min: f64,
    /// Projected seconds remaining (None while the rate is unknown).
    pub eta_secs: Option<f64>,
    /// Fraction of enqueued work finished, in [0.0, 1.0].
    pub progress: f64,
}

pub(super) struct ManagerInner {
    pub(super) provider: Arc<dyn LyricsProvider>,
    pub(super) history: Option<HistoryStore>,
    pub(super) state: Mutex<QueueState>,
    pub(super) log: Mutex<BoundedLog>,
    pub(super) window: Mutex<CompletionWindow>,
    /// Wakes the worker on enqueue/resume/stop instead of pure polling.
    pub(super) wake: Notify,
    /// Bumped by `stop()`; a worker holding an older value terminates at the
    /// next iteration boundary and discards any in-flight fetch result.
    pub(super) stop_epoch: AtomicU64,
    /// Single-flight guard: 0 when free, else owner epoch + 1. Tagging the
    /// slot with the epoch keeps a dying stale worker from releasing (or
    /// blocking) the slot of its successor.
    pub(super) worker_slot: AtomicU64,
    pub(super) events: broadcast::Sender<QueueEvent>,
    pub(super) poll_interval: Duration,
}

pub struct QueueManager {
    inner: Arc<ManagerInner>,
}

impl QueueManager {
    /// `history` of `None` disables persistence (used by most tests).
    pub fn new(
        provider: Arc<dyn LyricsProvider>,
        history: Option<HistoryStore>,
        poll_interval: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(ManagerInner {
                provider,
                history,
                state: Mutex::new(QueueState::new()),
                log: Mutex::new(BoundedLog::new()),
                window: Mutex::new(CompletionWindow::new()),
                wake: Notify::new(),
                stop_epoch: AtomicU64::new(0),
                worker_slot: AtomicU64::new(0),
                events,
                poll_interval,
            }),
        }
    }

    /// Restore log, completed ids, and counters from the persisted history
    /// record, if any. Call once at startup, before the first enqueue.
    pub async fn load_history(&self) {
        let Some(store) = &self.inner.history else {
            return;
        };
        let Some(saved) = store.load().await else {
            return;
        };
        let completed = saved.completed_ids.len();
        {
            let mut st = self.inner.state.lock().unwrap();
            st.restore_history(saved.completed_ids, saved.success_count, saved.failure_count);
        }
        self.inner.log.lock().unwrap().restore(saved.log);
        tracing::info!("restored download history ({} completed tracks)", completed);
    }

    /// Add ids to the queue, skipping any already pending, completed, or in
    /// flight. Returns the number actually added; zero leaves every other
    /// piece of state untouched and does not start the worker.
    pub fn enqueue(&self, ids: &[TrackId]) -> usize {
        let (added, start_worker) = {
            let mut st = self.inner.state.lock().unwrap();
            let added = st.enqueue(ids);
            if added > 0 && st.run_state == RunState::Idle {
                st.run_state = RunState::Running;
            }
            // A paused queue accepts work but must not fetch until resume().
            (added, added > 0 && st.run_state == RunState::Running)
        };
        if added == 0 {
            return 0;
        }
        tracing::debug!("enqueued {} tracks", added);
        if start_worker {
            self.ensure_worker();
        }
        self.inner.wake.notify_waiters();
        added
    }

    /// Suspend processing after the current job. Takes effect at the next
    /// iteration boundary; an in-flight fetch still completes and records.
    pub fn pause(&self) {
        {
            let mut st = self.inner.state.lock().unwrap();
            st.run_state = RunState::Paused;
        }
        self.inner.wake.notify_waiters();
    }

    /// Resume a paused queue.
    pub fn resume(&self) {
        let start_worker = {
            let mut st = self.inner.state.lock().unwrap();
            if st.run_state != RunState::Paused {
                false
            } else if st.has_pending()
                || st.current().is_some()
                || self.inner.worker_slot.load(Ordering::SeqCst) != 0
            {
                st.run_state = RunState::Running;
                true
            } else {
                st.run_state = RunState::Idle;
                false
            }
        };
        if start_worker {
            self.ensure_worker();
        }
        self.inner.wake.notify_waiters();
    }

    /// Abort the run: the worker terminates at its next iteration boundary,
    /// any in-flight fetch result is discarded, and the pending queue,
    /// in-flight job, dedup set, and counters are cleared. The audit log
    /// survives (`reset` is what wipes it).
    pub async fn stop(&self) {
        self.inner.stop_epoch.fetch_add(1, Ordering::SeqCst);
        {
            let mut st = self.inner.state.lock().unwrap();
            st.reset();
        }
        self.inner.wake.notify_waiters();
        let _ = self.inner.events.send(QueueEvent::Stopped);
        tracing::info!("download queue stopped");
        persist_history(&self.inner).await;
    }

    /// "Start over": clear the log, stats window, completed-id history,
    /// counters, and the persisted record, while leaving the pending queue
    /// (and a running worker) alone.
    pub async fn reset(&self) {
        {
            let mut st = self.inner.state.lock().unwrap();
            st.clear_history();
        }
        self.inner.log.lock().unwrap().clear();
        self.inner.window.lock().unwrap().clear();
        if let Some(store) = &self.inner.history {
            if let Err(e) = store.clear().await {
                tracing::warn!("history clear failed: {}", e);
            }
        }
        tracing::info!("download history cleared");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let st = self.inner.state.lock().unwrap();
        let window = self.inner.window.lock().unwrap();
        let progress = if st.total_count == 0 {
            0.0
        } else {
            (st.downloaded_count() as f64 / st.total_count as f64).min(1.0)
        };
        QueueSnapshot {
            run_state: st.run_state,
            pending_count: st.pending_count(),
            downloaded_count: st.downloaded_count(),
            total_count: st.total_count,
            success_count: st.success_count,
            failure_count: st.failure_count,
            current: st.current().cloned(),
            throughput_per_min: window.throughput_per_min(),
            eta_secs: window.eta_secs(st.remaining_count()),
            progress,
        }
    }

    /// The audit log, newest first.
    pub fn log(&self) -> Vec<LogEntry> {
        self.inner.log.lock().unwrap().snapshot()
    }

    /// Spawn the worker task unless one is already active (starting the
    /// worker while it is running is a no-op). If a dying worker still holds
    /// the slot, its exit re-check picks up the new work instead.
    fn ensure_worker(&self) {
        let epoch = self.inner.stop_epoch.load(Ordering::SeqCst);
        if self
            .inner
            .worker_slot
            .compare_exchange(0, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            tokio::spawn(worker::run(Arc::clone(&self.inner), epoch));
        }
    }
}

/// Write the current history snapshot through to the store, best-effort.
pub(super) async fn persist_history(inner: &ManagerInner) {
    let Some(store) = &inner.history else {
        return;
    };
    let snapshot = {
        let st = inner.state.lock().unwrap();
        let log = inner.log.lock().unwrap();
        SavedHistory {
            completed_ids: st.completed_ids(),
            log: log.snapshot(),
            success_count: st.success_count,
            failure_count: st.failure_count,
            saved_at: Utc::now(),
        }
    };
    if let Err(e) = store.save(&snapshot).await {
        tracing::warn!("history save failed: {}", e);
    }
}
