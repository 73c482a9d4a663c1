//! The single cooperative worker that drains the queue.
//!
//! One instance runs at a time. Each iteration re-checks the stop epoch and
//! the run state before touching the queue, so pause/stop signals take
//! effect at iteration boundaries; a fetch already in flight when stop
//! arrives has its result discarded rather than applied.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;

use super::log::{LogEntry, LogStatus};
use super::manager::{persist_history, ManagerInner, QueueEvent};
use super::store::RunState;
use crate::library::TrackId;

enum Step {
    /// Paused, or the queue is empty but more work is still expected.
    Wait,
    Process(TrackId),
    /// All enqueued work is done; emit the aggregate notification and leave.
    Finish {
        success_count: u64,
        failure_count: u64,
    },
}

fn stopped(inner: &ManagerInner, epoch: u64) -> bool {
    inner.stop_epoch.load(Ordering::SeqCst) != epoch
}

fn next_step(inner: &ManagerInner) -> Step {
    let mut st = inner.state.lock().unwrap();
    if st.run_state == RunState::Paused {
        return Step::Wait;
    }
    if let Some(id) = st.pop_next() {
        return Step::Process(id);
    }
    if st.total_count > 0 && st.downloaded_count() >= st.total_count {
        st.run_state = RunState::Idle;
        return Step::Finish {
            success_count: st.success_count,
            failure_count: st.failure_count,
        };
    }
    Step::Wait
}

pub(super) async fn run(inner: Arc<ManagerInner>, mut epoch: u64) {
    tracing::debug!("download worker started");
    loop {
        loop {
            if stopped(&inner, epoch) {
                tracing::debug!("download worker observed stop signal");
                break;
            }
            match next_step(&inner) {
                Step::Wait => {
                    // Signal-driven with a poll backstop: a missed notify
                    // costs one interval, never correctness.
                    let _ = tokio::time::timeout(inner.poll_interval, inner.wake.notified()).await;
                }
                Step::Process(id) => process_one(&inner, epoch, id).await,
                Step::Finish {
                    success_count,
                    failure_count,
                } => {
                    tracing::info!(
                        "download queue drained: {} succeeded, {} failed",
                        success_count,
                        failure_count
                    );
                    let _ = inner.events.send(QueueEvent::QueueDrained {
                        success_count,
                        failure_count,
                    });
                    break;
                }
            }
        }

        // Release the slot (no-op if a stop already retagged the run), then
        // re-check: work enqueued while we were winding down would otherwise
        // find no worker, since ensure_worker saw the slot as taken.
        let _ = inner.worker_slot.compare_exchange(
            epoch + 1,
            0,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        let epoch_now = inner.stop_epoch.load(Ordering::SeqCst);
        let runnable = {
            let mut st = inner.state.lock().unwrap();
            if st.has_pending() {
                if st.run_state == RunState::Idle {
                    st.run_state = RunState::Running;
                }
                true
            } else {
                false
            }
        };
        if runnable
            && inner
                .worker_slot
                .compare_exchange(0, epoch_now + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        {
            epoch = epoch_now;
            continue;
        }
        tracing::debug!("download worker exiting");
        return;
    }
}

/// Resolve and fetch one job, routing the outcome into log/stats/counters.
/// Every failure is contained here; only the stop signal ends the run.
async fn process_one(inner: &ManagerInner, epoch: u64, id: TrackId) {
    let track = match inner.provider.resolve(id).await {
        Ok(track) => track,
        Err(err) => {
            if stopped(inner, epoch) {
                return;
            }
            tracing::warn!("could not resolve track {}: {}", id, err);
            record_outcome(inner, id, LogEntry::resolution_failure(id, err.to_string())).await;
            return;
        }
    };
    if stopped(inner, epoch) {
        return;
    }
    {
        let mut st = inner.state.lock().unwrap();
        st.set_current(track.clone());
    }

    let result = inner.provider.fetch(&track).await;

    // Stop may have arrived mid-fetch; the state is already cleared, so the
    // late result must not reach log, stats, or counters.
    if stopped(inner, epoch) {
        tracing::debug!("discarding fetch result for {} after stop", track.title);
        return;
    }

    let entry = match result {
        Ok(message) => {
            inner.window.lock().unwrap().record(Utc::now());
            LogEntry::success(&track, message)
        }
        Err(err) => {
            tracing::warn!("lyrics fetch failed for {}: {}", track.title, err);
            LogEntry::failure(&track, err.to_string())
        }
    };
    record_outcome(inner, id, entry).await;
}

async fn record_outcome(inner: &ManagerInner, id: TrackId, entry: LogEntry) {
    {
        let mut st = inner.state.lock().unwrap();
        st.mark_completed(id, entry.status == LogStatus::Success);
    }
    inner.log.lock().unwrap().prepend(entry.clone());
    let _ = inner.events.send(QueueEvent::ItemCompleted(entry));
    persist_history(inner).await;
}
