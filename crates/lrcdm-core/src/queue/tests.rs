//! Behavioral tests for the queue facade and worker (scripted fake provider).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{sleep, timeout};

use super::history::HistoryStore;
use super::log::LogStatus;
use super::manager::{QueueEvent, QueueManager};
use super::store::RunState;
use crate::library::{Track, TrackId};
use crate::provider::{FetchError, LyricsProvider, ResolveError};

const TEST_POLL: Duration = Duration::from_millis(10);

fn track(id: TrackId) -> Track {
    Track {
        id,
        file_path: format!("/m/{id}.mp3"),
        file_name: format!("{id}.mp3"),
        title: format!("Track {id}"),
        album_name: "Album".to_string(),
        artist_name: "Artist".to_string(),
        duration_secs: 180.0,
        txt_lyrics: None,
        lrc_lyrics: None,
        instrumental: false,
    }
}

#[derive(Clone)]
enum Script {
    Ok(&'static str),
    FetchFail(&'static str),
    ResolveFail,
}

/// Scripted provider: every id succeeds unless overridden; fetches are
/// recorded (at call entry) and can be slowed down to widen race windows.
struct FakeProvider {
    scripts: HashMap<TrackId, Script>,
    fetch_delay: Duration,
    fetch_calls: Mutex<Vec<TrackId>>,
}

impl FakeProvider {
    fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            fetch_delay: Duration::ZERO,
            fetch_calls: Mutex::new(Vec::new()),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    fn script(mut self, id: TrackId, script: Script) -> Self {
        self.scripts.insert(id, script);
        self
    }

    fn fetched(&self) -> Vec<TrackId> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LyricsProvider for FakeProvider {
    async fn resolve(&self, id: TrackId) -> Result<Track, ResolveError> {
        match self.scripts.get(&id) {
            Some(Script::ResolveFail) => Err(ResolveError::NotFound(id)),
            _ => Ok(track(id)),
        }
    }

    async fn fetch(&self, track: &Track) -> Result<String, FetchError> {
        self.fetch_calls.lock().unwrap().push(track.id);
        if !self.fetch_delay.is_zero() {
            sleep(self.fetch_delay).await;
        }
        match self.scripts.get(&track.id) {
            Some(Script::FetchFail(msg)) => Err(FetchError::Network(msg.to_string())),
            Some(Script::Ok(msg)) => Ok(msg.to_string()),
            _ => Ok("downloaded synced lyrics".to_string()),
        }
    }
}

fn manager_with(provider: FakeProvider) -> (QueueManager, Arc<FakeProvider>) {
    let provider = Arc::new(provider);
    let manager = QueueManager::new(provider.clone(), None, TEST_POLL);
    (manager, provider)
}

/// Drain events until the QueueDrained notification arrives. A lagged
/// receiver just skips ahead; the drain event is always the newest.
async fn wait_for_drain(rx: &mut broadcast::Receiver<QueueEvent>) -> (u64, u64) {
    timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Ok(QueueEvent::QueueDrained {
                    success_count,
                    failure_count,
                }) => return (success_count, failure_count),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(e) => panic!("event channel closed: {e}"),
            }
        }
    })
    .await
    .expect("queue drained in time")
}

#[tokio::test]
async fn fifo_order_and_drain_notification() {
    let (manager, _provider) = manager_with(FakeProvider::new());
    let mut rx = manager.subscribe();

    assert_eq!(manager.enqueue(&[1, 2, 3]), 3);

    let mut completed_titles = Vec::new();
    let mut last_downloaded = 0;
    let (success, failure) = timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await.expect("event channel open") {
                QueueEvent::ItemCompleted(entry) => {
                    completed_titles.push(entry.title);
                    // Progress is monotone and never exceeds the total.
                    let snap = manager.snapshot();
                    assert!(snap.downloaded_count >= last_downloaded);
                    assert!(snap.downloaded_count <= snap.total_count);
                    last_downloaded = snap.downloaded_count;
                }
                QueueEvent::QueueDrained {
                    success_count,
                    failure_count,
                } => return (success_count, failure_count),
                QueueEvent::Stopped => {}
            }
        }
    })
    .await
    .expect("drained in time");

    assert_eq!(completed_titles, vec!["Track 1", "Track 2", "Track 3"]);
    assert_eq!((success, failure), (3, 0));

    let snap = manager.snapshot();
    assert_eq!(snap.run_state, RunState::Idle);
    assert_eq!(snap.pending_count, 0);
    assert_eq!(snap.downloaded_count, 3);
    assert_eq!(snap.total_count, 3);
    assert!((snap.progress - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn dedup_within_and_across_enqueues() {
    let (manager, provider) =
        manager_with(FakeProvider::new().with_delay(Duration::from_millis(30)));
    let mut rx = manager.subscribe();

    assert_eq!(manager.enqueue(&[1, 2, 2, 3]), 3);
    assert_eq!(manager.enqueue(&[2, 4]), 1);
    assert_eq!(manager.snapshot().total_count, 4);

    let (success, failure) = wait_for_drain(&mut rx).await;
    assert_eq!((success, failure), (4, 0));

    // Every id fetched exactly once, in enqueue order.
    assert_eq!(provider.fetched(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn pause_defers_fetching_until_resume() {
    let (manager, provider) = manager_with(FakeProvider::new());
    let mut rx = manager.subscribe();

    manager.pause();
    assert_eq!(manager.enqueue(&[5]), 1);

    // Well past several poll intervals: still nothing fetched.
    sleep(Duration::from_millis(100)).await;
    assert!(provider.fetched().is_empty());
    assert_eq!(manager.snapshot().run_state, RunState::Paused);
    assert_eq!(manager.snapshot().pending_count, 1);

    manager.resume();
    let (success, _) = wait_for_drain(&mut rx).await;
    assert_eq!(success, 1);
    assert_eq!(provider.fetched(), vec![5]);
}

#[tokio::test]
async fn stop_clears_queue_and_discards_in_flight_result() {
    let (manager, provider) =
        manager_with(FakeProvider::new().with_delay(Duration::from_millis(200)));
    let mut rx = manager.subscribe();

    assert_eq!(manager.enqueue(&[1, 2, 3]), 3);

    // Wait for the first fetch to be in flight.
    timeout(Duration::from_secs(5), async {
        while provider.fetched().is_empty() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("first fetch started");

    manager.stop().await;

    let snap = manager.snapshot();
    assert_eq!(snap.pending_count, 0);
    assert_eq!(snap.run_state, RunState::Idle);
    assert_eq!(snap.total_count, 0);
    assert_eq!(snap.downloaded_count, 0);
    assert!(snap.current.is_none());

    // Let the in-flight fetch finish; its result must be discarded.
    sleep(Duration::from_millis(300)).await;
    assert!(manager.log().is_empty());
    assert_eq!(manager.snapshot().downloaded_count, 0);
    // The only event is the stop notification; no completion ever surfaced.
    assert!(matches!(rx.try_recv(), Ok(QueueEvent::Stopped)));
    assert!(matches!(
        rx.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
    // Only the aborted run's first job ever reached the provider.
    assert_eq!(provider.fetched(), vec![1]);

    // The queue accepts fresh work after a stop.
    assert_eq!(manager.enqueue(&[7]), 1);
    let (success, failure) = wait_for_drain(&mut rx).await;
    assert_eq!((success, failure), (1, 0));
    assert_eq!(manager.log().len(), 1);
    assert_eq!(manager.log()[0].title, "Track 7");
}

#[tokio::test]
async fn fetch_failures_are_contained_and_counted() {
    let (manager, _provider) = manager_with(
        FakeProvider::new().script(2, Script::FetchFail("server exploded")),
    );
    let mut rx = manager.subscribe();

    manager.enqueue(&[1, 2, 3]);
    let (success, failure) = wait_for_drain(&mut rx).await;
    assert_eq!((success, failure), (2, 1));

    // Newest first: track 3 on top, the failure in the middle.
    let log = manager.log();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].title, "Track 3");
    assert_eq!(log[1].status, LogStatus::Failure);
    assert!(log[1].message.contains("server exploded"));
    assert_eq!(log[2].title, "Track 1");
}

#[tokio::test]
async fn resolution_failure_logged_without_fetch() {
    let (manager, provider) =
        manager_with(FakeProvider::new().script(99, Script::ResolveFail));
    let mut rx = manager.subscribe();

    manager.enqueue(&[1, 99, 2]);
    let (success, failure) = wait_for_drain(&mut rx).await;
    assert_eq!((success, failure), (2, 1));

    // 99 never reached the fetch stage and was not retried.
    assert_eq!(provider.fetched(), vec![1, 2]);

    let log = manager.log();
    let entry = log
        .iter()
        .find(|e| e.status == LogStatus::ResolutionFailure)
        .expect("resolution failure recorded");
    assert_eq!(entry.raw_id, Some(99));
}

#[tokio::test]
async fn re_enqueueing_completed_ids_is_a_noop() {
    let (manager, provider) = manager_with(FakeProvider::new());
    let mut rx = manager.subscribe();

    manager.enqueue(&[1]);
    wait_for_drain(&mut rx).await;

    assert_eq!(manager.enqueue(&[1]), 0);
    sleep(Duration::from_millis(50)).await;
    assert_eq!(provider.fetched(), vec![1]);
    let snap = manager.snapshot();
    assert_eq!(snap.total_count, 1);
    assert_eq!(snap.run_state, RunState::Idle);
}

#[tokio::test]
async fn throughput_reflects_successes_only() {
    // Two successes spaced by the fetch delay: a measurable rate.
    let (manager, _) = manager_with(FakeProvider::new().with_delay(Duration::from_millis(10)));
    let mut rx = manager.subscribe();
    manager.enqueue(&[1, 2]);
    wait_for_drain(&mut rx).await;
    assert!(manager.snapshot().throughput_per_min > 0.0);
    assert!(manager.snapshot().eta_secs.is_some());

    // One success and one failure: a single stats sample, rate unknown.
    let (manager, _) = manager_with(
        FakeProvider::new()
            .with_delay(Duration::from_millis(10))
            .script(2, Script::FetchFail("nope")),
    );
    let mut rx = manager.subscribe();
    manager.enqueue(&[1, 2]);
    wait_for_drain(&mut rx).await;
    assert_eq!(manager.snapshot().throughput_per_min, 0.0);
    assert!(manager.snapshot().eta_secs.is_none());
}

#[tokio::test]
async fn log_bounded_after_many_completions() {
    let (manager, _) = manager_with(FakeProvider::new());
    let mut rx = manager.subscribe();

    let ids: Vec<TrackId> = (1..=1001).collect();
    assert_eq!(manager.enqueue(&ids), 1001);
    let (success, _) = wait_for_drain(&mut rx).await;
    assert_eq!(success, 1001);

    let log = manager.log();
    assert_eq!(log.len(), 1000);
    // Newest first; the very first completion fell off the tail.
    assert_eq!(log[0].title, "Track 1001");
    assert!(log.iter().all(|e| e.title != "Track 1"));
}

#[tokio::test]
async fn history_roundtrip_across_managers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    let first_log = {
        let store = HistoryStore::open_at(&path).await.unwrap();
        let provider = Arc::new(FakeProvider::new().script(2, Script::FetchFail("nope")));
        let manager = QueueManager::new(provider, Some(store), TEST_POLL);
        let mut rx = manager.subscribe();
        manager.enqueue(&[1, 2]);
        wait_for_drain(&mut rx).await;
        manager.log()
    };

    // Fresh manager over the same store: identical log and counters.
    let store = HistoryStore::open_at(&path).await.unwrap();
    let provider = Arc::new(FakeProvider::new());
    let manager = QueueManager::new(provider.clone(), Some(store), TEST_POLL);
    manager.load_history().await;

    assert_eq!(manager.log(), first_log);
    let snap = manager.snapshot();
    assert_eq!(snap.success_count, 1);
    assert_eq!(snap.failure_count, 1);
    assert_eq!(snap.downloaded_count, 2);

    // Restored completions still dedup new enqueues.
    let mut rx = manager.subscribe();
    assert_eq!(manager.enqueue(&[1, 2, 3]), 1);
    wait_for_drain(&mut rx).await;
    assert_eq!(provider.fetched(), vec![3]);
}

#[tokio::test]
async fn reset_wipes_history_but_not_pending_queue() {
    let store = HistoryStore::open_memory().await.unwrap();
    let provider = Arc::new(FakeProvider::new());
    let manager = QueueManager::new(provider.clone(), Some(store.clone()), TEST_POLL);
    let mut rx = manager.subscribe();

    manager.enqueue(&[1, 2]);
    wait_for_drain(&mut rx).await;
    assert!(store.load().await.is_some());

    // Queue more work while paused so something is pending during reset.
    manager.pause();
    manager.enqueue(&[3, 4]);
    manager.reset().await;

    assert!(manager.log().is_empty());
    assert!(store.load().await.is_none());
    let snap = manager.snapshot();
    assert_eq!(snap.success_count, 0);
    assert_eq!(snap.downloaded_count, 0);
    assert_eq!(snap.pending_count, 2);
    assert_eq!(snap.total_count, 2);

    // The cleared history means old ids are downloadable again.
    manager.resume();
    let (success, _) = wait_for_drain(&mut rx).await;
    assert_eq!(success, 2);
    assert_eq!(manager.enqueue(&[1]), 1);
    let (success, _) = wait_for_drain(&mut rx).await;
    // Counters are cumulative since the reset: 3 and 4, then 1 again.
    assert_eq!(success, 3);
}
