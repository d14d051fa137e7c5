//! Unit tests for the board session and poller.

use super::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

fn station(id: &str, name: &str, district: &str) -> StationRecord {
    StationRecord {
        id: id.to_string(),
        name: name.to_string(),
        district: district.to_string(),
        address: format!("{district} {id}號"),
        bikes_available: 3,
        docks_available: 7,
        capacity: 10,
        updated_at: "2024-01-02T03:04:00".to_string(),
    }
}

fn three_stations() -> Vec<StationRecord> {
    vec![
        station("1", "Central Park North", "A"),
        station("2", "Harbour Gate", "A"),
        station("3", "Riverside Park", "B"),
    ]
}

fn ids(rows: &[StationRecord]) -> Vec<&str> {
    rows.iter().map(|r| r.id.as_str()).collect()
}

fn malformed() -> FetchError {
    FetchError::Malformed {
        message: "expected a JSON array".to_string(),
    }
}

/// Feed that replays a script of results, then keeps failing.
struct ScriptedFeed {
    results: Mutex<VecDeque<Result<Vec<StationRecord>, FetchError>>>,
}

impl ScriptedFeed {
    fn new(results: Vec<Result<Vec<StationRecord>, FetchError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }
}

impl StationFeed for ScriptedFeed {
    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, FetchError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(malformed()))
    }
}

/// Feed whose calls each wait for a result sent through a gate.
struct GatedFeed {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<StationRecord>>>>,
}

impl StationFeed for GatedFeed {
    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, FetchError> {
        let gate = self.gates.lock().unwrap().pop_front().expect("no gate left");
        gate.await.map_err(|_| malformed())
    }
}

/// Feed that reports each call on a channel and always succeeds.
struct CountingFeed {
    calls: mpsc::UnboundedSender<()>,
}

impl StationFeed for CountingFeed {
    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, FetchError> {
        let _ = self.calls.send(());
        Ok(three_stations())
    }
}

/// Feed whose calls are reported on a channel and never complete.
struct StuckFeed {
    calls: mpsc::UnboundedSender<()>,
}

impl StationFeed for StuckFeed {
    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, FetchError> {
        let _ = self.calls.send(());
        std::future::pending().await
    }
}

#[tokio::test]
async fn new_session_is_empty_and_loading() {
    let session = Session::new(ScriptedFeed::new(vec![]));
    let snapshot = session.snapshot().await;

    assert!(snapshot.rows.is_empty());
    assert!(snapshot.districts.is_empty());
    assert!(snapshot.filter.is_empty());
    assert!(snapshot.loading);
}

#[tokio::test]
async fn refresh_replaces_dataset() {
    let session = Session::new(ScriptedFeed::new(vec![
        Ok(three_stations()),
        Ok(vec![station("9", "Only One", "C")]),
    ]));

    assert_eq!(
        session.refresh().await.unwrap(),
        RefreshOutcome::Applied { count: 3 }
    );
    assert_eq!(ids(&session.dataset().await), vec!["1", "2", "3"]);
    assert!(!session.is_loading().await);

    session.refresh().await.unwrap();
    // Stations missing from the new fetch are dropped.
    assert_eq!(ids(&session.dataset().await), vec!["9"]);
    assert_eq!(session.snapshot().await.districts, vec!["C"]);
}

#[tokio::test]
async fn failed_fetch_keeps_dataset_and_notifies_once() {
    let session = Session::new(ScriptedFeed::new(vec![Ok(three_stations()), Err(malformed())]));
    let mut notices = session.subscribe_notifications();

    session.refresh().await.unwrap();
    let before = session.dataset().await;

    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed { .. }));
    assert_eq!(session.dataset().await, before);

    assert_eq!(notices.try_recv().unwrap(), Notification::FetchFailed);
    assert!(matches!(
        notices.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn failed_first_fetch_stops_loading() {
    let session = Session::new(ScriptedFeed::new(vec![Err(malformed())]));
    assert!(session.refresh().await.is_err());

    let snapshot = session.snapshot().await;
    assert!(!snapshot.loading);
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn notification_message() {
    assert_eq!(
        Notification::FetchFailed.to_string(),
        "無法取得 YouBike 資訊，請稍後再試。"
    );
}

#[tokio::test]
async fn district_then_search_narrows() {
    let session = Session::new(ScriptedFeed::new(vec![Ok(three_stations())]));
    session.refresh().await.unwrap();

    session.set_district(Some("A".to_string())).await;
    assert_eq!(ids(&session.snapshot().await.rows), vec!["1", "2"]);

    session.set_search_text("PARK").await;
    assert_eq!(ids(&session.snapshot().await.rows), vec!["1"]);

    // Districts come from the whole dataset, not the visible rows.
    assert_eq!(session.snapshot().await.districts, vec!["A", "B"]);
}

#[tokio::test]
async fn filters_survive_refresh() {
    let session = Session::new(ScriptedFeed::new(vec![
        Ok(three_stations()),
        Ok(vec![
            station("4", "Park Lane", "B"),
            station("5", "Park Row", "A"),
        ]),
    ]));
    session.refresh().await.unwrap();
    session.set_district(Some("A".to_string())).await;

    session.refresh().await.unwrap();
    assert_eq!(
        session.filter().await.selected_district.as_deref(),
        Some("A")
    );
    assert_eq!(ids(&session.snapshot().await.rows), vec!["5"]);
}

#[tokio::test]
async fn superseded_completion_is_discarded() {
    let (tx_old, rx_old) = oneshot::channel();
    let (tx_new, rx_new) = oneshot::channel();
    let session = Session::new(GatedFeed {
        gates: Mutex::new(VecDeque::from([rx_old, rx_new])),
    });

    let (old, new, ()) = futures::join!(session.refresh(), session.refresh(), async {
        // The newer request resolves first.
        tx_new.send(vec![station("new", "Newer", "A")]).unwrap();
        tokio::task::yield_now().await;
        tx_old.send(vec![station("old", "Older", "A")]).unwrap();
    });

    assert_eq!(new.unwrap(), RefreshOutcome::Applied { count: 1 });
    assert_eq!(old.unwrap(), RefreshOutcome::Superseded);
    assert_eq!(ids(&session.dataset().await), vec!["new"]);
}

#[tokio::test]
async fn in_order_completions_both_apply() {
    let (tx_first, rx_first) = oneshot::channel();
    let (tx_second, rx_second) = oneshot::channel();
    let session = Session::new(GatedFeed {
        gates: Mutex::new(VecDeque::from([rx_first, rx_second])),
    });

    let (first, second, ()) = futures::join!(session.refresh(), session.refresh(), async {
        tx_first.send(vec![station("first", "First", "A")]).unwrap();
        tokio::task::yield_now().await;
        tx_second.send(vec![station("second", "Second", "A")]).unwrap();
    });

    assert_eq!(first.unwrap(), RefreshOutcome::Applied { count: 1 });
    assert_eq!(second.unwrap(), RefreshOutcome::Applied { count: 1 });
    assert_eq!(ids(&session.dataset().await), vec!["second"]);
}

#[tokio::test]
async fn loading_while_fetch_in_flight() {
    let (tx, rx) = oneshot::channel();
    let session = Arc::new(Session::new(GatedFeed {
        gates: Mutex::new(VecDeque::from([rx])),
    }));

    let task = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.refresh().await }
    });
    tokio::task::yield_now().await;
    assert!(session.is_loading().await);

    tx.send(three_stations()).unwrap();
    task.await.unwrap().unwrap();
    assert!(!session.is_loading().await);
}

#[tokio::test(start_paused = true)]
async fn poller_fetches_immediately_then_every_minute() {
    let (calls_tx, mut calls) = mpsc::unbounded_channel();
    let session = Arc::new(Session::new(CountingFeed { calls: calls_tx }));

    let start = tokio::time::Instant::now();
    let handle = Poller::start(Arc::clone(&session), PollerConfig::default());

    calls.recv().await.unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);

    calls.recv().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(60));

    calls.recv().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(120));

    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn hung_fetch_does_not_delay_next_tick() {
    let (calls_tx, mut calls) = mpsc::unbounded_channel();
    let session = Arc::new(Session::new(StuckFeed { calls: calls_tx }));

    let start = tokio::time::Instant::now();
    let handle = Poller::start(Arc::clone(&session), PollerConfig::default());

    calls.recv().await.unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);

    calls.recv().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(60));

    calls.recv().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(120));

    // Nothing has resolved, so the board is still waiting on data.
    assert!(session.is_loading().await);
    assert!(session.dataset().await.is_empty());

    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_polling() {
    let (calls_tx, mut calls) = mpsc::unbounded_channel();
    let session = Arc::new(Session::new(CountingFeed { calls: calls_tx }));

    let handle = Poller::start(Arc::clone(&session), PollerConfig::default());
    calls.recv().await.unwrap();
    drop(handle);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert!(calls.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn poller_keeps_going_after_failures() {
    let session = Arc::new(Session::new(ScriptedFeed::new(vec![
        Err(malformed()),
        Ok(three_stations()),
    ])));
    let mut notices = session.subscribe_notifications();

    let _handle = Poller::start(
        Arc::clone(&session),
        PollerConfig::default().with_interval(Duration::from_secs(5)),
    );

    assert_eq!(notices.recv().await.unwrap(), Notification::FetchFailed);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(ids(&session.dataset().await), vec!["1", "2", "3"]);
}

#[test]
fn default_poll_interval_is_one_minute() {
    assert_eq!(PollerConfig::default().interval, Duration::from_secs(60));
}
