//! Board session: the owner of the dataset and filter state.
//!
//! A [`Session`] holds the last successfully fetched dataset, the user's
//! [`FilterState`], and the loading flag. The presentation layer reads
//! [`BoardSnapshot`]s from it and feeds selector events into it; the
//! [`Poller`] drives [`Session::refresh`] on a timer.
//!
//! Fetch completions are applied in the order they resolve, but a
//! completion is discarded if a newer request has already been applied.

mod poller;

#[cfg(test)]
mod session_tests;

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::domain::StationRecord;
use crate::feed::{FetchError, StationFeed};
use crate::filter::{FilterState, available_districts, compute_visible};

pub use poller::{Poller, PollerConfig, PollerHandle};

/// Capacity of the notification channel. Slow subscribers lose the oldest
/// notices rather than blocking fetches.
const NOTIFICATION_CAPACITY: usize = 16;

/// A transient, user-visible notice raised by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// A fetch failed; the previous data is still shown.
    FetchFailed,
}

impl Notification {
    /// Text to show the user.
    pub fn message(&self) -> &'static str {
        match self {
            Notification::FetchFailed => "無法取得 YouBike 資訊，請稍後再試。",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What a successful fetch did to the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The dataset was replaced with `count` stations.
    Applied { count: usize },
    /// A newer fetch had already been applied; this result was dropped.
    Superseded,
}

/// Everything the presentation layer needs to draw the board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    /// Visible rows, in dataset order.
    pub rows: Vec<StationRecord>,
    /// District selector options, in first-seen order.
    pub districts: Vec<String>,
    /// Current selector state.
    pub filter: FilterState,
    /// Whether a fetch is in flight or none has finished yet.
    pub loading: bool,
}

#[derive(Debug, Default)]
struct BoardState {
    dataset: Vec<StationRecord>,
    filter: FilterState,
    /// Sequence number of the fetch that produced `dataset` (0 = none).
    applied_seq: u64,
    /// Whether any fetch has finished, successfully or not.
    settled: bool,
}

/// Session-scoped board state.
pub struct Session<F> {
    feed: F,
    state: RwLock<BoardState>,
    next_seq: AtomicU64,
    in_flight: AtomicUsize,
    notices: broadcast::Sender<Notification>,
}

impl<F: StationFeed> Session<F> {
    /// Create a session with an empty dataset and no filters.
    pub fn new(feed: F) -> Self {
        let (notices, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            feed,
            state: RwLock::new(BoardState::default()),
            next_seq: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            notices,
        }
    }

    /// Subscribe to user-visible notices.
    ///
    /// Each failed fetch sends exactly one [`Notification::FetchFailed`].
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notices.subscribe()
    }

    /// Fetch once and apply the result.
    ///
    /// On failure the previous dataset is kept, one notification is sent,
    /// and the error is returned.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight::enter(&self.in_flight);

        let result = self.feed.fetch_stations().await;

        let mut state = self.state.write().await;
        state.settled = true;

        match result {
            Ok(stations) => {
                if seq < state.applied_seq {
                    debug!(seq, applied = state.applied_seq, "discarding superseded fetch");
                    return Ok(RefreshOutcome::Superseded);
                }

                let count = stations.len();
                let over_capacity = stations.iter().filter(|s| s.is_over_capacity()).count();
                if over_capacity > 0 {
                    debug!(over_capacity, "stations report more bikes and docks than capacity");
                }

                state.dataset = stations;
                state.applied_seq = seq;
                info!(count, seq, "station data refreshed");
                Ok(RefreshOutcome::Applied { count })
            }
            Err(e) => {
                warn!(error = %e, seq, "station fetch failed, keeping previous data");
                // No subscribers is fine.
                let _ = self.notices.send(Notification::FetchFailed);
                Err(e)
            }
        }
    }

    /// Select a district, or clear the selection with `None` / `""`.
    pub async fn set_district(&self, district: Option<String>) {
        let mut state = self.state.write().await;
        state.filter.set_district(district);
        debug!(district = ?state.filter.selected_district, "district filter changed");
    }

    /// Replace the name search text.
    pub async fn set_search_text(&self, text: impl Into<String>) {
        let mut state = self.state.write().await;
        state.filter.set_search_text(text);
        debug!(search = %state.filter.search_text, "search filter changed");
    }

    /// Current filter state.
    pub async fn filter(&self) -> FilterState {
        self.state.read().await.filter.clone()
    }

    /// The full dataset as last fetched.
    pub async fn dataset(&self) -> Vec<StationRecord> {
        self.state.read().await.dataset.clone()
    }

    /// Whether a fetch is in flight, or no fetch has finished yet.
    pub async fn is_loading(&self) -> bool {
        let settled = self.state.read().await.settled;
        !settled || self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Derive the current board.
    pub async fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.read().await;
        BoardSnapshot {
            rows: compute_visible(&state.dataset, &state.filter),
            districts: available_districts(&state.dataset),
            filter: state.filter.clone(),
            loading: !state.settled || self.in_flight.load(Ordering::SeqCst) > 0,
        }
    }
}

/// Counts a fetch as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
