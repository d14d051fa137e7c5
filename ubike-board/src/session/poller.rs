//! Periodic refresh of a session.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::feed::StationFeed;

use super::Session;

/// How often the feed is polled (60 seconds).
const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between fetches. The first fetch happens immediately.
    pub interval: Duration,
}

impl PollerConfig {
    /// Set a custom interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Drives [`Session::refresh`] on a fixed interval.
pub struct Poller;

impl Poller {
    /// Start polling: one fetch now, then one per interval, until the
    /// returned handle is shut down or dropped.
    ///
    /// Each fetch runs as its own task, so a slow fetch never delays the
    /// next tick. Fetches already in flight when the poller stops are left
    /// to finish.
    pub fn start<F: StationFeed>(session: Arc<Session<F>>, config: PollerConfig) -> PollerHandle {
        info!(interval_secs = config.interval.as_secs(), "starting station poller");

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let session = Arc::clone(&session);
                tokio::spawn(async move {
                    // Failures are logged and surfaced by the session itself.
                    let _ = session.refresh().await;
                });
            }
        });

        PollerHandle { task }
    }
}

/// Owns the repeating task. Dropping it stops polling.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling.
    pub fn shutdown(self) {
        // Drop does the work.
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        debug!("stopping station poller");
        self.task.abort();
    }
}
