//! Application state for the web layer.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::feed::StationFeed;
use crate::session::{Notification, Session};

/// Shared application state.
pub struct AppState<F> {
    /// The board session
    pub session: Arc<Session<F>>,

    /// Notices waiting to be shown
    notices: Arc<Mutex<broadcast::Receiver<Notification>>>,
}

impl<F: StationFeed> AppState<F> {
    /// Create a new app state over a session.
    pub fn new(session: Arc<Session<F>>) -> Self {
        let notices = session.subscribe_notifications();
        Self {
            session,
            notices: Arc::new(Mutex::new(notices)),
        }
    }

    /// Take the most recent pending notice, if any.
    ///
    /// Notices are transient: once taken they are not shown again.
    pub fn take_notice(&self) -> Option<Notification> {
        let Ok(mut rx) = self.notices.lock() else {
            return None;
        };

        let mut latest = None;
        loop {
            match rx.try_recv() {
                Ok(notice) => latest = Some(notice),
                // Missed notices were all fetch failures; still show one.
                Err(TryRecvError::Lagged(_)) => latest = Some(Notification::FetchFailed),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        latest
    }
}

// Manual impl: `F` itself need not be `Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            notices: Arc::clone(&self.notices),
        }
    }
}
