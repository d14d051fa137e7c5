//! YouBike station feed acquisition.
//!
//! Fetches the public immediate-availability document and normalizes each
//! item into a [`StationRecord`](crate::domain::StationRecord).
//!
//! Key characteristics of the feed:
//! - A bare JSON array, one object per station, in a stable upstream order
//! - Counts are sometimes numbers and sometimes numeric strings
//! - `mday` is the station's own update time, not the document's

mod client;
mod convert;
mod error;

pub use client::{DEFAULT_FEED_URL, FeedClient, FeedConfig, StationFeed};
pub use convert::{convert_feed, convert_station};
pub use error::FetchError;
