//! Domain types for the station board.
//!
//! Station records as the rest of the crate sees them, after the feed's
//! loosely typed fields have been normalized.

mod station;
mod time;

pub use station::StationRecord;
pub use time::{
    TimeError, UNKNOWN_TIME, display_offset, format_update_time, format_update_time_in,
    parse_update_time,
};
