//! Update-time formatting for the station board.
//!
//! The feed's `mday` field is an opaque string. Depending on the feed
//! version it is RFC 3339, a naive `YYYY-MM-DD HH:MM:SS`, or the compact
//! `YYYYMMDDHHMMSS` form. Anything we can read is shown as
//! `YYYY/MM/DD HH:MM`; anything else is shown as [`UNKNOWN_TIME`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

/// Shown in place of an empty or unreadable update time.
pub const UNKNOWN_TIME: &str = "未知時間";

/// Taipei is UTC+08:00 all year round.
const TAIPEI_OFFSET_SECS: i32 = 8 * 60 * 60;

/// Naive layouts accepted, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Error returned when an update time cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid update time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// The offset update times are displayed in.
pub fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(TAIPEI_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parse an upstream update time into local wall-clock time.
///
/// Timestamps carrying an explicit offset are converted to `offset`;
/// naive timestamps are taken to already be local.
pub fn parse_update_time(s: &str, offset: FixedOffset) -> Result<NaiveDateTime, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeError::new("empty"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&offset).naive_local());
    }

    if let Some(dt) = parse_compact(s) {
        return Ok(dt);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| TimeError::new("unrecognised layout"))
}

/// Parse the compact `YYYYMMDDHHMMSS` layout used by the 1.0 feed.
fn parse_compact(s: &str) -> Option<NaiveDateTime> {
    if s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| s[range].parse::<u32>().ok();
    let year = s[0..4].parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?;
    let time = NaiveTime::from_hms_opt(field(8..10)?, field(10..12)?, field(12..14)?)?;
    Some(date.and_time(time))
}

/// Format an update time for display as `YYYY/MM/DD HH:MM` (24-hour).
///
/// # Examples
///
/// ```
/// use ubike_board::domain::{format_update_time, UNKNOWN_TIME};
///
/// assert_eq!(format_update_time("2024-01-02T03:04:00"), "2024/01/02 03:04");
/// assert_eq!(format_update_time(""), UNKNOWN_TIME);
/// ```
pub fn format_update_time(s: &str) -> String {
    format_update_time_in(s, display_offset())
}

/// Like [`format_update_time`], with an explicit display offset.
pub fn format_update_time_in(s: &str, offset: FixedOffset) -> String {
    match parse_update_time(s, offset) {
        Ok(dt) => dt.format("%Y/%m/%d %H:%M").to_string(),
        Err(_) => UNKNOWN_TIME.to_string(),
    }
}
