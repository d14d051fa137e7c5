//! Conversion from raw feed JSON to [`StationRecord`]s.
//!
//! The feed is loosely typed: counts arrive as strings in some versions and
//! numbers in others, and fields go missing. Each field is read through its
//! own fallback so a bad value degrades that field only.

use serde_json::{Map, Value};
use tracing::trace;

use crate::domain::StationRecord;

use super::error::FetchError;

/// Upstream field names.
mod field {
    pub const ID: &str = "sno";
    pub const NAME: &str = "sna";
    pub const DISTRICT: &str = "sarea";
    pub const ADDRESS: &str = "ar";
    pub const BIKES: &str = "available_rent_bikes";
    pub const DOCKS: &str = "available_return_bikes";
    pub const CAPACITY: &str = "total";
    pub const UPDATED_AT: &str = "mday";
}

/// Convert a parsed feed document into station records, in upstream order.
///
/// Fails only if the document itself is not an array.
pub fn convert_feed(doc: &Value) -> Result<Vec<StationRecord>, FetchError> {
    let items = doc.as_array().ok_or_else(|| FetchError::Malformed {
        message: format!("expected a JSON array, got {}", kind(doc)),
    })?;

    Ok(items.iter().map(convert_station).collect())
}

/// Convert one feed item. Never fails.
pub fn convert_station(item: &Value) -> StationRecord {
    let empty = Map::new();
    let obj = item.as_object().unwrap_or_else(|| {
        trace!(kind = kind(item), "feed item is not an object");
        &empty
    });

    StationRecord {
        id: text_field(obj, field::ID),
        name: text_field(obj, field::NAME),
        district: text_field(obj, field::DISTRICT),
        address: text_field(obj, field::ADDRESS),
        bikes_available: count_field(obj, field::BIKES),
        docks_available: count_field(obj, field::DOCKS),
        capacity: count_field(obj, field::CAPACITY),
        updated_at: text_field(obj, field::UPDATED_AT),
    }
}

/// Read a string field. Numbers and booleans are rendered; anything else
/// (missing, null, nested) becomes the empty string.
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Read a count field, falling back to 0.
fn count_field(obj: &Map<String, Value>, key: &str) -> u32 {
    let value = obj.get(key).unwrap_or(&Value::Null);
    coerce_count(value).unwrap_or_else(|| {
        trace!(field = key, ?value, "count not numeric, using 0");
        0
    })
}

/// Numeric parse of a count: non-negative integers, numeric strings, and
/// non-negative finite floats (truncated).
fn coerce_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).ok()
            } else {
                n.as_f64().and_then(float_count)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_count))
        }
        _ => None,
    }
}

fn float_count(f: f64) -> Option<u32> {
    if f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX) {
        Some(f.trunc() as u32)
    } else {
        None
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
