//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{StationRecord, format_update_time};
use crate::filter::{Column, FilterState, SortOrder};
use crate::session::BoardSnapshot;

/// Query parameters for the board page and the stations API.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Column key to sort by
    pub sort: Option<String>,

    /// Sort direction (defaults to ascending)
    pub order: Option<SortOrder>,

    /// 1-based page number (HTML board only)
    pub page: Option<usize>,
}

/// District selector form.
#[derive(Debug, Deserialize)]
pub struct DistrictForm {
    /// Empty clears the selection
    #[serde(default)]
    pub district: String,
}

/// Search form.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

/// JSON filter update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    /// `null` or `""` clears the district; absent leaves it alone
    #[serde(default, deserialize_with = "present")]
    pub district: Option<Option<String>>,

    /// New search text
    pub search: Option<String>,
}

/// Distinguish a field set to `null` from a missing one.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A column descriptor.
#[derive(Debug, Serialize)]
pub struct ColumnResult {
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
}

impl From<Column> for ColumnResult {
    fn from(column: Column) -> Self {
        Self {
            key: column.key(),
            title: column.title(),
            sortable: column.is_sortable(),
        }
    }
}

/// A station row.
#[derive(Debug, Serialize)]
pub struct StationResult {
    #[serde(flatten)]
    pub station: StationRecord,

    /// `updated_at` formatted for display
    pub updated_at_display: String,
}

impl From<StationRecord> for StationResult {
    fn from(station: StationRecord) -> Self {
        let updated_at_display = format_update_time(&station.updated_at);
        Self {
            station,
            updated_at_display,
        }
    }
}

/// Response for the stations API.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// Whether a fetch is in progress
    pub loading: bool,

    /// Pending user notice, if any (each notice is delivered once)
    pub notice: Option<String>,

    /// District selector options
    pub districts: Vec<String>,

    /// Current filter state
    pub filter: FilterState,

    /// Table columns
    pub columns: Vec<ColumnResult>,

    /// Visible rows, sorted as requested
    pub rows: Vec<StationResult>,
}

impl StationsResponse {
    pub fn from_snapshot(snapshot: BoardSnapshot, notice: Option<String>) -> Self {
        Self {
            loading: snapshot.loading,
            notice,
            districts: snapshot.districts,
            filter: snapshot.filter,
            columns: Column::ALL.into_iter().map(ColumnResult::from).collect(),
            rows: snapshot.rows.into_iter().map(StationResult::from).collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
