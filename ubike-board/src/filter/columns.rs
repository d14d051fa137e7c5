//! Table column descriptors.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::{StationRecord, format_update_time};

/// A column of the station table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    District,
    Address,
    BikesAvailable,
    DocksAvailable,
    Capacity,
    UpdatedAt,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::Name,
        Column::District,
        Column::Address,
        Column::BikesAvailable,
        Column::DocksAvailable,
        Column::Capacity,
        Column::UpdatedAt,
    ];

    /// Stable key, used in query strings and JSON.
    pub fn key(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::District => "district",
            Column::Address => "address",
            Column::BikesAvailable => "bikes_available",
            Column::DocksAvailable => "docks_available",
            Column::Capacity => "capacity",
            Column::UpdatedAt => "updated_at",
        }
    }

    /// Look a column up by its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Header text.
    pub fn title(self) -> &'static str {
        match self {
            Column::Id => "站點編號",
            Column::Name => "站點名稱",
            Column::District => "行政區",
            Column::Address => "地址",
            Column::BikesAvailable => "可租借車輛數",
            Column::DocksAvailable => "可歸還空位數",
            Column::Capacity => "總車輛數",
            Column::UpdatedAt => "更新時間",
        }
    }

    /// Only the availability counts can be sorted.
    pub fn is_sortable(self) -> bool {
        matches!(self, Column::BikesAvailable | Column::DocksAvailable)
    }

    /// Display text for this column of `record`.
    pub fn cell(self, record: &StationRecord) -> String {
        match self {
            Column::Id => record.id.clone(),
            Column::Name => record.name.clone(),
            Column::District => record.district.clone(),
            Column::Address => record.address.clone(),
            Column::BikesAvailable => record.bikes_available.to_string(),
            Column::DocksAvailable => record.docks_available.to_string(),
            Column::Capacity => record.capacity.to_string(),
            Column::UpdatedAt => format_update_time(&record.updated_at),
        }
    }

    /// Numeric comparison for sortable columns; `None` otherwise.
    fn compare(self, a: &StationRecord, b: &StationRecord) -> Option<Ordering> {
        match self {
            Column::BikesAvailable => Some(a.bikes_available.cmp(&b.bikes_available)),
            Column::DocksAvailable => Some(a.docks_available.cmp(&b.docks_available)),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction, for header toggle links.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Stable-sort `rows` by `column`.
///
/// Unsortable columns leave the rows in their existing order. Ties keep
/// their existing relative order in both directions.
pub fn sort_rows(rows: &mut [StationRecord], column: Column, order: SortOrder) {
    if !column.is_sortable() {
        return;
    }

    rows.sort_by(|a, b| {
        let ord = column.compare(a, b).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}
