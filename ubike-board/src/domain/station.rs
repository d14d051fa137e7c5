//! Station record type.

use serde::Serialize;

/// One bike dock station, as normalized from the upstream feed.
///
/// `id` is the identity key: it is stable across refreshes and is what the
/// presentation layer keys table rows on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRecord {
    /// Upstream station number (`sno`).
    pub id: String,

    /// Display name (`sna`). Target of the name search.
    pub name: String,

    /// Administrative district (`sarea`).
    pub district: String,

    /// Street address (`ar`).
    pub address: String,

    /// Bikes that can be rented right now.
    pub bikes_available: u32,

    /// Empty docks that bikes can be returned to.
    pub docks_available: u32,

    /// Total docks at the station.
    pub capacity: u32,

    /// Opaque upstream update time (`mday`), possibly empty.
    pub updated_at: String,
}

impl StationRecord {
    /// Whether the upstream counts add up to more than the station capacity.
    ///
    /// The feed does not guarantee `bikes + docks <= capacity`, so this is
    /// only ever reported, never enforced.
    pub fn is_over_capacity(&self) -> bool {
        u64::from(self.bikes_available) + u64::from(self.docks_available)
            > u64::from(self.capacity)
    }
}
