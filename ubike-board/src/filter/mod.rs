//! Client-side filtering of the station dataset.
//!
//! The visible rows are a pure function of the dataset and the current
//! [`FilterState`]: district first, then name search, both conjunctive.
//! Nothing here is cached; callers recompute whenever either input changes.

pub mod columns;

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::StationRecord;

pub use columns::{Column, SortOrder, sort_rows};

/// The user's current selector state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Only show stations in this district. `None` shows all districts.
    pub selected_district: Option<String>,

    /// Only show stations whose name contains this text, ignoring case.
    /// Empty shows all names.
    pub search_text: String,
}

impl FilterState {
    /// Replace the district selection.
    ///
    /// An empty district is the selector's "clear" action and is stored
    /// as `None`.
    pub fn set_district(&mut self, district: Option<String>) {
        self.selected_district = district.filter(|d| !d.is_empty());
    }

    /// Replace the search text.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        self.selected_district.is_none() && self.search_text.is_empty()
    }

    fn matches_district(&self, record: &StationRecord) -> bool {
        self.selected_district
            .as_deref()
            .is_none_or(|d| record.district == d)
    }
}

/// `needle` must already be lowercased.
fn name_contains(name: &str, needle: &str) -> bool {
    needle.is_empty() || name.to_lowercase().contains(needle)
}

/// Derive the visible rows from the dataset and filter state.
///
/// The result is an order-preserving subsequence of `dataset`.
pub fn compute_visible(dataset: &[StationRecord], filter: &FilterState) -> Vec<StationRecord> {
    let needle = filter.search_text.to_lowercase();

    dataset
        .iter()
        .filter(|r| filter.matches_district(r))
        .filter(|r| name_contains(&r.name, &needle))
        .cloned()
        .collect()
}

/// Every distinct district in the dataset, in first-seen order.
pub fn available_districts(dataset: &[StationRecord]) -> Vec<String> {
    let mut seen = HashSet::new();

    dataset
        .iter()
        .filter(|r| seen.insert(r.district.as_str()))
        .map(|r| r.district.clone())
        .collect()
}
