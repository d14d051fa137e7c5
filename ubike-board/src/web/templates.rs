//! Askama templates for the board page.

use askama::Template;

use crate::domain::StationRecord;
use crate::filter::{Column, SortOrder};
use crate::session::BoardSnapshot;

/// Rows per page on the HTML board.
pub const PAGE_SIZE: usize = 10;

/// Seconds between automatic page reloads, in step with the poller.
pub const REFRESH_SECS: u64 = 60;

/// The station board.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub loading: bool,
    pub notice: Option<String>,
    pub districts: Vec<DistrictOption>,
    pub search_text: String,
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<RowView>,
    pub total_rows: usize,
    pub pager: Pager,
    pub refresh_secs: u64,
    /// Reload target keeping the current sort and page
    pub refresh_link: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// An entry in the district selector.
#[derive(Debug, Clone)]
pub struct DistrictOption {
    pub name: String,
    pub selected: bool,
}

/// A table header cell.
#[derive(Debug, Clone)]
pub struct ColumnHeader {
    pub title: &'static str,
    /// Link that sorts by this column, for sortable columns
    pub sort_link: Option<String>,
    /// Arrow shown next to the active sort column
    pub indicator: &'static str,
}

/// A table row, keyed by station id.
#[derive(Debug, Clone)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
}

impl RowView {
    pub fn from_record(record: &StationRecord) -> Self {
        Self {
            id: record.id.clone(),
            cells: Column::ALL.iter().map(|c| c.cell(record)).collect(),
        }
    }
}

/// Page navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    /// 1-based current page
    pub page: usize,
    pub page_count: usize,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

/// The active sort, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub order: SortOrder,
}

impl SortSpec {
    fn query(&self) -> String {
        format!("sort={}&order={}", self.column.key(), self.order.as_str())
    }
}

/// Build a `/` link preserving the sort.
fn board_link(sort: Option<SortSpec>, page: usize) -> String {
    match sort {
        Some(s) => format!("/?{}&page={page}", s.query()),
        None => format!("/?page={page}"),
    }
}

impl BoardTemplate {
    /// Build the page from rows that are already filtered and sorted.
    pub fn new(
        snapshot: BoardSnapshot,
        notice: Option<String>,
        sort: Option<SortSpec>,
        page: usize,
    ) -> Self {
        let selected = snapshot.filter.selected_district.as_deref();
        let districts = snapshot
            .districts
            .iter()
            .map(|d| DistrictOption {
                name: d.clone(),
                selected: selected == Some(d.as_str()),
            })
            .collect();

        let headers = Column::ALL
            .into_iter()
            .map(|column| header(column, sort))
            .collect();

        let total_rows = snapshot.rows.len();
        let page_count = total_rows.div_ceil(PAGE_SIZE).max(1);
        let page = page.clamp(1, page_count);

        let rows = snapshot
            .rows
            .iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(RowView::from_record)
            .collect();

        let pager = Pager {
            page,
            page_count,
            prev_link: (page > 1).then(|| board_link(sort, page - 1)),
            next_link: (page < page_count).then(|| board_link(sort, page + 1)),
        };

        Self {
            loading: snapshot.loading,
            notice,
            districts,
            search_text: snapshot.filter.search_text,
            headers,
            rows,
            total_rows,
            pager,
            refresh_secs: REFRESH_SECS,
            refresh_link: board_link(sort, page),
        }
    }
}

fn header(column: Column, sort: Option<SortSpec>) -> ColumnHeader {
    if !column.is_sortable() {
        return ColumnHeader {
            title: column.title(),
            sort_link: None,
            indicator: "",
        };
    }

    let active = sort.filter(|s| s.column == column);
    // Clicking the active column flips it; any other column starts ascending.
    let next_order = active.map_or(SortOrder::Asc, |s| s.order.reversed());
    let link = SortSpec {
        column,
        order: next_order,
    };

    ColumnHeader {
        title: column.title(),
        sort_link: Some(format!("/?{}", link.query())),
        indicator: match active.map(|s| s.order) {
            Some(SortOrder::Asc) => "▲",
            Some(SortOrder::Desc) => "▼",
            None => "",
        },
    }
}
