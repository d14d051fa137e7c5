//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::feed::StationFeed;
use crate::filter::{Column, sort_rows};
use crate::session::BoardSnapshot;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router<F: StationFeed>(state: AppState<F>) -> Router {
    Router::new()
        .route("/", get(board_page::<F>))
        .route("/health", get(health))
        .route("/api/stations", get(list_stations::<F>))
        .route("/api/filter", post(update_filter::<F>))
        .route("/filter/district", post(select_district::<F>))
        .route("/filter/search", post(search::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Resolve the requested sort, rejecting unknown or unsortable columns.
fn parse_sort(query: &BoardQuery) -> Result<Option<SortSpec>, AppError> {
    let Some(key) = query.sort.as_deref().filter(|k| !k.is_empty()) else {
        return Ok(None);
    };

    let column = Column::from_key(key).ok_or_else(|| AppError::BadRequest {
        message: format!("Unknown column: {key}"),
    })?;

    if !column.is_sortable() {
        return Err(AppError::BadRequest {
            message: format!("Column is not sortable: {key}"),
        });
    }

    Ok(Some(SortSpec {
        column,
        order: query.order.unwrap_or_default(),
    }))
}

/// Take a snapshot and apply the requested sort to its rows.
async fn sorted_snapshot<F: StationFeed>(
    state: &AppState<F>,
    sort: Option<SortSpec>,
) -> BoardSnapshot {
    let mut snapshot = state.session.snapshot().await;
    if let Some(sort) = sort {
        sort_rows(&mut snapshot.rows, sort.column, sort.order);
    }
    snapshot
}

fn notice_text<F: StationFeed>(state: &AppState<F>) -> Option<String> {
    state.take_notice().map(|n| n.message().to_string())
}

/// The station board.
async fn board_page<F: StationFeed>(
    State(state): State<AppState<F>>,
    Query(query): Query<BoardQuery>,
) -> Result<Response, AppError> {
    let sort = parse_sort(&query)?;
    let snapshot = sorted_snapshot(&state, sort).await;

    let template = BoardTemplate::new(
        snapshot,
        notice_text(&state),
        sort,
        query.page.unwrap_or(1),
    );
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(Html(html).into_response())
}

/// Visible stations as JSON.
async fn list_stations<F: StationFeed>(
    State(state): State<AppState<F>>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<StationsResponse>, AppError> {
    let sort = parse_sort(&query)?;
    let snapshot = sorted_snapshot(&state, sort).await;

    Ok(Json(StationsResponse::from_snapshot(
        snapshot,
        notice_text(&state),
    )))
}

/// Apply a JSON filter update and return the new board.
async fn update_filter<F: StationFeed>(
    State(state): State<AppState<F>>,
    Json(req): Json<FilterRequest>,
) -> Json<StationsResponse> {
    if let Some(district) = req.district {
        state.session.set_district(district).await;
    }
    if let Some(search) = req.search {
        state.session.set_search_text(search).await;
    }

    let snapshot = state.session.snapshot().await;
    Json(StationsResponse::from_snapshot(snapshot, notice_text(&state)))
}

/// District selector form.
async fn select_district<F: StationFeed>(
    State(state): State<AppState<F>>,
    Form(form): Form<DistrictForm>,
) -> Redirect {
    state.session.set_district(Some(form.district)).await;
    Redirect::to("/")
}

/// Search form.
async fn search<F: StationFeed>(
    State(state): State<AppState<F>>,
    Form(form): Form<SearchForm>,
) -> Redirect {
    state.session.set_search_text(form.q).await;
    Redirect::to("/")
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application errors.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
