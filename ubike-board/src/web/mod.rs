//! Web layer for the station board.
//!
//! Serves the board as HTML and JSON, and turns form and JSON posts into
//! selector events on the session.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
