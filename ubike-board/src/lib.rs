//! YouBike station board.
//!
//! Polls the Taipei YouBike immediate-availability feed and serves it as a
//! filterable, sortable table.

pub mod domain;
pub mod feed;
pub mod filter;
pub mod session;
pub mod web;
