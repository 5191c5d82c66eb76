//! Logs personal expenses to a Google sheet and reports on them.
//!
//! The sheet is the only store. Every report fetches all of its rows and aggregates them in
//! memory, see the `report` module.

mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod report;
mod utils;

pub use api::Mode;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
