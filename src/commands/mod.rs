//! Command handlers for the expenses CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod auth;
mod init;
mod report;

use crate::api::{open_store, RowStore};
use crate::error::{ErrorType, IntoResult};
use crate::model::Record;
use crate::{Config, Mode, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, trace};

pub use add::add;
pub use auth::auth_verify;
pub use init::init;
pub use report::{
    by_month, by_type, details, month_years, summary, total, types, years, Period,
};

/// The message given by commands that need the spreadsheet when there is no OAuth token yet.
const NOT_AUTHENTICATED: &str = "Not authenticated with Google yet, nothing was done. Place your \
    OAuth token at the configured token path and run 'expenses auth'.";

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Opens the spreadsheet. `None` means we are not authenticated yet and the caller should return
/// `NOT_AUTHENTICATED` instead of doing its work.
async fn open(config: &Config, mode: Mode) -> Result<Option<Box<dyn RowStore>>> {
    open_store(config, mode)
        .await
        .context("Unable to open the spreadsheet")
        .pub_result(ErrorType::Store)
}

/// Fetches every record of the expense log.
async fn fetch(store: &mut dyn RowStore) -> Result<Vec<Record>> {
    let records = store
        .list_records()
        .await
        .context("Unable to fetch the expenses")
        .pub_result(ErrorType::Store)?;
    trace!("Fetched {} records", records.len());
    Ok(records)
}
