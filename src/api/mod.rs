//! Access to the spreadsheet that holds the expense log.
//!
//! `Sheet` is a very thin layer over the Google Sheets values API: it reads all of the values of
//! a tab and appends rows to a tab. `RowStore` is built on top of it and is what the rest of the
//! crate uses: it understands the five-column layout of the expense log.

mod files;
mod google_sheet;
mod store;
mod test_sheet;
mod token;

use crate::error::Res;
use crate::model::{NewRecord, Record};
use crate::Config;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub(crate) use store::SheetStore;
pub(crate) use test_sheet::TestSheet;
#[cfg(test)]
pub(crate) use test_sheet::TestSheetState;
pub(crate) use token::TokenProvider;

/// OAuth scopes that the token must have been granted.
const OAUTH_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

/// When this environment variable is set and non-empty, an in-memory sheet is used instead of
/// Google Sheets.
const TEST_MODE_ENV: &str = "EXPENSES_IN_TEST_MODE";

/// Whether we talk to Google or to an in-memory sheet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Google,
    Test,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// Reads and writes raw cell values of a spreadsheet.
#[async_trait::async_trait]
pub(crate) trait Sheet {
    /// Gets all of the values of the tab named `sheet_name`, row by row.
    async fn get(&mut self, sheet_name: &str) -> Res<Vec<Vec<String>>>;

    /// Appends `rows` after the last row of the tab named `sheet_name`. The position is chosen by
    /// the spreadsheet when the write happens, so rows added by others in the meantime are kept.
    async fn append(&mut self, sheet_name: &str, rows: &[Vec<String>]) -> Res<()>;
}

/// The operations on the expense log that the reports and the add command need.
#[async_trait::async_trait]
pub(crate) trait RowStore: Send {
    /// Fetches every record in the sheet. Nothing is cached, each call reads the sheet again.
    async fn list_records(&mut self) -> Res<Vec<Record>>;

    /// Appends one record after the last row of the sheet.
    async fn append_record(&mut self, record: &NewRecord) -> Res<()>;

    /// The types found in the sheet followed by the configured default types, without duplicates.
    async fn list_distinct_types(&mut self) -> Res<Vec<String>>;
}

/// Opens the expense log described by `config`.
///
/// Returns `None` when we have not been authenticated yet, i.e. there is no token file. Callers
/// should skip what they were going to do rather than fail.
pub(crate) async fn open_store(config: &Config, mode: Mode) -> Res<Option<Box<dyn RowStore>>> {
    let sheet: Box<dyn Sheet + Send> = match mode {
        Mode::Test => {
            debug!("Using the in-memory test sheet");
            Box::new(TestSheet::new(config.spreadsheet_id()))
        }
        Mode::Google => {
            let token_path = config.token_path();
            if !token_path.is_file() {
                info!(
                    "No OAuth token found at {}, the sheet cannot be opened",
                    token_path.display()
                );
                return Ok(None);
            }
            let token_provider =
                TokenProvider::load(config.client_secret_path(), token_path).await?;
            Box::new(google_sheet::GoogleSheet::new(config.spreadsheet_id(), token_provider).await?)
        }
    };
    Ok(Some(Box::new(SheetStore::new(
        sheet,
        config.sheet_title(),
        config.default_types(),
    ))))
}

/// Quotes a tab name for use in A1 notation, e.g. `'My Bills'`.
pub(crate) fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Bills"), "'Bills'");
        assert_eq!(quote_sheet_name("Ana's Bills"), "'Ana''s Bills'");
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Test.to_string(), "test");
        assert_eq!("google".parse::<Mode>().unwrap(), Mode::Google);
    }
}
