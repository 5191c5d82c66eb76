//! Implements the very simple `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::Sheet;
use crate::error::Res;
use crate::model::HEADERS;
use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{LazyLock, Mutex};

/// The name of the tab that the seed data is loaded into.
const SEED_TAB: &str = "Bills";

/// The data of every test spreadsheet that has been opened in this process, keyed by spreadsheet
/// ID. This lets separate commands in the same test see each other's writes.
static SPREADSHEETS: LazyLock<Mutex<HashMap<String, TestSheetState>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// The tabs of a test spreadsheet. The map key is the tab name and the value is its rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TestSheetState {
    pub(crate) tabs: HashMap<String, Vec<Vec<String>>>,
}

impl TestSheetState {
    /// Loads the seed data from this module.
    pub(crate) fn seeded() -> Res<Self> {
        let mut tabs = HashMap::new();
        tabs.insert(SEED_TAB.to_string(), load_csv(SEED_DATA)?);
        Ok(Self { tabs })
    }
}

/// An implementation of the `Sheet` trait that does not use Google sheets. The first time a
/// spreadsheet ID is used, its data is seeded with some existing expenses.
pub(crate) struct TestSheet {
    spreadsheet_id: String,
}

impl TestSheet {
    pub(crate) fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut TestSheetState) -> Res<T>) -> Res<T> {
        let mut spreadsheets = SPREADSHEETS
            .lock()
            .map_err(|_| anyhow!("The test spreadsheet lock is poisoned"))?;
        let state = match spreadsheets.entry(self.spreadsheet_id.clone()) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => e.insert(TestSheetState::seeded()?),
        };
        f(state)
    }

    #[cfg(test)]
    pub(crate) fn get_state(&self) -> TestSheetState {
        self.with_state(|state| Ok(state.clone())).unwrap()
    }

    #[cfg(test)]
    pub(crate) fn set_state(&self, state: TestSheetState) {
        SPREADSHEETS
            .lock()
            .unwrap()
            .insert(self.spreadsheet_id.clone(), state);
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self, sheet_name: &str) -> Res<Vec<Vec<String>>> {
        self.with_state(|state| {
            state
                .tabs
                .get(sheet_name)
                .with_context(|| format!("Sheet '{sheet_name}' not found"))
                .cloned()
        })
    }

    async fn append(&mut self, sheet_name: &str, rows: &[Vec<String>]) -> Res<()> {
        self.with_state(|state| {
            state
                .tabs
                .get_mut(sheet_name)
                .with_context(|| format!("Sheet '{sheet_name}' not found"))?
                .extend_from_slice(rows);
            Ok(())
        })
    }
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Res<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed expense data. The header row must match `HEADERS`.
const SEED_DATA: &str = r##"Date,Who,Amount,Type,Detail
03/01/2025,Ana,$42.10,Food,Groceries
05/01/2025,Bo,$12.00,Transport,Bus pass top-up
17/01/2025,Ana,$80.00,Home,Electricity
28/01/2025,Bo,$9.90,Leisure,Cinema
02/02/2025,Ana,$55.35,Food,Groceries
14/02/2025,Bo,$35.00,Leisure,Dinner out
20/02/2025,Ana,$120.00,Health,Dentist
01/03/2025,Bo,$18.40,Food,Bakery
09/03/2025,Ana,$12.00,Transport,Bus pass top-up
09/03/2025,Ana,$7.25,Pets,Cat food
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_data_headers() {
        let state = TestSheetState::seeded().unwrap();
        let rows = state.tabs.get(SEED_TAB).unwrap();
        assert_eq!(rows[0], HEADERS.to_vec());
        assert_eq!(rows.len(), 11);
    }

    #[tokio::test]
    async fn test_append_then_get() {
        let id = "test_sheet_append_then_get";
        let mut sheet = TestSheet::new(id);
        let before = sheet.get(SEED_TAB).await.unwrap();
        let row = vec!["10/03/2025".to_string(), "Bo".to_string()];
        sheet.append(SEED_TAB, &[row.clone()]).await.unwrap();

        let after = TestSheet::new(id).get(SEED_TAB).await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[before.len()], row);
        assert!(sheet.append("Nope", &[row]).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_tab() {
        let mut sheet = TestSheet::new("test_sheet_missing_tab");
        assert!(sheet.get("Nope").await.is_err());
    }
}
