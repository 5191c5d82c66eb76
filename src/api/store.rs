//! Implements the `RowStore` trait on top of a dynamically-dispatched `Sheet`.

use crate::api::{RowStore, Sheet};
use crate::error::Res;
use crate::model::{parse_rows, Columns, NewRecord, Record, HEADERS};
use anyhow::Context;
use std::collections::HashSet;
use tracing::{debug, trace};

pub(crate) struct SheetStore {
    sheet: Box<dyn Sheet + Send>,
    title: String,
    default_types: Vec<String>,
}

impl SheetStore {
    /// Create a store that keeps its records in the tab named `title` of `sheet`.
    pub(crate) fn new(
        sheet: Box<dyn Sheet + Send>,
        title: impl Into<String>,
        default_types: &[String],
    ) -> Self {
        Self {
            sheet,
            title: title.into(),
            default_types: default_types.to_vec(),
        }
    }

    async fn values(&mut self) -> Res<Vec<Vec<String>>> {
        self.sheet
            .get(&self.title)
            .await
            .with_context(|| format!("Unable to read the '{}' tab", self.title))
    }
}

#[async_trait::async_trait]
impl RowStore for SheetStore {
    async fn list_records(&mut self) -> Res<Vec<Record>> {
        let values = self.values().await?;
        let records = parse_rows(&values)
            .with_context(|| format!("The '{}' tab is not laid out as expected", self.title))?;
        trace!("Fetched {} records", records.len());
        Ok(records)
    }

    async fn append_record(&mut self, record: &NewRecord) -> Res<()> {
        let values = self.values().await?;
        let record = Record::from(record);

        // The header row places the columns. An empty tab gets one written first.
        let rows = match values.first() {
            None => vec![HEADERS.iter().map(|h| h.to_string()).collect(), record.to_row()],
            Some(header_row) => {
                let columns = Columns::new(header_row.as_slice()).with_context(|| {
                    format!("The '{}' tab is not laid out as expected", self.title)
                })?;
                vec![columns.row(&record)]
            }
        };

        debug!("Appending a record to the '{}' tab", self.title);
        self.sheet
            .append(&self.title, &rows)
            .await
            .context("Unable to append the record")
    }

    async fn list_distinct_types(&mut self) -> Res<Vec<String>> {
        let records = self.list_records().await?;
        let mut seen = HashSet::new();
        Ok(records
            .iter()
            .map(|record| record.r#type().to_string())
            .filter(|t| !t.is_empty())
            .chain(self.default_types.iter().cloned())
            .filter(|t| seen.insert(t.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    /// A `Sheet` with a single tab whose rows are shared with the test. `after_get` is pushed onto
    /// the tab right after a read, as if someone else had added a row in the meantime.
    #[derive(Clone, Default)]
    struct OneTab {
        values: Arc<Mutex<Vec<Vec<String>>>>,
        after_get: Arc<Mutex<Option<Vec<String>>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Sheet for OneTab {
        async fn get(&mut self, _sheet_name: &str) -> Res<Vec<Vec<String>>> {
            if self.fail {
                anyhow::bail!("connection reset");
            }
            let mut values = self.values.lock().unwrap();
            let snapshot = values.clone();
            if let Some(row) = self.after_get.lock().unwrap().take() {
                values.push(row);
            }
            Ok(snapshot)
        }

        async fn append(&mut self, _sheet_name: &str, rows: &[Vec<String>]) -> Res<()> {
            self.values.lock().unwrap().extend_from_slice(rows);
            Ok(())
        }
    }

    fn tab(rows: &[&[&str]]) -> OneTab {
        OneTab {
            values: Arc::new(Mutex::new(strings(rows))),
            ..Default::default()
        }
    }

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn store(sheet: &OneTab) -> SheetStore {
        let defaults = vec!["Food".to_string(), "Other".to_string()];
        SheetStore::new(Box::new(sheet.clone()), "Bills", &defaults)
    }

    fn new_record() -> NewRecord {
        NewRecord {
            date: "03/02/2024".parse().unwrap(),
            who: "Ana".into(),
            amount: crate::model::Money::from_str("7").unwrap(),
            r#type: "Food".into(),
            detail: "bread".into(),
        }
    }

    #[tokio::test]
    async fn test_list_records() {
        let sheet = tab(&[
            &["Date", "Who", "Amount", "Type", "Detail"],
            &["02/01/2024", "Ana", "$10.00", "Food", ""],
        ]);
        let records = store(&sheet).list_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount(), "$10.00");
    }

    #[tokio::test]
    async fn test_list_records_error() {
        let mut sheet = tab(&[]);
        sheet.fail = true;
        let err = store(&sheet).list_records().await.unwrap_err();
        assert!(format!("{err:#}").contains("connection reset"));
    }

    #[tokio::test]
    async fn test_append_to_empty_tab_writes_headers() {
        let sheet = tab(&[]);
        store(&sheet).append_record(&new_record()).await.unwrap();
        let values = sheet.values.lock().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], HEADERS.to_vec());
        assert_eq!(values[1], vec!["03/02/2024", "Ana", "$7.00", "Food", "bread"]);
    }

    #[tokio::test]
    async fn test_append_follows_header_order() {
        let sheet = tab(&[
            &["Who", "Date", "Amount", "Type", "Detail"],
            &["Ana", "02/01/2024", "$10.00", "Food", ""],
            &["Bo", "03/01/2024", "$1.00", "Home", ""],
        ]);
        store(&sheet).append_record(&new_record()).await.unwrap();
        let values = sheet.values.lock().unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values[3], vec!["Ana", "03/02/2024", "$7.00", "Food", "bread"]);
    }

    #[tokio::test]
    async fn test_append_keeps_rows_added_by_others() {
        let sheet = tab(&[&["Date", "Who", "Amount", "Type", "Detail"]]);
        let theirs = vec!["04/02/2024", "Bo", "$3.00", "Home", "bulbs"];
        *sheet.after_get.lock().unwrap() = Some(theirs.iter().map(|s| s.to_string()).collect());

        store(&sheet).append_record(&new_record()).await.unwrap();

        let values = sheet.values.lock().unwrap();
        assert_eq!(
            *values,
            strings(&[
                &["Date", "Who", "Amount", "Type", "Detail"],
                &["04/02/2024", "Bo", "$3.00", "Home", "bulbs"],
                &["03/02/2024", "Ana", "$7.00", "Food", "bread"],
            ])
        );
    }

    #[tokio::test]
    async fn test_list_distinct_types() {
        let sheet = tab(&[
            &["Date", "Who", "Amount", "Type", "Detail"],
            &["02/01/2024", "Ana", "$10.00", "Transport", ""],
            &["02/01/2024", "Ana", "$10.00", "Food", ""],
            &["02/01/2024", "Ana", "$10.00", "", ""],
            &["02/01/2024", "Ana", "$10.00", "Transport", ""],
        ]);
        let types = store(&sheet).list_distinct_types().await.unwrap();
        assert_eq!(types, vec!["Transport", "Food", "Other"]);
    }
}
