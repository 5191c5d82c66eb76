use crate::error::Res;
use crate::model::{DateStamp, FormatError, Money};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub(crate) const DATE: &str = "Date";
pub(crate) const WHO: &str = "Who";
pub(crate) const AMOUNT: &str = "Amount";
pub(crate) const TYPE: &str = "Type";
pub(crate) const DETAIL: &str = "Detail";

/// The header row of the sheet, in the order we write it.
pub const HEADERS: [&str; 5] = [DATE, WHO, AMOUNT, TYPE, DETAIL];

/// One row of the sheet.
///
/// The sheet is edited by hand as well as by this program, so the date and amount are kept as the
/// text found in the cell. Use `date_stamp` and `money` to get typed values.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub(crate) date: String,
    pub(crate) who: String,
    pub(crate) amount: String,
    pub(crate) r#type: String,
    pub(crate) detail: String,
}

impl Record {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn who(&self) -> &str {
        &self.who
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn r#type(&self) -> &str {
        &self.r#type
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn date_stamp(&self) -> Result<DateStamp, FormatError> {
        DateStamp::from_str(&self.date)
    }

    pub fn money(&self) -> Result<Money, FormatError> {
        Money::from_str(&self.amount)
    }

    /// The cells of this record in `HEADERS` order.
    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.who.clone(),
            self.amount.clone(),
            self.r#type.clone(),
            self.detail.clone(),
        ]
    }
}

/// A record that is about to be appended to the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub date: DateStamp,
    pub who: String,
    pub amount: Money,
    pub r#type: String,
    pub detail: String,
}

impl From<&NewRecord> for Record {
    fn from(value: &NewRecord) -> Self {
        Record {
            date: value.date.to_string(),
            who: value.who.clone(),
            amount: value.amount.to_string(),
            r#type: value.r#type.clone(),
            detail: value.detail.clone(),
        }
    }
}

/// Locates the five columns in the header row of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Columns {
    date: usize,
    who: usize,
    amount: usize,
    r#type: usize,
    detail: usize,
    len: usize,
}

impl Columns {
    pub(crate) fn new<S: AsRef<str>>(header_row: &[S]) -> Res<Self> {
        let headers: Vec<&str> = header_row.iter().map(|h| h.as_ref().trim()).collect();
        let find = |name: &str| -> Res<usize> {
            let mut found = headers
                .iter()
                .enumerate()
                .filter(|(_, &h)| h == name)
                .map(|(ix, _)| ix);
            let ix = found
                .next()
                .with_context(|| format!("The header '{name}' is missing from the sheet"))?;
            if found.next().is_some() {
                bail!("The header '{name}' appears more than once in the sheet");
            }
            Ok(ix)
        };
        Ok(Self {
            date: find(DATE)?,
            who: find(WHO)?,
            amount: find(AMOUNT)?,
            r#type: find(TYPE)?,
            detail: find(DETAIL)?,
            len: header_row.len(),
        })
    }

    /// The number of columns in the header row.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn record(&self, row: &[String]) -> Record {
        let cell = |ix: usize| row.get(ix).map(|s| s.trim().to_string()).unwrap_or_default();
        Record {
            date: cell(self.date),
            who: cell(self.who),
            amount: cell(self.amount),
            r#type: cell(self.r#type),
            detail: cell(self.detail),
        }
    }

    /// Lays out `record` as a row in this sheet's column order.
    pub(crate) fn row(&self, record: &Record) -> Vec<String> {
        let mut row = vec![String::new(); self.len];
        row[self.date] = record.date.clone();
        row[self.who] = record.who.clone();
        row[self.amount] = record.amount.clone();
        row[self.r#type] = record.r#type.clone();
        row[self.detail] = record.detail.clone();
        row
    }
}

/// Parses the values of a sheet, header row first, into records. Blank rows are skipped.
pub(crate) fn parse_rows(rows: &[Vec<String>]) -> Res<Vec<Record>> {
    let Some((header_row, data)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let columns = Columns::new(header_row.as_slice())?;
    Ok(data
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| columns.record(row))
        .collect())
}
