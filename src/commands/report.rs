//! Commands that fetch the expense log and report on it.
//!
//! Each command opens the spreadsheet, fetches every record once and runs one query from
//! `crate::report`. Nothing is cached between commands.

use crate::commands::{fetch, open, Out, NOT_AUTHENTICATED};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Money, MonthYear, Record};
use crate::report::{self, Bucket, MonthSummary};
use crate::{Config, Mode, Result};

/// Fetches the records, or returns early from the calling command when we are not authenticated.
macro_rules! records_or_return {
    ($config:expr, $mode:expr) => {{
        let Some(mut store) = open($config, $mode).await? else {
            return Ok(Out::new_message(NOT_AUTHENTICATED));
        };
        fetch(store.as_mut()).await?
    }};
}

/// Lists the expense types found in the sheet followed by the configured default types.
pub async fn types(config: &Config, mode: Mode) -> Result<Out<Vec<String>>> {
    let Some(mut store) = open(config, mode).await? else {
        return Ok(Out::new_message(NOT_AUTHENTICATED));
    };
    let types = store
        .list_distinct_types()
        .await
        .pub_result(ErrorType::Store)?;
    Ok(Out::new(types.join("\n"), types))
}

/// Compares the spending of `month` (the current month when `None`) with the month before it.
pub async fn summary(
    config: &Config,
    mode: Mode,
    month: Option<MonthYear>,
) -> Result<Out<MonthSummary>> {
    let records = records_or_return!(config, mode);
    let month = month.unwrap_or_else(MonthYear::current);
    let summary = report::month_summary(&records, &month);
    Ok(Out::new(summary_message(&summary), summary))
}

pub(super) fn summary_message(summary: &MonthSummary) -> String {
    let arrow = if summary.up { "up" } else { "down" };
    format!(
        "{}: {} ({} from {} in {})",
        summary.month,
        summary.total.pretty(),
        arrow,
        summary.previous_total.pretty(),
        summary.previous_month
    )
}

/// The period that `total` adds up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Month(MonthYear),
    Year(String),
}

/// Adds up the spending of a month or a whole year.
pub async fn total(config: &Config, mode: Mode, period: Period) -> Result<Out<Money>> {
    let records = records_or_return!(config, mode);
    let (label, total) = match &period {
        Period::Month(month) => (month.to_string(), report::total_by_month(&records, month)),
        Period::Year(year) => (year.clone(), report::total_by_year(&records, year)),
    };
    Ok(Out::new(
        format!("Total for {label}: {}", total.pretty()),
        total,
    ))
}

/// Spending per type in `month`, largest first.
pub async fn by_type(config: &Config, mode: Mode, month: MonthYear) -> Result<Out<Vec<Bucket>>> {
    let records = records_or_return!(config, mode);
    let buckets = report::by_type_for_month(&records, &month);
    let message = buckets_message(&format!("Spending by type for {month}"), &buckets);
    Ok(Out::new(message, buckets))
}

/// Spending per month in `year`, in the order the months first appear in the sheet.
pub async fn by_month(config: &Config, mode: Mode, year: String) -> Result<Out<Vec<Bucket>>> {
    let records = records_or_return!(config, mode);
    let buckets = report::by_month_for_year(&records, &year);
    let message = buckets_message(&format!("Spending by month for {year}"), &buckets);
    Ok(Out::new(message, buckets))
}

pub async fn years(config: &Config, mode: Mode) -> Result<Out<Vec<String>>> {
    let records = records_or_return!(config, mode);
    let years = report::years(&records);
    Ok(Out::new(years.join("\n"), years))
}

pub async fn month_years(config: &Config, mode: Mode) -> Result<Out<Vec<MonthYear>>> {
    let records = records_or_return!(config, mode);
    let month_years = report::month_years(&records);
    let message = month_years
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, month_years))
}

/// The records of one type in `month`, oldest first.
pub async fn details(
    config: &Config,
    mode: Mode,
    month: MonthYear,
    r#type: String,
) -> Result<Out<Vec<Record>>> {
    let records = records_or_return!(config, mode);
    let found = report::details(&records, &month, &r#type);
    let header = format!("{} expenses for {month}", r#type);
    let message = std::iter::once(header)
        .chain(found.iter().map(|record| {
            format!(
                "{}  {:>12}  {}  {}",
                record.date(),
                record.amount(),
                record.who(),
                record.detail()
            )
        }))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, found))
}

fn buckets_message(title: &str, buckets: &[Bucket]) -> String {
    if buckets.is_empty() {
        return format!("{title}: nothing found");
    }
    std::iter::once(title.to_string())
        .chain(buckets.iter().map(|bucket| {
            format!(
                "{:<16} {:>14} ({})",
                bucket.name,
                bucket.value.pretty(),
                bucket.count
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}
