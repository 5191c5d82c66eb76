//! The named reports. Each is a pure function of the fetched records and its parameters.

use crate::model::{Money, MonthYear, Record};
use crate::report::engine::{self, dated, group_by, in_month, in_year, sort_desc, Bucket};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The total spent in `month`.
pub fn total_by_month(records: &[Record], month: &MonthYear) -> Money {
    engine::sum(in_month(records, month).map(|(record, _)| record))
}

/// The total spent in `year`.
pub fn total_by_year(records: &[Record], year: &str) -> Money {
    engine::sum(in_year(records, year).map(|(record, _)| record))
}

/// The spending in `month` grouped by type, largest first.
pub fn by_type_for_month(records: &[Record], month: &MonthYear) -> Vec<Bucket> {
    let mut buckets = group_by(in_month(records, month), |record, _| {
        record.r#type().to_string()
    });
    sort_desc(&mut buckets);
    buckets
}

/// The spending in `year` grouped by two-digit month, in the order the months first appear.
pub fn by_month_for_year(records: &[Record], year: &str) -> Vec<Bucket> {
    group_by(in_year(records, year), |_, date| date.month().to_string())
}

/// The distinct years that appear in the sheet, in the order they first appear.
pub fn years(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    dated(records)
        .map(|(_, date)| date.year().to_string())
        .filter(|year| seen.insert(year.clone()))
        .collect()
}

/// The distinct months that appear in the sheet, in the order they first appear.
pub fn month_years(records: &[Record]) -> Vec<MonthYear> {
    let mut seen = HashSet::new();
    dated(records)
        .map(|(_, date)| date.month_year())
        .filter(|month| seen.insert(month.clone()))
        .collect()
}

/// The records of type `r#type` in `month`, oldest first.
pub fn details(records: &[Record], month: &MonthYear, r#type: &str) -> Vec<Record> {
    let mut found: Vec<_> = in_month(records, month)
        .filter(|(record, _)| record.r#type() == r#type)
        .collect();
    found.sort_by(|(_, a), (_, b)| a.cmp(b));
    found.into_iter().map(|(record, _)| record.clone()).collect()
}

/// This month's spending compared with last month's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: MonthYear,
    pub total: Money,
    pub previous_month: MonthYear,
    pub previous_total: Money,
    /// True when more has been spent this month than in the whole of last month.
    pub up: bool,
}

/// Totals `now` and the month before it.
pub fn month_summary(records: &[Record], now: &MonthYear) -> MonthSummary {
    let previous_month = now.previous();
    let total = total_by_month(records, now);
    let previous_total = total_by_month(records, &previous_month);
    MonthSummary {
        month: now.clone(),
        total,
        previous_month,
        previous_total,
        up: total > previous_total,
    }
}
