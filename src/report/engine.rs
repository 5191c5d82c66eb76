//! The filter, group and reduce steps shared by all of the report queries.
//!
//! Rows whose date or amount cannot be parsed never fail a report. They are logged and left out
//! of whatever the report is computing.

use crate::model::{DateStamp, Money, MonthYear, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// The sum and count of the records that share a key, such as a type name or a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub value: Money,
    pub count: usize,
}

impl Bucket {
    fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Money::ZERO,
            count: 0,
        }
    }
}

/// Buckets keyed by name. Keys are kept in the order they were first seen.
#[derive(Debug, Default)]
pub(crate) struct Groups {
    buckets: Vec<Bucket>,
    index: HashMap<String, usize>,
}

impl Groups {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for `key`, starting it at zero the first time the key is seen.
    pub(crate) fn entry(&mut self, key: &str) -> &mut Bucket {
        let ix = match self.index.get(key) {
            Some(&ix) => ix,
            None => {
                self.buckets.push(Bucket::empty(key));
                let ix = self.buckets.len() - 1;
                self.index.insert(key.to_string(), ix);
                ix
            }
        };
        &mut self.buckets[ix]
    }

    /// Adds `value` to the bucket for `key`. A value that would overflow the bucket is logged and
    /// left out.
    pub(crate) fn add(&mut self, key: &str, value: Money) {
        let bucket = self.entry(key);
        match bucket.value.checked_add(value) {
            Some(total) => {
                bucket.value = total;
                bucket.count += 1;
            }
            None => warn!("Leaving out {value} from '{key}', the total is too large"),
        }
    }

    pub(crate) fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }
}

/// Pairs each record with its parsed date, leaving out the records whose date does not parse.
pub(crate) fn dated(records: &[Record]) -> impl Iterator<Item = (&Record, DateStamp)> {
    records
        .iter()
        .filter_map(|record| match record.date_stamp() {
            Ok(date) => Some((record, date)),
            Err(e) => {
                warn!("Leaving out a row with an unusable date: {e}");
                None
            }
        })
}

/// The records that fall in `month`.
pub(crate) fn in_month<'a>(
    records: &'a [Record],
    month: &'a MonthYear,
) -> impl Iterator<Item = (&'a Record, DateStamp)> {
    dated(records).filter(move |(_, date)| {
        date.year() == month.year() && date.month() == month.month()
    })
}

/// The records that fall in `year`.
pub(crate) fn in_year<'a>(
    records: &'a [Record],
    year: &'a str,
) -> impl Iterator<Item = (&'a Record, DateStamp)> {
    dated(records).filter(move |(_, date)| date.year() == year)
}

/// Parses the amount of `record`, logging and returning `None` when it is unusable.
pub(crate) fn amount(record: &Record) -> Option<Money> {
    match record.money() {
        Ok(money) => Some(money),
        Err(e) => {
            warn!("Leaving out a row dated '{}': {e}", record.date());
            None
        }
    }
}

/// Adds up the amounts of `records`. An amount that would overflow the total is logged and left
/// out.
pub(crate) fn sum<'a>(records: impl Iterator<Item = &'a Record>) -> Money {
    records
        .filter_map(amount)
        .fold(Money::ZERO, |total, value| match total.checked_add(value) {
            Some(total) => total,
            None => {
                warn!("Leaving out {value}, the total is too large");
                total
            }
        })
}

/// Groups `records` by the key that `key` returns and reduces each group to a `Bucket`.
pub(crate) fn group_by<'a, I, F>(records: I, key: F) -> Vec<Bucket>
where
    I: Iterator<Item = (&'a Record, DateStamp)>,
    F: Fn(&Record, &DateStamp) -> String,
{
    let mut groups = Groups::new();
    for (record, date) in records {
        if let Some(value) = amount(record) {
            groups.add(&key(record, &date), value);
        }
    }
    groups.into_buckets()
}

/// Sorts the largest value first. Buckets with equal values keep their order.
pub(crate) fn sort_desc(buckets: &mut [Bucket]) {
    buckets.sort_by(|a, b| b.value.cmp(&a.value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, amount: &str, r#type: &str) -> Record {
        Record {
            date: date.into(),
            who: "Ana".into(),
            amount: amount.into(),
            r#type: r#type.into(),
            detail: String::new(),
        }
    }

    #[test]
    fn test_groups_entry_starts_at_zero() {
        let mut groups = Groups::new();
        let bucket = groups.entry("Food");
        assert_eq!(bucket.value, Money::ZERO);
        assert_eq!(bucket.count, 0);
        groups.add("Food", "$2".parse().unwrap());
        groups.add("Home", "$1".parse().unwrap());
        groups.add("Food", "$3".parse().unwrap());
        let buckets = groups.into_buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].name, "Food");
        assert_eq!(buckets[0].value.to_string(), "$5.00");
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].name, "Home");
    }

    #[test]
    fn test_dated_skips_bad_dates() {
        let records = vec![
            record("01/01/2024", "$1", "Food"),
            record("yesterday", "$1", "Food"),
            record("01/2024", "$1", "Food"),
        ];
        assert_eq!(dated(&records).count(), 1);
    }

    #[test]
    fn test_sum_skips_bad_amounts() {
        let records = vec![
            record("01/01/2024", "$1.50", "Food"),
            record("01/01/2024", "lots", "Food"),
            record("01/01/2024", "", "Food"),
        ];
        assert_eq!(sum(records.iter()).to_string(), "$1.50");
    }

    #[test]
    fn test_sum_skips_overflowing_amounts() {
        let records = vec![
            record("01/01/2024", "$79228162514264337593543950335", "Food"),
            record("02/01/2024", "$1", "Food"),
        ];
        assert_eq!(
            sum(records.iter()).to_string(),
            "$79228162514264337593543950335.00"
        );
    }

    #[test]
    fn test_groups_skip_overflowing_amounts() {
        let mut groups = Groups::new();
        groups.add("Food", "$79228162514264337593543950335".parse().unwrap());
        groups.add("Food", "$1".parse().unwrap());
        groups.add("Home", "$1".parse().unwrap());
        let buckets = groups.into_buckets();
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].value.to_string(), "$1.00");
    }

    #[test]
    fn test_in_month_pads_month() {
        let records = vec![
            record("1/7/2024", "$1", "Food"),
            record("01/07/2024", "$1", "Food"),
            record("01/07/2023", "$1", "Food"),
        ];
        let july = MonthYear::new(7, 2024).unwrap();
        assert_eq!(in_month(&records, &july).count(), 2);
    }

    #[test]
    fn test_sort_desc_is_stable() {
        let mut buckets = vec![
            Bucket {
                name: "a".into(),
                value: "$1".parse().unwrap(),
                count: 1,
            },
            Bucket {
                name: "b".into(),
                value: "$2".parse().unwrap(),
                count: 1,
            },
            Bucket {
                name: "c".into(),
                value: "$1".parse().unwrap(),
                count: 1,
            },
        ];
        sort_desc(&mut buckets);
        let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
