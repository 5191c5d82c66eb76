//! Dates as they are stored in the sheet, `DD/MM/YYYY`, and the month keys used for grouping.

use crate::model::FormatError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '/';

/// A two-digit month, `"01"` through `"12"`. This is the only key used when grouping or filtering
/// by month, so `"7"` and `"07"` can never end up in different groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthKey(String);

impl MonthKey {
    pub fn new(month: u32) -> Result<Self, FormatError> {
        if !(1..=12).contains(&month) {
            return Err(FormatError::new(format!("{month} is not a month")));
        }
        Ok(Self(format!("{month:02}")))
    }

    pub fn number(&self) -> u32 {
        // Only constructed from a validated month
        self.0.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for MonthKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_number(s, 1, 2, "month")?)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number().cmp(&other.number())
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A month of a specific year, e.g. `02/2024`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthYear {
    // Field order matters for the derived ordering
    year: String,
    month: MonthKey,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Result<Self, FormatError> {
        Ok(Self {
            year: format_year(year)?,
            month: MonthKey::new(month)?,
        })
    }

    pub fn month(&self) -> &MonthKey {
        &self.month
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    /// The month we are in according to the local clock.
    pub fn current() -> Self {
        Self::from_naive(Local::now().date_naive())
    }

    /// The month before the current one.
    pub fn previous_from_now() -> Self {
        Self::current().previous()
    }

    /// The month before this one. January wraps around to December of the previous year.
    pub fn previous(&self) -> Self {
        let month = self.month.number();
        let year: i32 = self.year.parse().unwrap_or_default();
        let (month, year) = if month <= 1 {
            (12, year - 1)
        } else {
            (month - 1, year)
        };
        Self {
            month: MonthKey(format!("{month:02}")),
            year: format!("{year:04}"),
        }
    }

    fn from_naive(date: NaiveDate) -> Self {
        Self {
            month: MonthKey(format!("{:02}", date.month())),
            year: format!("{:04}", date.year()),
        }
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.month, self.year)
    }
}

impl FromStr for MonthYear {
    type Err = FormatError;

    /// Parses `MM/YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(SEPARATOR).collect();
        if parts.len() != 2 {
            return Err(FormatError::new(format!(
                "'{s}' is not a month, expected MM{SEPARATOR}YYYY"
            )));
        }
        Ok(Self {
            month: parts[0].parse()?,
            year: parse_year(parts[1])?,
        })
    }
}

/// A date as it is stored in the Date column of the sheet.
///
/// The text form is `DD/MM/YYYY`. Parsing accepts a one digit day or month, but the text form
/// always pads them, so a `DateStamp` that was written by us round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateStamp {
    day: String,
    month: MonthKey,
    year: String,
}

impl DateStamp {
    pub fn today() -> Self {
        Self::from_naive(Local::now().date_naive())
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            day: format!("{:02}", date.day()),
            month: MonthKey(format!("{:02}", date.month())),
            year: format!("{:04}", date.year()),
        }
    }

    /// Parses either the sheet format, `DD/MM/YYYY`, or an ISO date, `YYYY-MM-DD`.
    pub fn parse_input(s: &str) -> Result<Self, FormatError> {
        let trimmed = s.trim();
        if trimmed.contains('-') {
            let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| {
                FormatError::new(format!("'{s}' is not a date, expected YYYY-MM-DD: {e}"))
            })?;
            return Ok(Self::from_naive(date));
        }
        trimmed.parse()
    }

    /// The day, month and year as zero-padded strings.
    pub fn parts(&self) -> (&str, &str, &str) {
        (&self.day, self.month.as_str(), &self.year)
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn month(&self) -> &MonthKey {
        &self.month
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn month_year(&self) -> MonthYear {
        MonthYear {
            month: self.month.clone(),
            year: self.year.clone(),
        }
    }

    fn day_number(&self) -> u32 {
        self.day.parse().unwrap_or_default()
    }
}

impl FromStr for DateStamp {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(SEPARATOR).collect();
        if parts.len() != 3 {
            return Err(FormatError::new(format!(
                "'{s}' is not a date, expected DD{SEPARATOR}MM{SEPARATOR}YYYY"
            )));
        }
        let day = parse_number(parts[0], 1, 2, "day")?;
        if !(1..=31).contains(&day) {
            return Err(FormatError::new(format!("{day} is not a day of the month")));
        }
        Ok(Self {
            day: format!("{day:02}"),
            month: parts[1].parse()?,
            year: parse_year(parts[2])?,
        })
    }
}

impl fmt::Display for DateStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.day, self.month, self.year
        )
    }
}

impl Ord for DateStamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.month.cmp(&other.month))
            .then_with(|| self.day_number().cmp(&other.day_number()))
    }
}

impl PartialOrd for DateStamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MonthKey::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for DateStamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateStamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateStamp::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Parses a year given as a number into its four-digit text form.
fn format_year(year: i32) -> Result<String, FormatError> {
    if !(1..=9999).contains(&year) {
        return Err(FormatError::new(format!("{year} is not a four digit year")));
    }
    Ok(format!("{year:04}"))
}

/// Years are always four digits, e.g. `2024`.
pub(crate) fn parse_year(s: &str) -> Result<String, FormatError> {
    let s = s.trim();
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::new(format!("'{s}' is not a four digit year")));
    }
    Ok(s.to_string())
}

fn parse_number(s: &str, min_len: usize, max_len: usize, what: &str) -> Result<u32, FormatError> {
    let s = s.trim();
    if s.len() < min_len || s.len() > max_len || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::new(format!("'{s}' is not a valid {what}")));
    }
    s.parse()
        .map_err(|_| FormatError::new(format!("'{s}' is not a valid {what}")))
}
