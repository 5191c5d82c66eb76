//! Types that represent the core data model, such as `Record`, `Money` and `DateStamp`.
mod date;
mod money;
mod record;

pub use date::{DateStamp, MonthKey, MonthYear};
pub use money::Money;
pub(crate) use record::{parse_rows, Columns};
pub use record::{NewRecord, Record, HEADERS};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) use date::parse_year;

/// Returned when the text of a date or an amount cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError(String);

impl FormatError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Error for FormatError {}
