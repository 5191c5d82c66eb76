//! Money type for handling currency amounts as they appear in the spreadsheet.
//!
//! Amounts are written to the sheet as `$12.50`. When reading them back, a dollar sign and
//! thousands separators are optional, since people also type directly into the sheet.

use crate::model::FormatError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const CURRENCY: char = '$';
const DECIMAL_PLACES: u32 = 2;

/// Represents an amount of money.
///
/// Addition and ordering are done on the `Decimal` value. The canonical text form has a dollar
/// sign and exactly two decimal places.
///
/// ```
/// # use sheet_expenses::model::Money;
/// # use std::str::FromStr;
/// let money = Money::from_str("$1,000.5").unwrap();
/// assert_eq!(money.to_string(), "$1000.50");
/// assert_eq!(Money::from_str(&money.to_string()).unwrap(), money);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Adds two amounts, or returns `None` if the result does not fit.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Formats the amount for people rather than for the sheet, e.g. `$60,000.00`.
    pub fn pretty(&self) -> String {
        let rounded = self.rounded();
        let abs = rounded.abs();

        // format_num works on f64, which only holds about 15 significant digits
        let exact_limit = Decimal::from(10_000_000_000_000_i64);
        let digits = if abs < exact_limit {
            abs.to_f64().map(|num| format_num::format_num!(",.2", num))
        } else {
            None
        };
        let digits = digits.unwrap_or_else(|| group_thousands(&format!("{abs:.2}")));
        format!("{}{CURRENCY}{digits}", sign(rounded))
    }

    fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// The sign to print in front of an amount that has already been rounded.
fn sign(rounded: Decimal) -> &'static str {
    if !rounded.is_zero() && rounded.is_sign_negative() {
        "-"
    } else {
        ""
    }
}

/// Puts commas between the thousands of the whole part of `digits`, e.g. `1234.50` becomes
/// `1,234.50`.
fn group_thousands(digits: &str) -> String {
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let mut grouped = String::with_capacity(digits.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

impl FromStr for Money {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FormatError::new(format!("'{s}' is not an amount of money")));
        }

        // Could be "$50.00", "-$50.00", "-50.00" or "50.00"
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let unsigned = unsigned.strip_prefix(CURRENCY).unwrap_or(unsigned);
        let digits = unsigned.replace(',', "");

        // Decimal::from_str would accept a second sign, we have already consumed ours
        if digits.starts_with(['-', '+']) {
            return Err(FormatError::new(format!("'{s}' is not an amount of money")));
        }

        let value = Decimal::from_str(&digits)
            .map_err(|e| FormatError::new(format!("'{s}' is not an amount of money: {e}")))?;
        Ok(Money(if negative { -value } else { value }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        write!(f, "{}{CURRENCY}{:.2}", sign(rounded), rounded.abs())
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        let money = Money::from_str("$50.00").unwrap();
        assert_eq!(money.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_without_dollar_sign() {
        let money = Money::from_str("50").unwrap();
        assert_eq!(money.value(), dec("50"));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Money::from_str("-$5.25").unwrap().value(), dec("-5.25"));
        assert_eq!(Money::from_str("-5.25").unwrap().value(), dec("-5.25"));
    }

    #[test]
    fn test_parse_whitespace_and_commas() {
        let money = Money::from_str("  $1,234,567.89  ").unwrap();
        assert_eq!(money.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_failures() {
        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("   ").is_err());
        assert!(Money::from_str("$").is_err());
        assert!(Money::from_str("abc").is_err());
        assert!(Money::from_str("$12.3.4").is_err());
        assert!(Money::from_str("--5").is_err());
        assert!(Money::from_str("$-5").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec("50")).to_string(), "$50.00");
        assert_eq!(Money::new(dec("7.5")).to_string(), "$7.50");
        assert_eq!(Money::new(dec("-50")).to_string(), "-$50.00");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
        assert_eq!(Money::new(dec("0.125")).to_string(), "$0.13");
        assert_eq!(Money::new(dec("-0.001")).to_string(), "$0.00");
        assert_eq!(Money::new(dec("-0.005")).to_string(), "-$0.01");
    }

    #[test]
    fn test_format_parse_is_normalizing() {
        for (input, normal) in [
            ("$10", "$10.00"),
            ("10.5", "$10.50"),
            ("$1,000.00", "$1000.00"),
            ("-$3", "-$3.00"),
            ("$0.00", "$0.00"),
        ] {
            let parsed = Money::from_str(input).unwrap();
            assert_eq!(parsed.to_string(), normal);
            assert_eq!(Money::from_str(&parsed.to_string()).unwrap(), parsed);
        }
    }

    #[test]
    fn test_pretty() {
        assert_eq!(Money::new(dec("60000")).pretty(), "$60,000.00");
        assert_eq!(Money::new(dec("-12.5")).pretty(), "-$12.50");
        assert_eq!(Money::new(dec("-0.001")).pretty(), "$0.00");
        assert_eq!(Money::new(dec("999.999")).pretty(), "$1,000.00");
    }

    #[test]
    fn test_pretty_large_amounts_are_exact() {
        assert_eq!(
            Money::new(dec("12345678901234567.89")).pretty(),
            "$12,345,678,901,234,567.89"
        );
        assert_eq!(
            Money::new(dec("-100000000000000")).pretty(),
            "-$100,000,000,000,000.00"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1.00"), "1.00");
        assert_eq!(group_thousands("123.00"), "123.00");
        assert_eq!(group_thousands("1234.00"), "1,234.00");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567.5"), "1,234,567.5");
    }

    #[test]
    fn test_checked_add_and_ordering() {
        let total = ["$10", "$5", "$0.25"]
            .iter()
            .map(|s| Money::from_str(s).unwrap())
            .try_fold(Money::ZERO, Money::checked_add)
            .unwrap();
        assert_eq!(total.value(), dec("15.25"));
        assert_eq!(Money::new(Decimal::MAX).checked_add(Money::new(dec("1"))), None);
        assert!(Money::from_str("$30").unwrap() < Money::from_str("$100").unwrap());
    }

    #[test]
    fn test_serde() {
        let money = Money::new(dec("50"));
        assert_eq!(serde_json::to_string(&money).unwrap(), "\"$50.00\"");
        let back: Money = serde_json::from_str("\"50\"").unwrap();
        assert_eq!(back, money);
    }
}
