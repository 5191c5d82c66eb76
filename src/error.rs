//! Error types for the crate.
//!
//! Internally we use `anyhow` through the `Res` alias. At the public boundary (commands and the
//! binary) errors are wrapped in `Error`, which carries an `ErrorType` so that callers can tell a
//! refused write apart from a failed network call.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies an `Error` by where it came from and what the caller should do about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Malformed date or money text supplied by the user.
    Format,
    /// Missing or invalid fields on a write. Nothing was sent to the spreadsheet.
    Validation,
    /// A transport or authentication failure while talking to the spreadsheet.
    Store,
    /// The configuration directory or one of its files is missing or invalid.
    Config,
    /// Anything else.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);

/// The public error type.
pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.source
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // {:#} prints the whole context chain on one line
        write!(f, "{} error: {:#}", self.error_type, self.source)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.source)
    }
}

impl<E> From<E> for Error
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        Self::new(ErrorType::Internal, e)
    }
}

/// Converts an internal result into a public `Result` with the given `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_sets_type() {
        let r: Res<()> = Err(anyhow!("boom"));
        let e = r.pub_result(ErrorType::Store).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Store);
        assert_eq!(e.to_string(), "store error: boom");
    }

    #[test]
    fn test_question_mark_is_internal() {
        fn inner() -> Result<()> {
            let r: Res<()> = Err(anyhow!("nope"));
            r?;
            Ok(())
        }
        assert_eq!(inner().unwrap_err().error_type(), ErrorType::Internal);
    }
}
