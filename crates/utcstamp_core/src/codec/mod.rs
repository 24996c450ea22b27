//! Value codecs between in-memory types and their persisted text forms.
//!
//! # Responsibility
//! - Define the fractional-second `Precision` shared by codec and column.
//! - Provide typed errors for malformed stored text.
//!
//! # Invariants
//! - `Precision` is always within `0..=Precision::MAX`.
//! - Codec functions are pure and never consult process-local timezone.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod datetime_utc;

pub type CodecResult<T> = Result<T, CodecError>;

/// Error raised when a value cannot be converted to or from stored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Stored text does not match `YYYY-MM-DD HH:MM:SS[.f+]`.
    Malformed { text: String },
    /// Stored text has the right shape but names no real calendar instant.
    OutOfRange { text: String },
    /// Requested more fractional digits than an instant carries.
    InvalidPrecision { value: u8 },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { text } => write!(
                f,
                "malformed stored datetime `{text}`; expected YYYY-MM-DD HH:MM:SS[.fff]"
            ),
            Self::OutOfRange { text } => write!(f, "stored datetime `{text}` is out of range"),
            Self::InvalidPrecision { value } => write!(
                f,
                "precision {value} is not supported; expected 0..={}",
                Precision::MAX
            ),
        }
    }
}

impl Error for CodecError {}

/// Number of fractional-second digits retained in stored datetime text.
///
/// Instants are handled at millisecond resolution, so at most 3 digits are
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Precision(u8);

impl Precision {
    pub const MAX: u8 = 3;
    pub const SECONDS: Self = Self(0);
    pub const MILLIS: Self = Self(3);

    /// Creates a precision of `digits` fractional-second digits.
    ///
    /// # Errors
    /// - Returns `CodecError::InvalidPrecision` when `digits > Precision::MAX`.
    pub fn new(digits: u8) -> CodecResult<Self> {
        if digits > Self::MAX {
            return Err(CodecError::InvalidPrecision { value: digits });
        }
        Ok(Self(digits))
    }

    pub fn digits(self) -> u8 {
        self.0
    }

    /// Exact length of stored text encoded with this precision.
    pub fn text_len(self) -> usize {
        19 + self.suffix_len()
    }

    /// Length of the `.fff` suffix, zero when no fractional digits are kept.
    pub(crate) fn suffix_len(self) -> usize {
        if self.0 > 0 {
            1 + usize::from(self.0)
        } else {
            0
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::MILLIS
    }
}

impl TryFrom<u8> for Precision {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Precision> for u8 {
    fn from(value: Precision) -> Self {
        value.0
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{CodecError, Precision};

    #[test]
    fn default_precision_is_millis() {
        assert_eq!(Precision::default(), Precision::MILLIS);
        assert_eq!(Precision::default().digits(), 3);
    }

    #[test]
    fn new_rejects_more_than_three_digits() {
        assert_eq!(
            Precision::new(4).unwrap_err(),
            CodecError::InvalidPrecision { value: 4 }
        );
        assert!(Precision::new(3).is_ok());
        assert!(Precision::new(0).is_ok());
    }

    #[test]
    fn text_len_matches_stored_shape() {
        let lengths: Vec<usize> = (0..=3)
            .map(|digits| Precision::new(digits).unwrap().text_len())
            .collect();
        assert_eq!(lengths, vec![19, 21, 22, 23]);
    }

    #[test]
    fn serde_validates_digits() {
        let precision: Precision = serde_json::from_str("2").unwrap();
        assert_eq!(precision.digits(), 2);
        assert_eq!(serde_json::to_string(&precision).unwrap(), "2");

        let err = serde_json::from_str::<Precision>("7").unwrap_err();
        assert!(err.to_string().contains("precision 7"), "unexpected error: {err}");
    }
}
