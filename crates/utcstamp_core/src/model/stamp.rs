//! Stamp domain model.
//!
//! # Responsibility
//! - Define a labelled point in time persisted through UTC datetime columns.
//! - Validate field constraints before persistence.
//!
//! # Invariants
//! - `id` is never nil.
//! - `label` is non-blank and fits the `label` column.
//! - `recorded_at` is UTC within years `0..=9999`; storage keeps millisecond
//!   precision.

use crate::codec::datetime_utc::{is_storable, STORABLE_YEARS};
use crate::schema::DEFAULT_VARCHAR_LENGTH;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a stamp.
pub type StampId = Uuid;

/// Validation failure for stamp fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampValidationError {
    NilId,
    BlankLabel,
    LabelTooLong { chars: usize, max: usize },
    /// `recorded_at` falls outside the years stored text can represent.
    UnstorableInstant { year: i32 },
}

impl Display for StampValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "stamp id must not be nil"),
            Self::BlankLabel => write!(f, "stamp label must not be blank"),
            Self::LabelTooLong { chars, max } => {
                write!(f, "stamp label has {chars} chars; max is {max}")
            }
            Self::UnstorableInstant { year } => write!(
                f,
                "stamp recorded_at year {year} is outside {}..={}",
                STORABLE_YEARS.start(),
                STORABLE_YEARS.end()
            ),
        }
    }
}

impl Error for StampValidationError {}

/// A labelled UTC instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub id: StampId,
    pub label: String,
    /// Serialized as RFC 3339 with a `Z` suffix.
    pub recorded_at: DateTime<Utc>,
}

impl Stamp {
    /// Creates a stamp with a generated id.
    pub fn new(label: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            recorded_at,
        }
    }

    /// Creates a stamp with a caller-provided id.
    ///
    /// # Errors
    /// - Returns `StampValidationError::NilId` for `Uuid::nil()`.
    pub fn with_id(
        id: StampId,
        label: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, StampValidationError> {
        let stamp = Self {
            id,
            label: label.into(),
            recorded_at,
        };
        stamp.validate()?;
        Ok(stamp)
    }

    /// Checks field constraints required for persistence.
    pub fn validate(&self) -> Result<(), StampValidationError> {
        if self.id.is_nil() {
            return Err(StampValidationError::NilId);
        }
        if self.label.trim().is_empty() {
            return Err(StampValidationError::BlankLabel);
        }
        let chars = self.label.chars().count();
        let max = DEFAULT_VARCHAR_LENGTH as usize;
        if chars > max {
            return Err(StampValidationError::LabelTooLong { chars, max });
        }
        if !is_storable(&self.recorded_at) {
            return Err(StampValidationError::UnstorableInstant {
                year: self.recorded_at.year(),
            });
        }
        Ok(())
    }
}
