//! Custom column type storing UTC instants in naive `DATETIME(n)` columns.
//!
//! # Responsibility
//! - Pair the declared storage type with the codec's truncation precision.
//! - Provide write (`to_driver`) and read (`from_driver`) conversion callbacks.
//!
//! # Invariants
//! - Declared `DATETIME(n)` and codec precision come from one value, so they
//!   cannot drift apart.
//! - Values read back are always UTC.

use crate::codec::datetime_utc::{decode, encode};
use crate::codec::{CodecResult, Precision};
use chrono::{DateTime, Utc};
use log::warn;
use rusqlite::types::{FromSqlError, Type, Value, ValueRef};
use rusqlite::{Row, Statement};

/// Column definition for a UTC datetime stored as timezone-naive text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtcDatetimeColumn {
    name: String,
    precision: Precision,
    not_null: bool,
}

impl UtcDatetimeColumn {
    /// Creates a nullable column with millisecond precision.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            precision: Precision::default(),
            not_null: false,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Declared storage type, e.g. `DATETIME(3)`.
    pub fn data_type(&self) -> String {
        format!("DATETIME({})", self.precision)
    }

    /// DDL fragment for `CREATE TABLE`.
    pub fn definition(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type());
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        sql
    }

    /// Write callback: converts an instant into stored text.
    pub fn to_driver(&self, value: &DateTime<Utc>) -> String {
        encode(value, self.precision)
    }

    /// Read callback: converts stored text into a UTC instant.
    pub fn from_driver(&self, value: &str) -> CodecResult<DateTime<Utc>> {
        decode(value)
    }

    /// Bindable SQLite value for `value`.
    pub fn bind(&self, value: &DateTime<Utc>) -> Value {
        Value::Text(self.to_driver(value))
    }

    /// Reads and decodes this column from a result row.
    ///
    /// Non-text values and malformed text surface as
    /// `rusqlite::Error::FromSqlConversionFailure`.
    pub fn read(&self, row: &Row<'_>) -> rusqlite::Result<DateTime<Utc>> {
        let index = self.index_in(row)?;
        let text = match row.get_ref(index)? {
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map_err(|err| conversion_failure(index, err))?,
            _ => return Err(conversion_failure(index, FromSqlError::InvalidType)),
        };

        self.from_driver(text).map_err(|err| {
            warn!(
                "event=datetime_decode module=schema status=error column={} error_code=malformed_datetime",
                self.name
            );
            conversion_failure(index, err)
        })
    }

    /// Reads a nullable column; SQL `NULL` maps to `None`.
    pub fn read_optional(&self, row: &Row<'_>) -> rusqlite::Result<Option<DateTime<Utc>>> {
        let index = self.index_in(row)?;
        if matches!(row.get_ref(index)?, ValueRef::Null) {
            return Ok(None);
        }
        self.read(row).map(Some)
    }

    fn index_in(&self, row: &Row<'_>) -> rusqlite::Result<usize> {
        let stmt: &Statement<'_> = row.as_ref();
        stmt.column_index(&self.name)
    }
}

fn conversion_failure(
    index: usize,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, source.into())
}

#[cfg(test)]
mod tests {
    use super::UtcDatetimeColumn;
    use crate::codec::Precision;
    use chrono::{TimeZone, Utc};
    use rusqlite::Connection;

    #[test]
    fn default_column_declares_millisecond_datetime() {
        let column = UtcDatetimeColumn::new("created_at");
        assert_eq!(column.precision(), Precision::MILLIS);
        assert_eq!(column.data_type(), "DATETIME(3)");
        assert_eq!(column.definition(), "created_at DATETIME(3)");
    }

    #[test]
    fn definition_reflects_precision_and_nullability() {
        let column = UtcDatetimeColumn::new("seen_at")
            .with_precision(Precision::SECONDS)
            .not_null();
        assert_eq!(column.definition(), "seen_at DATETIME(0) NOT NULL");
    }

    #[test]
    fn driver_callbacks_use_column_precision() {
        let column = UtcDatetimeColumn::new("at").with_precision(Precision::SECONDS);
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 45).unwrap()
            + chrono::Duration::milliseconds(678);

        let stored = column.to_driver(&instant);
        assert_eq!(stored, "2024-03-15 08:30:45");
        assert_eq!(
            column.from_driver(&stored).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 45).unwrap()
        );
    }

    #[test]
    fn read_rejects_malformed_and_non_text_values() {
        let conn = Connection::open_in_memory().unwrap();
        let column = UtcDatetimeColumn::new("at");

        let err = conn
            .query_row("SELECT 'yesterday' AS at;", [], |row| column.read(row))
            .unwrap_err();
        assert!(
            matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)),
            "unexpected error: {err}"
        );

        let err = conn
            .query_row("SELECT 42 AS at;", [], |row| column.read(row))
            .unwrap_err();
        assert!(
            matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn read_optional_maps_null_to_none() {
        let conn = Connection::open_in_memory().unwrap();
        let column = UtcDatetimeColumn::new("at");

        let value = conn
            .query_row("SELECT NULL AS at;", [], |row| column.read_optional(row))
            .unwrap();
        assert_eq!(value, None);
    }
}
