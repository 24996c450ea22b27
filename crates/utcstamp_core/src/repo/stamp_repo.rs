//! Stamp repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and time-window queries over `stamps` storage.
//! - Route every datetime through `UtcDatetimeColumn` callbacks.
//!
//! # Invariants
//! - Write paths must call `Stamp::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Window bounds are encoded with the column's own precision, so text
//!   comparison matches chronological order.

use crate::codec::datetime_utc::{truncate, STORABLE_YEARS};
use crate::db::DbError;
use crate::model::stamp::{Stamp, StampId, StampValidationError};
use crate::schema::{StampColumns, STAMPS_TABLE};
use chrono::{DateTime, Datelike, Utc};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for stamp persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StampValidationError),
    Db(DbError),
    NotFound(StampId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "stamp not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted stamp data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<StampValidationError> for RepoError {
    fn from(value: StampValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing stamps.
///
/// `from` is inclusive and `to` exclusive. Both are compared at the stored
/// precision of `recorded_at`. Bounds outside the storable year range are
/// dropped when they cannot exclude anything, and yield an empty result when
/// they exclude everything.
#[derive(Debug, Clone, Default)]
pub struct StampListQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for stamp persistence.
pub trait StampRepository {
    fn create_stamp(&self, stamp: &Stamp) -> RepoResult<StampId>;
    fn get_stamp(&self, id: StampId) -> RepoResult<Option<Stamp>>;
    fn list_stamps(&self, query: &StampListQuery) -> RepoResult<Vec<Stamp>>;
    fn delete_stamp(&self, id: StampId) -> RepoResult<()>;
}

/// SQLite-backed stamp repository.
pub struct SqliteStampRepository<'conn> {
    conn: &'conn Connection,
    columns: StampColumns,
}

impl<'conn> SqliteStampRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            columns: StampColumns::new(),
        }
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT {}, {}, {} FROM {STAMPS_TABLE}",
            self.columns.id.name(),
            self.columns.label.name(),
            self.columns.recorded_at.name(),
        )
    }

    fn parse_stamp_row(&self, row: &Row<'_>) -> RepoResult<Stamp> {
        let id_text: String = row.get(self.columns.id.name())?;
        let id = Uuid::parse_str(&id_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{id_text}` in stamps.id"))
        })?;

        let recorded_at = self.columns.recorded_at.read(row).map_err(|err| match err {
            rusqlite::Error::FromSqlConversionFailure(_, _, source) => {
                RepoError::InvalidData(format!("{source} in stamps.recorded_at"))
            }
            other => RepoError::from(other),
        })?;

        let stamp = Stamp {
            id,
            label: row.get(self.columns.label.name())?,
            recorded_at,
        };
        stamp.validate()?;
        Ok(stamp)
    }
}

impl StampRepository for SqliteStampRepository<'_> {
    fn create_stamp(&self, stamp: &Stamp) -> RepoResult<StampId> {
        stamp.validate()?;

        let recorded_at = self.columns.recorded_at.bind(&stamp.recorded_at);
        self.conn.execute(
            &format!(
                "INSERT INTO {STAMPS_TABLE} ({}, {}, {}) VALUES (?1, ?2, ?3);",
                self.columns.id.name(),
                self.columns.label.name(),
                self.columns.recorded_at.name(),
            ),
            params_from_iter([
                Value::Text(stamp.id.to_string()),
                Value::Text(stamp.label.clone()),
                recorded_at,
            ]),
        )?;

        let stored = truncate(&stamp.recorded_at, self.columns.recorded_at.precision());
        if stored != stamp.recorded_at {
            debug!(
                "event=stamp_create module=repo status=truncated precision={}",
                self.columns.recorded_at.precision()
            );
        }
        info!("event=stamp_create module=repo status=ok");
        Ok(stamp.id)
    }

    fn get_stamp(&self, id: StampId) -> RepoResult<Option<Stamp>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE {} = ?1;",
            self.select_sql(),
            self.columns.id.name()
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.parse_stamp_row(row)?));
        }

        Ok(None)
    }

    fn list_stamps(&self, query: &StampListQuery) -> RepoResult<Vec<Stamp>> {
        let recorded_column = &self.columns.recorded_at;
        let mut sql = format!("{} WHERE 1 = 1", self.select_sql());
        let mut bind_values: Vec<Value> = Vec::new();

        let (from, to) = match storable_window(query) {
            Some(window) => window,
            None => return Ok(Vec::new()),
        };

        if let Some(from) = &from {
            sql.push_str(&format!(" AND {} >= ?", recorded_column.name()));
            bind_values.push(recorded_column.bind(from));
        }

        if let Some(to) = &to {
            sql.push_str(&format!(" AND {} < ?", recorded_column.name()));
            bind_values.push(recorded_column.bind(to));
        }

        sql.push_str(&format!(
            " ORDER BY {} ASC, {} ASC",
            recorded_column.name(),
            self.columns.id.name()
        ));

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut stamps = Vec::new();

        while let Some(row) = rows.next()? {
            stamps.push(self.parse_stamp_row(row)?);
        }

        Ok(stamps)
    }

    fn delete_stamp(&self, id: StampId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM {STAMPS_TABLE} WHERE {} = ?1;",
                self.columns.id.name()
            ),
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=stamp_delete module=repo status=ok");
        Ok(())
    }
}

type Window = (Option<DateTime<Utc>>, Option<DateTime<Utc>>);

/// Maps query bounds onto stored text, which only spans `STORABLE_YEARS`.
///
/// Returns `None` when no storable instant can fall inside the window.
fn storable_window(query: &StampListQuery) -> Option<Window> {
    let (first, last) = (*STORABLE_YEARS.start(), *STORABLE_YEARS.end());
    let from = match query.from {
        Some(from) if from.year() > last => return None,
        Some(from) if from.year() < first => None,
        other => other,
    };
    let to = match query.to {
        Some(to) if to.year() < first => return None,
        Some(to) if to.year() > last => None,
        other => other,
    };
    Some((from, to))
}
