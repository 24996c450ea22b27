//! UTC datetime storage for timezone-naive SQL columns.
//!
//! Instants are written as `YYYY-MM-DD HH:MM:SS[.fff]` text and always read
//! back as UTC, whatever timezone the host process runs in.

pub mod clock;
pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::datetime_utc::{
    canonical_utc, decode, encode, encode_now, is_storable, truncate, STORABLE_YEARS,
};
pub use codec::{CodecError, CodecResult, Precision};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::stamp::{Stamp, StampId, StampValidationError};
pub use repo::stamp_repo::{
    RepoError, RepoResult, SqliteStampRepository, StampListQuery, StampRepository,
};
pub use schema::{UtcDatetimeColumn, VarcharColumn};
pub use service::stamp_service::StampService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
