//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Stamp::validate()` before persistence.
//! - Datetime values cross the storage boundary only through schema columns.

pub mod stamp_repo;
