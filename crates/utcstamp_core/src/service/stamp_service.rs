//! Stamp use-case service.
//!
//! # Responsibility
//! - Record labelled instants, defaulting to the injected clock's "now".
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - The service never reads ambient wall-clock time; `Clock` is the only
//!   time source.
//! - Returned stamps reflect stored precision, not the caller's input.

use crate::clock::Clock;
use crate::model::stamp::{Stamp, StampId};
use crate::repo::stamp_repo::{RepoError, RepoResult, StampListQuery, StampRepository};
use chrono::{DateTime, Utc};

/// Use-case service wrapper for stamp operations.
pub struct StampService<R: StampRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: StampRepository, C: Clock> StampService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Records `label` at the clock's current time.
    pub fn record(&self, label: impl Into<String>) -> RepoResult<Stamp> {
        self.record_at(label, self.clock.now())
    }

    /// Records `label` at a caller-provided instant.
    ///
    /// # Contract
    /// - The returned stamp is read back from the repository, so
    ///   `recorded_at` reflects the stored precision.
    pub fn record_at(
        &self,
        label: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> RepoResult<Stamp> {
        let id = self.repo.create_stamp(&Stamp::new(label, recorded_at))?;
        self.require(id)
    }

    pub fn get(&self, id: StampId) -> RepoResult<Option<Stamp>> {
        self.repo.get_stamp(id)
    }

    /// Gets a stamp, turning absence into `RepoError::NotFound`.
    pub fn require(&self, id: StampId) -> RepoResult<Stamp> {
        self.repo.get_stamp(id)?.ok_or(RepoError::NotFound(id))
    }

    pub fn list(&self, query: &StampListQuery) -> RepoResult<Vec<Stamp>> {
        self.repo.list_stamps(query)
    }

    /// Lists stamps recorded at or after `now - window`.
    ///
    /// A window reaching past the earliest representable instant lists
    /// without a lower bound.
    pub fn list_recent(&self, window: chrono::Duration) -> RepoResult<Vec<Stamp>> {
        let now = self.clock.now();
        self.repo.list_stamps(&StampListQuery {
            from: now.checked_sub_signed(window),
            to: None,
            limit: None,
            offset: 0,
        })
    }

    pub fn delete(&self, id: StampId) -> RepoResult<()> {
        self.repo.delete_stamp(id)
    }
}
