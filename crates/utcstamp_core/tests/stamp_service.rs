use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;
use utcstamp_core::db::open_db_in_memory;
use utcstamp_core::{
    truncate, FixedClock, Precision, RepoError, RepoResult, SqliteStampRepository, Stamp, StampId,
    StampListQuery, StampRepository, StampService,
};

/// In-memory repository that keeps whole seconds only.
#[derive(Default)]
struct SecondsRepository {
    stamps: RefCell<BTreeMap<StampId, Stamp>>,
}

impl StampRepository for SecondsRepository {
    fn create_stamp(&self, stamp: &Stamp) -> RepoResult<StampId> {
        stamp.validate()?;
        let mut stored = stamp.clone();
        stored.recorded_at = truncate(&stamp.recorded_at, Precision::SECONDS);
        self.stamps.borrow_mut().insert(stamp.id, stored);
        Ok(stamp.id)
    }

    fn get_stamp(&self, id: StampId) -> RepoResult<Option<Stamp>> {
        Ok(self.stamps.borrow().get(&id).cloned())
    }

    fn list_stamps(&self, _query: &StampListQuery) -> RepoResult<Vec<Stamp>> {
        Ok(self.stamps.borrow().values().cloned().collect())
    }

    fn delete_stamp(&self, id: StampId) -> RepoResult<()> {
        self.stamps
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}

fn pinned() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 45).unwrap() + Duration::nanoseconds(678_900_000)
}

#[test]
fn record_uses_injected_clock_at_stored_precision() {
    let conn = open_db_in_memory().unwrap();
    let service = StampService::new(SqliteStampRepository::new(&conn), FixedClock::new(pinned()));

    let stamp = service.record("boot").unwrap();
    let expected = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 45).unwrap() + Duration::milliseconds(678);
    assert_eq!(stamp.recorded_at, expected);
    assert_eq!(service.require(stamp.id).unwrap(), stamp);
}

#[test]
fn record_at_keeps_caller_instant() {
    let conn = open_db_in_memory().unwrap();
    let service = StampService::new(SqliteStampRepository::new(&conn), FixedClock::new(pinned()));

    let explicit = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let stamp = service.record_at("backfill", explicit).unwrap();
    assert_eq!(service.get(stamp.id).unwrap().unwrap().recorded_at, explicit);
}

#[test]
fn list_recent_uses_clock_window() {
    let conn = open_db_in_memory().unwrap();
    let service = StampService::new(SqliteStampRepository::new(&conn), FixedClock::new(pinned()));

    service.record_at("old", pinned() - Duration::hours(2)).unwrap();
    service.record_at("recent", pinned() - Duration::minutes(5)).unwrap();
    service.record("now").unwrap();

    let recent = service.list_recent(Duration::hours(1)).unwrap();
    let labels: Vec<&str> = recent.iter().map(|stamp| stamp.label.as_str()).collect();
    assert_eq!(labels, vec!["recent", "now"]);
    assert_eq!(service.list(&StampListQuery::default()).unwrap().len(), 3);
}

#[test]
fn require_and_delete_report_missing_stamp() {
    let conn = open_db_in_memory().unwrap();
    let service = StampService::new(SqliteStampRepository::new(&conn), FixedClock::new(pinned()));

    let stamp = service.record("temp").unwrap();
    service.delete(stamp.id).unwrap();

    assert!(matches!(service.require(stamp.id), Err(RepoError::NotFound(_))));
    assert!(matches!(service.delete(stamp.id), Err(RepoError::NotFound(_))));
}

#[test]
fn record_returns_repository_precision() {
    let service = StampService::new(SecondsRepository::default(), FixedClock::new(pinned()));

    let stamp = service.record("coarse").unwrap();
    assert_eq!(
        stamp.recorded_at,
        Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 45).unwrap()
    );
    assert_eq!(service.require(stamp.id).unwrap(), stamp);
}

#[test]
fn list_recent_with_huge_window_lists_everything() {
    let conn = open_db_in_memory().unwrap();
    let service = StampService::new(SqliteStampRepository::new(&conn), FixedClock::new(pinned()));

    service.record_at("ancient", Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap()).unwrap();
    service.record("now").unwrap();

    let recent = service.list_recent(Duration::days(100_000_000)).unwrap();
    let labels: Vec<&str> = recent.iter().map(|stamp| stamp.label.as_str()).collect();
    assert_eq!(labels, vec!["ancient", "now"]);
}
