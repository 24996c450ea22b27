use chrono::{TimeZone, Utc};
use utcstamp_core::{Stamp, StampValidationError};
use uuid::Uuid;

#[test]
fn new_generates_non_nil_id() {
    let stamp = Stamp::new("boot", Utc::now());
    assert!(!stamp.id.is_nil());
    assert!(stamp.validate().is_ok());
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = Stamp::with_id(Uuid::nil(), "boot", Utc::now()).unwrap_err();
    assert_eq!(err, StampValidationError::NilId);
}

#[test]
fn validate_rejects_blank_and_oversized_labels() {
    let mut stamp = Stamp::new(" \t", Utc::now());
    assert_eq!(stamp.validate().unwrap_err(), StampValidationError::BlankLabel);

    stamp.label = "x".repeat(256);
    assert_eq!(
        stamp.validate().unwrap_err(),
        StampValidationError::LabelTooLong {
            chars: 256,
            max: 255
        }
    );
}

#[test]
fn serialization_uses_rfc3339_utc() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let recorded_at = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 45).unwrap();
    let stamp = Stamp::with_id(id, "release", recorded_at).unwrap();

    let json = serde_json::to_value(&stamp).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["label"], "release");
    assert_eq!(json["recorded_at"], "2024-03-15T08:30:45Z");

    let decoded: Stamp = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, stamp);
}

#[test]
fn validate_rejects_years_outside_four_digits() {
    let stamp = Stamp::new("far", Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(
        stamp.validate().unwrap_err(),
        StampValidationError::UnstorableInstant { year: 10000 }
    );

    let stamp = Stamp::new("edge", Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap());
    assert!(stamp.validate().is_ok());
}
