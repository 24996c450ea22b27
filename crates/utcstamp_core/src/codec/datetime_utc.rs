//! UTC datetime codec for timezone-naive datetime columns.
//!
//! # Responsibility
//! - Encode instants as `YYYY-MM-DD HH:MM:SS[.fff]` text without a zone.
//! - Decode stored text back into UTC instants.
//!
//! # Invariants
//! - Encoding truncates fractional seconds; it never rounds.
//! - Stored text is always read as UTC, independent of the host timezone.
//! - `decode(encode(i, p)) == truncate(i, p)` for every instant `i`.

use super::{CodecError, CodecResult, Precision};
use crate::clock::Clock;
use chrono::{DateTime, Datelike, SecondsFormat, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static STORED_DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{1,9})?$")
        .expect("valid stored datetime regex")
});

/// Years representable by four-digit stored text.
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Returns whether `instant` encodes to text that `decode` reads back.
pub fn is_storable(instant: &DateTime<Utc>) -> bool {
    STORABLE_YEARS.contains(&instant.year())
}

/// Renders the canonical `YYYY-MM-DDTHH:MM:SS.mmmZ` form of an instant.
///
/// Sub-millisecond digits are dropped, not rounded.
pub fn canonical_utc(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Encodes `instant` as stored datetime text with `precision` fractional digits.
///
/// # Contract
/// - Output is `precision.text_len()` characters for storable instants
///   (see `is_storable`); other years encode with a signed extended year
///   that `decode` rejects.
/// - Output carries no timezone designator.
/// - Never fails.
pub fn encode(instant: &DateTime<Utc>, precision: Precision) -> String {
    let canonical = canonical_utc(instant);
    // Extended years (`+10000`) widen the date part, so cut relative to the dot.
    let seconds_end = canonical
        .rfind('.')
        .unwrap_or_else(|| canonical.len().saturating_sub(1));
    let cutoff = seconds_end + precision.suffix_len();

    canonical[..cutoff].replacen('T', " ", 1)
}

/// Encodes the clock's current time.
///
/// Stands in for the "defaults to now" write path so the time source stays
/// injectable.
pub fn encode_now(clock: &dyn Clock, precision: Precision) -> String {
    encode(&clock.now(), precision)
}

/// Decodes stored datetime text into a UTC instant.
///
/// # Errors
/// - `CodecError::Malformed` when `text` does not match
///   `YYYY-MM-DD HH:MM:SS[.f+]`.
/// - `CodecError::OutOfRange` when the fields name no real instant
///   (e.g. month `13`).
pub fn decode(text: &str) -> CodecResult<DateTime<Utc>> {
    if !STORED_DATETIME_RE.is_match(text) {
        return Err(CodecError::Malformed {
            text: text.to_string(),
        });
    }

    let canonical = format!("{}Z", text.replacen(' ', "T", 1));
    DateTime::parse_from_rfc3339(&canonical)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| CodecError::OutOfRange {
            text: text.to_string(),
        })
}

/// Drops every fractional-second digit past `precision`.
///
/// This is the value `decode(encode(instant, precision))` yields.
pub fn truncate(instant: &DateTime<Utc>, precision: Precision) -> DateTime<Utc> {
    let unit = 10_u32.pow(9 - u32::from(precision.digits()));
    let nanos = instant.nanosecond();
    instant
        .with_nanosecond(nanos - nanos % unit)
        .unwrap_or(*instant)
}
