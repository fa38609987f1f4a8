//! Date range normalization.
//!
//! Converts a user-supplied `yyyy-mm-dd` start/end pair into the epoch-second
//! strings the download endpoint expects. Nothing here fails: a missing or
//! unrecognised start means "since the beginning" (`"0"`), a missing or
//! unrecognised end means "up to now".

use crate::parse::parse_iso_date;
use chrono::{DateTime, NaiveDate, Utc};

/// Lower bound used when no usable start date is given.
pub const EPOCH_START: &str = "0";

/// Put a start/end pair in chronological order.
///
/// Swaps only when both sides are recognised ISO dates and `start > end`.
/// Lexical comparison is sound because recognised dates are fixed-width and
/// zero-padded. An empty or unrecognised side is never reordered.
pub fn order_dates<'a>(start: &'a str, end: &'a str) -> (&'a str, &'a str) {
    let both_dates = parse_iso_date(start).is_some() && parse_iso_date(end).is_some();
    if both_dates && start > end {
        (end, start)
    } else {
        (start, end)
    }
}

/// Convert a start/end pair to epoch-second strings, using the current time
/// as the default upper bound.
pub fn parse_dates(start: &str, end: &str) -> (String, String) {
    parse_dates_at(start, end, Utc::now())
}

/// Same as [`parse_dates`] with the "now" bound supplied by the caller.
pub fn parse_dates_at(start: &str, end: &str, now: DateTime<Utc>) -> (String, String) {
    let (start, end) = order_dates(start, end);

    let start_unix = parse_iso_date(start)
        .map(midnight_utc)
        .map(|ts| ts.to_string())
        .unwrap_or_else(|| EPOCH_START.to_string());

    let end_unix = parse_iso_date(end)
        .map(midnight_utc)
        .unwrap_or_else(|| now.timestamp())
        .to_string();

    (start_unix, end_unix)
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}
