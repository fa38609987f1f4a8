//! Property tests for date range normalization.
//!
//! Uses proptest to verify:
//! 1. Ordering — recognised dates come back in chronological order
//! 2. Empty sides are never moved
//! 3. Conversion — epoch seconds agree with chrono and respect the ordering

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use yfc_core::dates::{order_dates, parse_dates_at};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1970i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── 1. Ordering ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn reversed_dates_are_swapped(a in arb_date(), b in arb_date()) {
        let (a, b) = (iso(a), iso(b));
        let (s, e) = order_dates(&a, &b);
        prop_assert!(s <= e);
        if a > b {
            prop_assert_eq!((s, e), (b.as_str(), a.as_str()));
        } else {
            prop_assert_eq!((s, e), (a.as_str(), b.as_str()));
        }
    }
}

// ── 2. Empty sides ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn empty_side_is_never_moved(a in arb_date()) {
        let a = iso(a);
        prop_assert_eq!(order_dates(&a, ""), (a.as_str(), ""));
        prop_assert_eq!(order_dates("", &a), ("", a.as_str()));
    }
}

// ── 3. Conversion ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn conversion_matches_midnight_utc(a in arb_date(), b in arb_date()) {
        let now = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();
        let (s, e) = parse_dates_at(&iso(a), &iso(b), now);
        let s: i64 = s.parse().unwrap();
        let e: i64 = e.parse().unwrap();

        let ts = |d: NaiveDate| d.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        prop_assert_eq!(s, ts(a.min(b)));
        prop_assert_eq!(e, ts(a.max(b)));
    }

    #[test]
    fn garbage_never_panics(start in ".{0,12}", end in ".{0,12}") {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (s, e) = parse_dates_at(&start, &end, now);
        prop_assert!(s.parse::<i64>().is_ok());
        prop_assert!(e.parse::<i64>().is_ok());
    }
}
