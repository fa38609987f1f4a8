//! Parse-or-default helpers for CSV fields.
//!
//! Individual fields in a downloaded history file may be empty, `null`, or
//! otherwise garbage. Those fields degrade to a fixed default instead of
//! failing the decode; [`Parsed`] records which path was taken so callers can
//! count fallbacks without treating them as errors.

use chrono::NaiveDate;
use std::str::FromStr;

/// Format of every calendar date the pipeline accepts or emits.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of a parse-or-default: either the parsed value or the recovered default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Defaulted(T),
}

impl<T> Parsed<T> {
    /// The carried value, regardless of how it was obtained.
    pub fn value(self) -> T {
        match self {
            Parsed::Value(v) | Parsed::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Parsed::Defaulted(_))
    }
}

/// Parse `raw` (surrounding whitespace ignored), falling back to `default`.
pub fn parse_or<T: FromStr>(raw: &str, default: T) -> Parsed<T> {
    match raw.trim().parse::<T>() {
        Ok(v) => Parsed::Value(v),
        Err(_) => Parsed::Defaulted(default),
    }
}

/// Parse `raw`, falling back to `T::default()` (zero for numerics).
pub fn parse_or_default<T: FromStr + Default>(raw: &str) -> Parsed<T> {
    parse_or(raw, T::default())
}

/// Strict `yyyy-mm-dd` recognition.
///
/// Only fixed-width, zero-padded dates are accepted, so two recognised dates
/// compare the same lexically as they do chronologically.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT).ok()
}

/// Parse an ISO date, falling back to the zero date (1970-01-01).
pub fn date_or_default(raw: &str) -> Parsed<NaiveDate> {
    match parse_iso_date(raw.trim()) {
        Some(d) => Parsed::Value(d),
        None => Parsed::Defaulted(NaiveDate::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_parse() {
        assert_eq!(parse_or_default::<f64>("142.5"), Parsed::Value(142.5));
        assert_eq!(parse_or_default::<u64>(" 1200 "), Parsed::Value(1200));
    }

    #[test]
    fn garbage_numeric_fields_default_to_zero() {
        assert_eq!(parse_or_default::<f64>("null"), Parsed::Defaulted(0.0));
        assert_eq!(parse_or_default::<f64>(""), Parsed::Defaulted(0.0));
        assert_eq!(parse_or_default::<u64>("12.5"), Parsed::Defaulted(0));
        assert_eq!(parse_or_default::<u64>("-3"), Parsed::Defaulted(0));
    }

    #[test]
    fn explicit_default_is_used() {
        let p = parse_or("x", 7_i64);
        assert!(p.is_defaulted());
        assert_eq!(p.value(), 7);
    }

    #[test]
    fn iso_dates_must_be_zero_padded() {
        assert!(parse_iso_date("2017-06-01").is_some());
        assert!(parse_iso_date("2017-6-01").is_none());
        assert!(parse_iso_date("16-12-31").is_none());
        assert!(parse_iso_date("2017/06/01").is_none());
        assert!(parse_iso_date("2017-02-30").is_none());
        assert!(parse_iso_date("abcd").is_none());
        assert!(parse_iso_date("").is_none());
    }

    #[test]
    fn bad_date_defaults_to_epoch() {
        let p = date_or_default("yesterday");
        assert!(p.is_defaulted());
        assert_eq!(p.value(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }
}
