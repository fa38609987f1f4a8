//! Quote — one trading day of daily history for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV record for a single symbol on a single day.
///
/// Fields that failed to parse in the downloaded CSV hold their zero value
/// (`0.0`, `0`, or the Unix epoch date); the record itself is never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub date: NaiveDate,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

impl Quote {
    /// True when the date column could not be recovered from the source row.
    pub fn has_unknown_date(&self) -> bool {
        self.date == NaiveDate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_on(date: NaiveDate) -> Quote {
        Quote {
            date,
            symbol: "SPY".into(),
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            adj_close: 0.0,
            volume: 0,
        }
    }

    #[test]
    fn epoch_date_is_unknown() {
        assert!(quote_on(NaiveDate::default()).has_unknown_date());
    }

    #[test]
    fn real_date_is_known() {
        let q = quote_on(NaiveDate::from_ymd_opt(2017, 6, 1).unwrap());
        assert!(!q.has_unknown_date());
    }
}
