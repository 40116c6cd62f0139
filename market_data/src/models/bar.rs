//! Canonical in-memory representation of daily and intraday bars.
//!
//! These structs are the standard output of every
//! [`DataProvider`](crate::providers::DataProvider) implementation.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One calendar day's trading record.
///
/// Dates are exchange-local. Bars are immutable once retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading day in the exchange's time zone.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the day.
    pub high: f64,

    /// Lowest price during the day.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Split and dividend adjusted close. This is the field episodes are
    /// segmented on.
    pub adj_close: f64,
}

impl DailyBar {
    /// True when every price field is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.adj_close]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// A single minute-resolution bar, localized to the exchange time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteBar {
    /// Start of the minute in the exchange's time zone.
    pub timestamp: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
