//! A validated, date-ordered run of daily bars for one symbol.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::bar::DailyBar;

/// Reasons a set of bars cannot form a [`PriceSeries`].
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bar dates must be strictly increasing: {previous} is followed by {next}")]
    NotIncreasing { previous: NaiveDate, next: NaiveDate },

    #[error("bar on {date} contains a non-finite price")]
    NonFinite { date: NaiveDate },
}

/// Ordered sequence of daily bars, strictly increasing by date.
///
/// The series may contain gaps for non-trading days. Construction through
/// [`PriceSeries::new`] enforces ordering, so consumers can index it freely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting unordered, duplicated or non-finite bars.
    pub fn new(symbol: impl Into<String>, bars: Vec<DailyBar>) -> Result<Self, SeriesError> {
        if let Some(bad) = bars.iter().find(|b| !b.is_finite()) {
            return Err(SeriesError::NonFinite { date: bad.date });
        }
        if let Some(pair) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(SeriesError::NotIncreasing {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    /// Adjusted closes in date order.
    pub fn adj_closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.adj_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, px: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: px,
            high: px,
            low: px,
            close: px,
            adj_close: px,
        }
    }

    #[test]
    fn accepts_gaps_between_trading_days() {
        let series = PriceSeries::new("^GSPC", vec![bar(2, 1.0), bar(5, 2.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.symbol(), "^GSPC");
        assert_eq!(series.adj_closes().collect::<Vec<_>>(), vec![1.0, 2.0]);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new("X", vec![bar(2, 1.0), bar(2, 2.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::NotIncreasing { .. }));
    }

    #[test]
    fn rejects_descending_dates() {
        let err = PriceSeries::new("X", vec![bar(3, 1.0), bar(2, 2.0)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NotIncreasing {
                previous: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                next: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            }
        );
    }

    #[test]
    fn rejects_nan_prices() {
        let err = PriceSeries::new("X", vec![bar(2, f64::NAN)]).unwrap_err();
        assert!(matches!(err, SeriesError::NonFinite { .. }));
    }
}
