//! Two-tier extremum refinement.
//!
//! Daily bars give the authoritative value of an extreme but only its day.
//! Minute bars give the time of day but are often unavailable: providers keep
//! only a few weeks of them, and holidays or outages leave gaps. The locator
//! asks for the minute bars of the extreme's day and, when they are usable,
//! stamps the extremum with the minute the extreme was printed. Otherwise the
//! extremum is stamped with the market close of that day.
//!
//! Either way the outcome is a [`Refinement`] value; a failed fetch is never
//! an error for the caller.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use market_data::{
    models::bar::{DailyBar, MinuteBar},
    providers::DataProvider,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::AnalysisContext;

/// Which extreme is being located.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Seek {
    High,
    Low,
}

/// Why a refinement fell back to the market-close timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The run is in closing mode; no fetch was attempted.
    IntradayDisabled,
    /// The provider returned an error.
    FetchFailed(String),
    /// The provider did not answer within its minute timeout.
    TimedOut,
    /// The fetch succeeded but yielded no usable bar.
    NoData,
}

/// Outcome of locating an extreme within its day.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Refinement {
    /// Pinned to the minute bar that printed the extreme.
    Refined { timestamp: DateTime<Tz> },
    /// Stamped at the market close of the extreme's day.
    Fallback {
        timestamp: DateTime<Tz>,
        reason: FallbackReason,
    },
}

impl Refinement {
    pub fn timestamp(&self) -> DateTime<Tz> {
        match self {
            Refinement::Refined { timestamp } | Refinement::Fallback { timestamp, .. } => {
                *timestamp
            }
        }
    }

    pub fn is_refined(&self) -> bool {
        matches!(self, Refinement::Refined { .. })
    }
}

/// A high or low of interest: the day it happened, its daily price, and once
/// located, when within that day it happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Extremum {
    pub date: NaiveDate,
    pub price: f64,
    pub refinement: Option<Refinement>,
}

impl Extremum {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price,
            refinement: None,
        }
    }

    /// The daily extreme of `bars`, ties resolved to the last day.
    ///
    /// Intraday runs read highs and lows; closing runs read closes.
    pub fn from_daily(bars: &[DailyBar], seek: Seek, intraday: bool) -> Option<Self> {
        let value = |b: &DailyBar| match (seek, intraday) {
            (Seek::High, true) => b.high,
            (Seek::Low, true) => b.low,
            (_, false) => b.close,
        };
        last_extreme(bars, seek, value).map(|b| Self::new(b.date, value(b)))
    }

    pub fn timestamp(&self) -> Option<DateTime<Tz>> {
        self.refinement.as_ref().map(Refinement::timestamp)
    }
}

/// The element with the extreme finite `value`, keeping the last on ties.
fn last_extreme<T>(items: &[T], seek: Seek, value: impl Fn(&T) -> f64) -> Option<&T> {
    items
        .iter()
        .filter(|item| value(*item).is_finite())
        .fold(None, |best: Option<&T>, item| match best {
            None => Some(item),
            Some(b) => {
                let (v, bv) = (value(item), value(b));
                let better = match seek {
                    Seek::High => v >= bv,
                    Seek::Low => v <= bv,
                };
                Some(if better { item } else { b })
            }
        })
}

/// The minute bar with the highest high or lowest low; the later bar wins a tie.
pub fn pick_minute_extreme(bars: &[MinuteBar], seek: Seek) -> Option<&MinuteBar> {
    last_extreme(bars, seek, |b| match seek {
        Seek::High => b.high,
        Seek::Low => b.low,
    })
}

/// Refines extremes for one analysis run.
pub struct ExtremeLocator<'a, P: ?Sized> {
    provider: &'a P,
    context: &'a AnalysisContext,
}

impl<'a, P: DataProvider + ?Sized> ExtremeLocator<'a, P> {
    pub fn new(provider: &'a P, context: &'a AnalysisContext) -> Self {
        Self { provider, context }
    }

    /// Locates the `seek` extreme within `day`.
    pub async fn locate(&self, day: NaiveDate, seek: Seek) -> Refinement {
        if !self.context.intraday {
            return self.fallback(day, FallbackReason::IntradayDisabled);
        }

        let fetch = self
            .provider
            .get_minute(&self.context.symbol, day, self.context.timezone);
        let reason = match tokio::time::timeout(self.provider.minute_timeout(), fetch).await {
            Ok(Ok(bars)) => match pick_minute_extreme(&bars, seek) {
                Some(bar) => {
                    debug!(
                        symbol = %self.context.symbol,
                        %day,
                        ?seek,
                        at = %bar.timestamp,
                        "extreme refined"
                    );
                    return Refinement::Refined {
                        timestamp: bar.timestamp,
                    };
                }
                None => FallbackReason::NoData,
            },
            Ok(Err(e)) => FallbackReason::FetchFailed(e.to_string()),
            Err(_) => FallbackReason::TimedOut,
        };

        warn!(
            symbol = %self.context.symbol,
            %day,
            ?seek,
            ?reason,
            "intraday refinement unavailable, using market close"
        );
        self.fallback(day, reason)
    }

    /// Fills in `extremum.refinement`. The price is left untouched.
    pub async fn refine(&self, extremum: &mut Extremum, seek: Seek) {
        extremum.refinement = Some(self.locate(extremum.date, seek).await);
    }

    fn fallback(&self, day: NaiveDate, reason: FallbackReason) -> Refinement {
        Refinement::Fallback {
            timestamp: self.context.market_close(day),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone};

    use super::*;

    fn ny() -> Tz {
        "America/New_York".parse().unwrap()
    }

    fn minute(h: u32, m: u32, high: f64, low: f64) -> MinuteBar {
        MinuteBar {
            timestamp: ny().with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap(),
            open: low,
            high,
            low,
            close: low,
        }
    }

    fn daily(d: u32, high: f64, low: f64, close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            open: close,
            high,
            low,
            close,
            adj_close: close,
        }
    }

    #[test]
    fn equal_highs_pick_the_later_minute() {
        let bars = [
            minute(9, 30, 10.0, 9.0),
            minute(11, 0, 12.0, 9.5),
            minute(14, 15, 12.0, 9.8),
            minute(15, 0, 11.0, 9.9),
        ];
        let got = pick_minute_extreme(&bars, Seek::High).unwrap();
        assert_eq!(got.timestamp, bars[2].timestamp);
    }

    #[test]
    fn equal_lows_pick_the_later_minute() {
        let bars = [minute(9, 30, 10.0, 9.0), minute(10, 0, 10.0, 9.0)];
        let got = pick_minute_extreme(&bars, Seek::Low).unwrap();
        assert_eq!(got.timestamp, bars[1].timestamp);
    }

    #[test]
    fn non_finite_minutes_are_ignored() {
        let bars = [minute(9, 30, f64::NAN, f64::NAN)];
        assert!(pick_minute_extreme(&bars, Seek::High).is_none());
        assert!(pick_minute_extreme(&[], Seek::Low).is_none());
    }

    #[test]
    fn daily_extreme_uses_high_low_in_intraday_mode() {
        let bars = [daily(1, 12.0, 8.0, 10.0), daily(4, 11.0, 7.0, 10.5)];
        let high = Extremum::from_daily(&bars, Seek::High, true).unwrap();
        assert_eq!((high.date.day0(), high.price), (0, 12.0));
        let low = Extremum::from_daily(&bars, Seek::Low, true).unwrap();
        assert_eq!((low.date.day0(), low.price), (3, 7.0));
        assert!(high.refinement.is_none());
    }

    #[test]
    fn daily_extreme_uses_close_in_closing_mode_and_keeps_last_tie() {
        let bars = [
            daily(1, 20.0, 1.0, 10.5),
            daily(4, 11.0, 7.0, 10.5),
            daily(5, 11.0, 7.0, 10.0),
        ];
        let high = Extremum::from_daily(&bars, Seek::High, false).unwrap();
        assert_eq!(high.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(high.price, 10.5);
    }
}
