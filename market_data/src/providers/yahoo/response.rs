use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::models::{
    bar::{DailyBar, MinuteBar},
    instrument::{InstrumentInfo, MarketState, Quote},
};

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    pub exchange_timezone_name: String,
    #[serde(rename = "timezone")]
    pub timezone_abbr: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_time: Option<i64>,
    pub current_trading_period: Option<TradingPeriods>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TradingPeriods {
    pub pre: TradingPeriod,
    pub regular: TradingPeriod,
    pub post: TradingPeriod,
}

/// Session window in unix seconds, `[start, end)`.
#[derive(Deserialize, Debug, Clone)]
pub struct TradingPeriod {
    pub start: i64,
    pub end: i64,
}

#[derive(Deserialize, Debug, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseIndicator>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AdjCloseIndicator {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl TradingPeriod {
    fn contains(&self, ts: i64) -> bool {
        self.start <= ts && ts < self.end
    }
}

impl TradingPeriods {
    /// Session state at unix time `now`.
    pub fn state_at(&self, now: i64) -> MarketState {
        if self.regular.contains(now) {
            MarketState::Open
        } else if self.pre.contains(now) {
            MarketState::Pre
        } else if self.post.contains(now) {
            MarketState::Post
        } else {
            MarketState::Closed
        }
    }
}

/// One fully populated row of the indicator arrays.
struct Row {
    ts: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    adj_close: f64,
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten().filter(|v| v.is_finite())
}

impl ChartResult {
    /// Parses `exchangeTimezoneName`.
    pub fn timezone(&self) -> Option<Tz> {
        self.meta.exchange_timezone_name.parse().ok()
    }

    /// Rows with every price present. Rows with a null anywhere are dropped;
    /// a missing `adjclose` indicator falls back to the close.
    fn rows(&self) -> Vec<Row> {
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };
        let adj = self.indicators.adjclose.first().map(|a| a.adjclose.as_slice());

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let close = value_at(&quote.close, i)?;
                let adj_close = match adj {
                    Some(values) => value_at(values, i)?,
                    None => close,
                };
                Some(Row {
                    ts,
                    open: value_at(&quote.open, i)?,
                    high: value_at(&quote.high, i)?,
                    low: value_at(&quote.low, i)?,
                    close,
                    adj_close,
                })
            })
            .collect()
    }

    /// Daily bars dated in the exchange zone. A live, not yet closed day can be
    /// reported twice; the later row wins.
    pub fn daily_bars(&self, tz: Tz) -> Vec<DailyBar> {
        let mut by_date: BTreeMap<NaiveDate, DailyBar> = BTreeMap::new();
        for row in self.rows() {
            let Some(utc) = DateTime::<Utc>::from_timestamp(row.ts, 0) else {
                continue;
            };
            let date = utc.with_timezone(&tz).date_naive();
            by_date.insert(
                date,
                DailyBar {
                    date,
                    open: row.open,
                    high: row.high,
                    low: row.low,
                    close: row.close,
                    adj_close: row.adj_close,
                },
            );
        }
        by_date.into_values().collect()
    }

    /// Minute bars of `day` localized to `tz`, in timestamp order.
    pub fn minute_bars(&self, tz: Tz, day: NaiveDate) -> Vec<MinuteBar> {
        let mut bars: Vec<MinuteBar> = self
            .rows()
            .into_iter()
            .filter_map(|row| {
                let timestamp = tz.timestamp_opt(row.ts, 0).single()?;
                (timestamp.date_naive() == day).then_some(MinuteBar {
                    timestamp,
                    open: row.open,
                    high: row.high,
                    low: row.low,
                    close: row.close,
                })
            })
            .collect();
        bars.sort_by_key(|b| b.timestamp);
        bars
    }

    /// Instrument metadata with a quote when the meta block carries one.
    pub fn instrument_info(&self, now: DateTime<Utc>) -> InstrumentInfo {
        let meta = &self.meta;
        let quote = match (meta.regular_market_price, meta.regular_market_time) {
            (Some(last_price), Some(ts)) => {
                DateTime::<Utc>::from_timestamp(ts, 0).map(|timestamp| Quote {
                    last_price,
                    timestamp,
                    market_state: meta
                        .current_trading_period
                        .as_ref()
                        .map_or(MarketState::Closed, |p| p.state_at(now.timestamp())),
                })
            }
            _ => None,
        };
        InstrumentInfo {
            symbol: meta.symbol.clone(),
            currency: meta.currency.clone().filter(|c| !c.trim().is_empty()),
            exchange_timezone: meta.exchange_timezone_name.clone(),
            timezone_abbr: meta.timezone_abbr.clone(),
            quote,
        }
    }
}
