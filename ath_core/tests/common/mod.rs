#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use market_data::{
    models::{
        bar::{DailyBar, MinuteBar},
        instrument::{InstrumentInfo, MarketState, Quote},
        series::PriceSeries,
    },
    providers::{ApiSnafu, DataProvider, InternalSnafu, ProviderError},
};

/// How the mock answers minute-bar requests.
#[derive(Clone, Debug)]
pub enum MinuteMode {
    /// Bars keyed by day; unknown days yield an empty vec.
    Bars(HashMap<NaiveDate, Vec<MinuteBar>>),
    Fail,
    /// Sleeps this long before answering with no bars.
    Hang(Duration),
}

/// In-memory provider: fixed daily bars, fixed metadata, scripted minute bars.
pub struct MockProvider {
    pub info: Option<InstrumentInfo>,
    /// Fail `get_info` as if the request never reached the API.
    pub info_unreachable: bool,
    pub daily: Vec<DailyBar>,
    pub minute: MinuteMode,
    pub timeout: Duration,
    pub minute_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(info: InstrumentInfo, daily: Vec<DailyBar>) -> Self {
        Self {
            info: Some(info),
            info_unreachable: false,
            daily,
            minute: MinuteMode::Bars(HashMap::new()),
            timeout: Duration::from_secs(10),
            minute_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_minute(mut self, minute: MinuteMode) -> Self {
        self.minute = minute;
        self
    }

    pub fn minute_calls(&self) -> usize {
        self.minute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProvider for MockProvider {
    async fn get_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let bars = self
            .daily
            .iter()
            .filter(|b| b.date >= start)
            .cloned()
            .collect();
        PriceSeries::new(symbol, bars).map_err(|e| {
            ApiSnafu {
                message: e.to_string(),
            }
            .build()
        })
    }

    async fn get_minute(
        &self,
        _symbol: &str,
        day: NaiveDate,
        _tz: Tz,
    ) -> Result<Vec<MinuteBar>, ProviderError> {
        self.minute_calls.fetch_add(1, Ordering::SeqCst);
        match &self.minute {
            MinuteMode::Bars(by_day) => Ok(by_day.get(&day).cloned().unwrap_or_default()),
            MinuteMode::Fail => ApiSnafu {
                message: "minute data unavailable",
            }
            .fail(),
            MinuteMode::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Vec::new())
            }
        }
    }

    async fn get_info(&self, symbol: &str) -> Result<InstrumentInfo, ProviderError> {
        if self.info_unreachable {
            return InternalSnafu {
                message: "connection reset by peer",
            }
            .fail();
        }
        match &self.info {
            Some(info) => Ok(info.clone()),
            None => ApiSnafu {
                message: format!("No data found, symbol may be delisted: {symbol}"),
            }
            .fail(),
        }
    }

    fn minute_timeout(&self) -> Duration {
        self.timeout
    }
}

pub fn ny() -> Tz {
    chrono_tz::America::New_York
}

pub fn usd_info(symbol: &str) -> InstrumentInfo {
    InstrumentInfo {
        symbol: symbol.to_string(),
        currency: Some("USD".to_string()),
        exchange_timezone: "America/New_York".to_string(),
        timezone_abbr: Some("EST".to_string()),
        quote: None,
    }
}

pub fn with_quote(mut info: InstrumentInfo, price: f64) -> InstrumentInfo {
    info.quote = Some(Quote {
        last_price: price,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
        market_state: MarketState::Open,
    });
    info
}

pub fn day(i: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i)
}

/// One bar per calendar day from 2024-01-01; high and low sit one point
/// around the close.
pub fn daily_bars(closes: &[f64]) -> Vec<DailyBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| DailyBar {
            date: day(i as u64),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            adj_close: c,
        })
        .collect()
}

pub fn minute_at(day: NaiveDate, h: u32, m: u32, high: f64, low: f64) -> MinuteBar {
    let naive = day.and_hms_opt(h, m, 0).unwrap();
    MinuteBar {
        timestamp: ny().from_local_datetime(&naive).unwrap(),
        open: low,
        high,
        low,
        close: low,
    }
}
