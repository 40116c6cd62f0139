//! Per-run configuration threaded through the engine.

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use market_data::models::instrument::InstrumentInfo;
use serde::Serialize;

use crate::{error::AnalysisError, tz::at_local_time};

/// Everything the engine needs to know about the instrument and the mode of
/// the run. Built once from provider metadata, immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisContext {
    pub symbol: String,

    /// Exchange time zone; minute bars and market-close timestamps live here.
    pub timezone: Tz,

    /// Display abbreviation of the zone, e.g. `EST`.
    pub timezone_abbr: String,

    /// ISO currency code.
    pub currency: String,

    /// Display unit prefixed to prices, e.g. `$`.
    pub unit: String,

    /// Wall-clock time of the closing bell.
    pub close_time: NaiveTime,

    /// Refine extremes with minute bars and take them from daily highs/lows.
    /// When false, extremes come from closes and are stamped at market close.
    pub intraday: bool,
}

impl AnalysisContext {
    /// Derives the context from provider metadata.
    ///
    /// Fails with [`AnalysisError::InvalidInstrument`] when the instrument has
    /// no currency or an unknown exchange time zone.
    pub fn from_instrument(info: &InstrumentInfo, intraday: bool) -> Result<Self, AnalysisError> {
        let invalid = |reason: String| AnalysisError::InvalidInstrument {
            symbol: info.symbol.clone(),
            reason,
        };

        let currency = info
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| invalid("no currency metadata".to_string()))?
            .to_uppercase();
        let timezone: Tz = info
            .exchange_timezone
            .parse()
            .map_err(|_| invalid(format!("unknown time zone {:?}", info.exchange_timezone)))?;

        Ok(Self {
            symbol: info.symbol.clone(),
            timezone,
            timezone_abbr: info
                .timezone_abbr
                .clone()
                .unwrap_or_else(|| timezone.name().to_string()),
            unit: display_unit(&currency),
            close_time: close_time_for(&currency),
            currency,
            intraday,
        })
    }

    /// `day` at the closing bell in the exchange zone.
    pub fn market_close(&self, day: NaiveDate) -> DateTime<Tz> {
        at_local_time(day, self.close_time, self.timezone)
    }
}

/// Closing-bell convention by currency: Tokyo listings 15:45, everything else 16:00.
pub fn close_time_for(currency: &str) -> NaiveTime {
    let (h, m) = match currency {
        "JPY" => (15, 45),
        _ => (16, 0),
    };
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

pub fn display_unit(currency: &str) -> String {
    match currency {
        "USD" => "$".to_string(),
        "JPY" => "¥".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{other} "),
    }
}
