use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trading session the market is in when the quote was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketState {
    Pre,
    Open,
    Post,
    Closed,
}

/// Latest quote for an instrument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub last_price: f64,
    pub timestamp: DateTime<Utc>,
    pub market_state: MarketState,
}

/// Instrument metadata as reported by the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    /// Provider symbol (e.g. `"^GSPC"`, `"7203.T"`).
    pub symbol: String,

    /// ISO currency code. Missing when the provider could not resolve the
    /// instrument properly.
    pub currency: Option<String>,

    /// IANA time zone name of the listing exchange (e.g. `"America/New_York"`).
    pub exchange_timezone: String,

    /// Short zone abbreviation for display (e.g. `"EST"`).
    pub timezone_abbr: Option<String>,

    pub quote: Option<Quote>,
}
