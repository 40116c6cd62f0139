use std::{num::NonZeroU32, time::Duration};

use chrono::{DateTime, Utc};
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};

use crate::models::interval::Interval;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) ath-watch";

/// Connection settings for [`YahooProvider`](super::YahooProvider).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YahooConfig {
    /// Scheme and host of the chart API.
    pub base_url: String,

    /// Per-request timeout in seconds. Also reported as the minute-fetch bound.
    pub timeout_secs: u64,

    /// Client-side request quota.
    pub requests_per_second: NonZeroU32,

    /// `User-Agent` header; the API rejects anonymous clients.
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            requests_per_second: nonzero!(2u32),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl YahooConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Time window of a chart request.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartRange {
    /// `[start, end)` in absolute time.
    Period {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// The most recent trading day; used for metadata lookups.
    LatestDay,
}

/// Parameters of one chart request.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartQuery {
    pub range: ChartRange,
    pub interval: Interval,
    /// Ask for dividend and split events so `adjclose` is populated.
    pub with_events: bool,
}

/// Builds the query string pairs for a chart request.
pub fn construct_params(query: &ChartQuery) -> Vec<(String, String)> {
    let mut params = Vec::with_capacity(5);
    match &query.range {
        ChartRange::Period { start, end } => {
            params.push(("period1".to_string(), start.timestamp().to_string()));
            params.push(("period2".to_string(), end.timestamp().to_string()));
        }
        ChartRange::LatestDay => params.push(("range".to_string(), "1d".to_string())),
    }
    params.push(("interval".to_string(), query.interval.to_string()));
    params.push(("includePrePost".to_string(), "false".to_string()));
    if query.with_events {
        params.push(("events".to_string(), "div,split".to_string()));
    }
    params
}
