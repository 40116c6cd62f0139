use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, header};
use shared_utils::env::get_env_var_opt;
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use crate::{
    models::{
        bar::MinuteBar, instrument::InstrumentInfo, interval::Interval, series::PriceSeries,
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, DecodeSnafu, InternalSnafu, InvalidHeaderSnafu,
        ProviderError, ProviderInitError, ReqwestSnafu, ValidationSnafu,
        yahoo::{
            params::{ChartQuery, ChartRange, YahooConfig, construct_params},
            response::{ChartResponse, ChartResult},
        },
    },
};

const CHART_PATH: &str = "/v8/finance/chart/";

pub struct YahooProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
    limiter: DefaultDirectRateLimiter,
}

impl YahooProvider {
    /// Creates a provider with default settings.
    ///
    /// The `YAHOO_BASE_URL` and `YAHOO_USER_AGENT` environment variables, when
    /// set, override the defaults.
    pub fn new() -> Result<Self, ProviderInitError> {
        let mut config = YahooConfig::default();
        if let Some(url) = get_env_var_opt("YAHOO_BASE_URL") {
            config.base_url = url;
        }
        if let Some(agent) = get_env_var_opt("YAHOO_USER_AGENT") {
            config.user_agent = agent;
        }
        Self::with_config(config)
    }

    pub fn with_config(config: YahooConfig) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent).context(InvalidHeaderSnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            limiter: RateLimiter::direct(Quota::per_second(config.requests_per_second)),
        })
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        query: &ChartQuery,
    ) -> Result<ChartResult, ProviderError> {
        self.limiter.until_ready().await;

        let url = format!("{}{CHART_PATH}{symbol}", self.base_url);
        debug!(%symbol, interval = %query.interval, "requesting chart");
        let response = self
            .client
            .get(&url)
            .query(&construct_params(query))
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChartResponse>(&body)
                .ok()
                .and_then(|r| r.chart.error)
                .map_or_else(
                    || format!("HTTP {status}"),
                    |err| format!("{}: {}", err.code, err.description),
                );
            return ApiSnafu { message }.fail();
        }

        let envelope = serde_json::from_str::<ChartResponse>(&body)
            .context(DecodeSnafu { symbol })?
            .chart;
        if let Some(err) = envelope.error {
            return ApiSnafu {
                message: format!("{}: {}", err.code, err.description),
            }
            .fail();
        }
        envelope
            .result
            .and_then(|r| r.into_iter().next())
            .context(ApiSnafu {
                message: format!("no chart result for {symbol}"),
            })
    }
}

fn exchange_zone(result: &ChartResult) -> Result<Tz, ProviderError> {
    result.timezone().context(InternalSnafu {
        message: format!(
            "unknown exchange time zone {:?}",
            result.meta.exchange_timezone_name
        ),
    })
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn get_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let query = ChartQuery {
            range: ChartRange::Period {
                start: start.and_time(NaiveTime::MIN).and_utc(),
                end: Utc::now(),
            },
            interval: Interval::OneDay,
            with_events: true,
        };
        let result = self.fetch_chart(symbol, &query).await?;
        let tz = exchange_zone(&result)?;
        let bars = result.daily_bars(tz);
        debug!(%symbol, bars = bars.len(), "daily series received");

        PriceSeries::new(symbol, bars).map_err(|e| {
            InternalSnafu {
                message: e.to_string(),
            }
            .build()
        })
    }

    async fn get_minute(
        &self,
        symbol: &str,
        day: NaiveDate,
        tz: Tz,
    ) -> Result<Vec<MinuteBar>, ProviderError> {
        let next = day.checked_add_days(Days::new(1)).context(ValidationSnafu {
            message: format!("day {day} out of range"),
        })?;
        let local_midnight = |d: NaiveDate| {
            tz.from_local_datetime(&d.and_time(NaiveTime::MIN))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .context(ValidationSnafu {
                    message: format!("midnight of {d} does not exist in {tz}"),
                })
        };

        let query = ChartQuery {
            range: ChartRange::Period {
                start: local_midnight(day)?,
                end: local_midnight(next)?,
            },
            interval: Interval::OneMinute,
            with_events: false,
        };
        let result = self.fetch_chart(symbol, &query).await?;
        Ok(result.minute_bars(tz, day))
    }

    async fn get_info(&self, symbol: &str) -> Result<InstrumentInfo, ProviderError> {
        let query = ChartQuery {
            range: ChartRange::LatestDay,
            interval: Interval::OneDay,
            with_events: false,
        };
        let result = self.fetch_chart(symbol, &query).await?;
        Ok(result.instrument_info(Utc::now()))
    }

    fn minute_timeout(&self) -> Duration {
        self.timeout
    }
}
