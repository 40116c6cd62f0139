//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the capability interface the
//! analysis engine is handed at construction time. It covers the three things
//! the engine needs from a vendor: a daily series, the minute bars of a single
//! day, and instrument metadata.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn DataProvider`) for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use chrono::NaiveDate;
//! use chrono_tz::Tz;
//! use market_data::models::{
//!     bar::MinuteBar, instrument::InstrumentInfo, series::PriceSeries,
//! };
//! use market_data::providers::{ApiSnafu, DataProvider, ProviderError};
//!
//! struct Offline;
//!
//! #[async_trait]
//! impl DataProvider for Offline {
//!     async fn get_daily(
//!         &self,
//!         symbol: &str,
//!         _start: NaiveDate,
//!     ) -> Result<PriceSeries, ProviderError> {
//!         Ok(PriceSeries::new(symbol, vec![]).unwrap())
//!     }
//!
//!     async fn get_minute(
//!         &self,
//!         _symbol: &str,
//!         _day: NaiveDate,
//!         _tz: Tz,
//!     ) -> Result<Vec<MinuteBar>, ProviderError> {
//!         Ok(vec![])
//!     }
//!
//!     async fn get_info(&self, symbol: &str) -> Result<InstrumentInfo, ProviderError> {
//!         ApiSnafu { message: format!("{symbol} unknown") }.fail()
//!     }
//! }
//! ```

pub mod yahoo;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::MinuteBar, instrument::InstrumentInfo, series::PriceSeries};

/// Trait for fetching price data from a market data provider.
///
/// Implement this trait for each concrete data vendor.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the daily series for `symbol` from `start` (inclusive) to today.
    async fn get_daily(&self, symbol: &str, start: NaiveDate) -> Result<PriceSeries, ProviderError>;

    /// Fetches the minute bars of one exchange-local calendar day.
    ///
    /// # Returns
    ///
    /// * `Ok(bars)` - The request succeeded; `bars` may be empty (holiday,
    ///   data older than the provider keeps).
    /// * `Err(ProviderError)` - The request itself failed.
    async fn get_minute(
        &self,
        symbol: &str,
        day: NaiveDate,
        tz: Tz,
    ) -> Result<Vec<MinuteBar>, ProviderError>;

    /// Fetches instrument metadata and the latest quote.
    async fn get_info(&self, symbol: &str) -> Result<InstrumentInfo, ProviderError>;

    /// Upper bound callers should allow a [`get_minute`](Self::get_minute)
    /// request before treating it as failed.
    fn minute_timeout(&self) -> Duration {
        Duration::from_secs(10)
    }
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Header value contains invalid characters.
    #[snafu(display("Invalid header value: {source}"))]
    InvalidHeader {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message (e.g., unknown symbol).
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body did not match the expected shape.
    #[snafu(display("Malformed response for {symbol}: {source}"))]
    Decode {
        symbol: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },
}
