use std::path::Path;

use ath_core::CurveFilter;
use chrono::NaiveDate;
use indexmap::IndexMap;
use market_data::providers::yahoo::YahooConfig;
use serde::Deserialize;
use shared_utils::{
    config::{ConfigError, load_toml},
    env::get_env_var_opt,
};
use tracing::debug;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "ATH_WATCH_CONFIG";

/// Contents of `ath_watch.toml`. Every section is optional.
///
/// A `[presets]` table replaces the built-in index list rather than
/// extending it.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// First day of daily history to request.
    pub start: NaiveDate,
    pub provider: YahooConfig,
    pub curves: CurveFilter,
    /// Display name to ticker, in menu order. The first entry is the default.
    pub presets: IndexMap<String, String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
            provider: YahooConfig::default(),
            curves: CurveFilter::default(),
            presets: default_presets(),
        }
    }
}

fn default_presets() -> IndexMap<String, String> {
    [
        ("S&P 500", "^GSPC"),
        ("Dow Jones Industrial Average", "^DJI"),
        ("NASDAQ Composite", "^IXIC"),
        ("NASDAQ 100", "^NDX"),
        ("Russell 2000", "^RUT"),
        ("PHLX Semiconductor", "^SOX"),
        ("NYSE FANG+TM Index", "^NYFANG"),
    ]
    .into_iter()
    .map(|(name, ticker)| (name.to_string(), ticker.to_string()))
    .collect()
}

impl WatchConfig {
    /// Loads `path`, else the file named by `ATH_WATCH_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => load_toml(path),
            None => match get_env_var_opt(CONFIG_ENV_VAR) {
                Some(path) => load_toml(path),
                None => {
                    debug!("no config file given, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Looks a preset up by name, ignoring ASCII case.
    pub fn preset(&self, name: &str) -> Option<&str> {
        self.presets
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, ticker)| ticker.as_str())
    }

    pub fn default_preset(&self) -> Option<(&str, &str)> {
        self.presets
            .first()
            .map(|(name, ticker)| (name.as_str(), ticker.as_str()))
    }
}
