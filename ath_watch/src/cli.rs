use std::path::PathBuf;

use anyhow::{Context, bail};
use ath_core::{AnalysisRequest, CurveFilter};
use chrono::NaiveDate;
use clap::Parser;

use crate::config::WatchConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Where is the all-time-high, and how far away is it?")]
pub struct Cli {
    /// Path to the config file (ath_watch.toml). Defaults to $ATH_WATCH_CONFIG.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ticker to analyze (e.g. "AAPL", "7203.T")
    #[arg(short, long, conflicts_with = "index")]
    pub symbol: Option<String>,

    /// Configured index preset (e.g. "S&P 500"). Defaults to the first preset.
    #[arg(short, long)]
    pub index: Option<String>,

    /// Only chart episodes starting in or after this year
    #[arg(long)]
    pub since: Option<i32>,

    /// Drop charted episodes recovered within this many days
    #[arg(long)]
    pub min_days: Option<i64>,

    /// Use daily closes only and skip intraday refinement
    #[arg(long)]
    pub closing: bool,

    /// First day of history to download (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Print the full analysis as JSON instead of the status report
    #[arg(long)]
    pub json: bool,

    /// List the configured presets and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Resolves flags against `config` into a request. Flags win over the file.
    pub fn request(&self, config: &WatchConfig) -> anyhow::Result<AnalysisRequest> {
        let symbol = match (&self.symbol, &self.index) {
            (Some(symbol), _) => symbol.trim().to_string(),
            (None, Some(name)) => config
                .preset(name)
                .with_context(|| format!("Unknown index preset {name:?}; see --list"))?
                .to_string(),
            (None, None) => match config.default_preset() {
                Some((_, ticker)) => ticker.to_string(),
                None => bail!("No --symbol given and no presets configured"),
            },
        };
        if symbol.is_empty() {
            bail!("Symbol must not be empty");
        }

        Ok(AnalysisRequest {
            symbol,
            start: self.start.unwrap_or(config.start),
            intraday: !self.closing,
            curve_filter: CurveFilter {
                min_duration_days: self.min_days.unwrap_or(config.curves.min_duration_days),
                since_year: self.since.unwrap_or(config.curves.since_year),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ath_watch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_picks_first_preset() {
        let req = parse(&[]).request(&WatchConfig::default()).unwrap();
        assert_eq!(req.symbol, "^GSPC");
        assert!(req.intraday);
        assert_eq!(req.curve_filter, CurveFilter::default());
    }

    #[test]
    fn index_flag_resolves_preset() {
        let req = parse(&["--index", "Russell 2000", "--closing"])
            .request(&WatchConfig::default())
            .unwrap();
        assert_eq!(req.symbol, "^RUT");
        assert!(!req.intraday);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = parse(&["-i", "FTSE"]).request(&WatchConfig::default()).unwrap_err();
        assert!(err.to_string().contains("FTSE"));
    }

    #[test]
    fn flags_override_config() {
        let req = parse(&[
            "--symbol",
            "7203.T",
            "--since",
            "2020",
            "--min-days",
            "90",
            "--start",
            "2012-03-01",
        ])
        .request(&WatchConfig::default())
        .unwrap();
        assert_eq!(req.symbol, "7203.T");
        assert_eq!(req.start, NaiveDate::from_ymd_opt(2012, 3, 1).unwrap());
        assert_eq!(
            req.curve_filter,
            CurveFilter {
                min_duration_days: 90,
                since_year: 2020
            }
        );
    }

    #[test]
    fn symbol_and_index_conflict() {
        let args = ["ath_watch", "--symbol", "AAPL", "--index", "S&P 500"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn bad_start_date_is_rejected() {
        assert!(Cli::try_parse_from(["ath_watch", "--start", "yesterday"]).is_err());
    }
}
