mod cli;
mod config;
mod render;

use anyhow::Context;
use ath_core::analyze;
use clap::Parser;
use market_data::providers::yahoo::YahooProvider;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{cli::Cli, config::WatchConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config =
        WatchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if cli.list {
        print!("{}", render::render_presets(&config));
        return Ok(());
    }

    let request = cli.request(&config)?;
    info!(
        symbol = %request.symbol,
        start = %request.start,
        intraday = request.intraday,
        "starting analysis"
    );

    let provider = YahooProvider::with_config(config.provider.clone())
        .context("Failed to initialize market data provider")?;
    let analysis = analyze(&provider, &request)
        .await
        .with_context(|| format!("Analysis of {} failed", request.symbol))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render::render_status(&analysis));
    }
    Ok(())
}
