//! End-to-end analysis of one instrument.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use market_data::{
    models::{
        instrument::{InstrumentInfo, MarketState},
        series::PriceSeries,
    },
    providers::{DataProvider, ProviderError},
};
use serde::Serialize;
use tracing::info;

use crate::{
    context::AnalysisContext,
    curves::{Curve, CurveFilter, build_curves},
    error::AnalysisError,
    locate::{ExtremeLocator, Extremum, Seek},
    segment::{Episode, segment},
    status::{Status, report},
};

/// What to analyze and how.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisRequest {
    pub symbol: String,
    /// First day of daily history to request.
    pub start: NaiveDate,
    pub intraday: bool,
    pub curve_filter: CurveFilter,
}

impl AnalysisRequest {
    /// Intraday analysis from 2000-01-01 with the default curve filter.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
            intraday: true,
            curve_filter: CurveFilter::default(),
        }
    }
}

/// The price the status block is computed against.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrentPrice {
    pub price: f64,
    pub timestamp: DateTime<Tz>,
    pub market_state: Option<MarketState>,
}

/// Everything a renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    pub context: AnalysisContext,
    pub current: CurrentPrice,
    pub ath: Extremum,
    pub recent_low: Extremum,
    pub status: Status,
    pub episodes: Vec<Episode>,
    /// Index into `episodes`.
    pub active_episode: usize,
    pub curves: Vec<Curve>,
}

/// Runs the full analysis for `request.symbol` against `provider`.
///
/// Fatal conditions (unresolvable instrument, too little data, a failed
/// metadata or daily request) are returned as [`AnalysisError`]. Failed intraday refinements are
/// not; they show up as fallback refinements on the extrema.
pub async fn analyze<P: DataProvider + ?Sized>(
    provider: &P,
    request: &AnalysisRequest,
) -> Result<Analysis, AnalysisError> {
    let instrument = match provider.get_info(&request.symbol).await {
        Ok(instrument) => instrument,
        // The API answered but could not resolve the symbol.
        Err(ProviderError::Api { message, .. }) => {
            return Err(AnalysisError::InvalidInstrument {
                symbol: request.symbol.clone(),
                reason: message,
            });
        }
        Err(e) => return Err(e.into()),
    };
    let context = AnalysisContext::from_instrument(&instrument, request.intraday)?;

    let series = provider.get_daily(&request.symbol, request.start).await?;
    let segmentation = segment(&series)?;
    let bars = series.bars();
    let active = segmentation.active_episode();

    let insufficient = || AnalysisError::InsufficientData { usable: 0 };
    let mut ath =
        Extremum::from_daily(bars, Seek::High, context.intraday).ok_or_else(insufficient)?;
    let mut recent_low = Extremum::from_daily(
        &bars[active.start_index..=active.end_index],
        Seek::Low,
        context.intraday,
    )
    .ok_or_else(insufficient)?;

    let locator = ExtremeLocator::new(provider, &context);
    tokio::join!(
        locator.refine(&mut ath, Seek::High),
        locator.refine(&mut recent_low, Seek::Low),
    );

    let current = current_price(&context, &instrument, &series).ok_or_else(insufficient)?;
    let status = report(current.price, &ath, &recent_low);
    let curves = build_curves(&series, &segmentation, request.curve_filter, &context.unit);

    info!(
        symbol = %context.symbol,
        ath = ath.price,
        recent_low = recent_low.price,
        current = current.price,
        curves = curves.len(),
        "analysis complete"
    );

    Ok(Analysis {
        context,
        current,
        ath,
        recent_low,
        status,
        active_episode: segmentation.active,
        episodes: segmentation.episodes,
        curves,
    })
}

/// The live quote in intraday mode, otherwise the last daily close stamped at
/// market close.
fn current_price(
    context: &AnalysisContext,
    instrument: &InstrumentInfo,
    series: &PriceSeries,
) -> Option<CurrentPrice> {
    let state = instrument.quote.as_ref().map(|q| q.market_state);
    match &instrument.quote {
        Some(quote) if context.intraday && quote.last_price.is_finite() => Some(CurrentPrice {
            price: quote.last_price,
            timestamp: quote.timestamp.with_timezone(&context.timezone),
            market_state: state,
        }),
        _ => series.last().map(|bar| CurrentPrice {
            price: bar.close,
            timestamp: context.market_close(bar.date),
            market_state: state,
        }),
    }
}
