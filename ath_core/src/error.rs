use market_data::providers::ProviderError;
use thiserror::Error;

/// Fatal analysis failures.
///
/// Recoverable conditions never show up here: a failed intraday refinement is
/// reported as [`Refinement::Fallback`](crate::locate::Refinement::Fallback),
/// and a zero-width low/high range leaves
/// [`Status::position_ratio`](crate::status::Status::position_ratio) empty.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The provider could not resolve the instrument, or resolved it without
    /// the metadata the analysis needs.
    #[error("Instrument {symbol} could not be resolved: {reason}")]
    InvalidInstrument { symbol: String, reason: String },

    /// Fewer than two bars remain once the leading baseline is trimmed.
    #[error("Insufficient data: {usable} usable bar(s) after trimming, at least 2 required")]
    InsufficientData { usable: usize },

    /// The daily series could not be retrieved.
    #[error("Market data request failed: {0}")]
    Provider(#[from] ProviderError),
}
