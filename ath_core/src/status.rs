use serde::Serialize;

use crate::locate::Extremum;

/// Where the current price sits relative to the ATH and the recent low.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Status {
    pub current_price: f64,

    /// `(ath - current) / current`, as a fraction.
    pub ath_gap: f64,

    /// `(current - low) / (ath - low)`. `None` when the ATH equals the low or
    /// when the ratio reaches 1, which [`is_at_ath`](Self::is_at_ath) and the
    /// gap already describe.
    pub position_ratio: Option<f64>,

    pub is_at_ath: bool,
    pub is_at_recent_low: bool,
}

impl Status {
    pub fn ath_gap_percent(&self) -> f64 {
        self.ath_gap * 100.0
    }
}

/// Computes the relative-position facts. Pure.
pub fn report(current_price: f64, ath: &Extremum, recent_low: &Extremum) -> Status {
    let range = ath.price - recent_low.price;
    let position_ratio = (range != 0.0)
        .then(|| (current_price - recent_low.price) / range)
        .filter(|ratio| ratio.is_finite() && *ratio < 1.0);

    Status {
        current_price,
        ath_gap: (ath.price - current_price) / current_price,
        position_ratio,
        is_at_ath: ath.price == current_price,
        is_at_recent_low: recent_low.price == current_price,
    }
}
