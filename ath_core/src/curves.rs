//! Normalized drawdown trajectories for overlay charts.
//!
//! Each curve starts at one new high and plots days since that high against
//! the percent change from it. Closed episodes include the day of the next
//! new high, so their curves end at the recovery.

use chrono::{Datelike, NaiveDate};
use market_data::models::series::PriceSeries;
use serde::{Deserialize, Serialize};

use crate::segment::Segmentation;

/// Which historical episodes make it onto the chart.
///
/// The most recent and the active episode are always charted, whatever the
/// filter says.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurveFilter {
    /// Drop episodes recovered in fewer calendar days than this.
    pub min_duration_days: i64,
    /// Drop episodes starting before this year.
    pub since_year: i32,
}

impl Default for CurveFilter {
    fn default() -> Self {
        Self {
            min_duration_days: 30,
            since_year: 2010,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub days_since_start: i64,
    pub percent_from_start: f64,
}

/// One episode's trajectory, ready to be drawn as an x/y line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Curve {
    /// Date of the new high the episode starts at.
    pub label: NaiveDate,
    pub points: Vec<CurvePoint>,
    /// One per point: date and absolute price.
    pub hover_labels: Vec<String>,
    /// The chronologically last episode; renderers emphasize it.
    pub is_latest: bool,
    /// The active (longest) episode.
    pub is_active: bool,
}

impl Curve {
    /// Calendar days covered by the curve.
    pub fn duration_days(&self) -> i64 {
        self.points.last().map_or(0, |p| p.days_since_start)
    }
}

/// Builds curves for the episodes of `segmentation` that pass `filter`.
///
/// Prices are adjusted closes; `unit` prefixes prices in hover labels.
pub fn build_curves(
    series: &PriceSeries,
    segmentation: &Segmentation,
    filter: CurveFilter,
    unit: &str,
) -> Vec<Curve> {
    let bars = series.bars();
    let latest = segmentation.latest_index();

    segmentation
        .episodes
        .iter()
        .enumerate()
        .filter_map(|(k, episode)| {
            let is_latest = k == latest;
            let is_active = k == segmentation.active;
            let stop = if is_latest {
                episode.end_index
            } else {
                episode.end_index + 1
            };
            let window = &bars[episode.start_index..=stop];
            let first = &window[0];
            let duration = (window[window.len() - 1].date - first.date).num_days();

            let filtered_out =
                duration < filter.min_duration_days || first.date.year() < filter.since_year;
            if filtered_out && !is_latest && !is_active {
                return None;
            }

            let base = first.adj_close;
            let points = window
                .iter()
                .map(|b| CurvePoint {
                    days_since_start: (b.date - first.date).num_days(),
                    percent_from_start: 100.0 * (b.adj_close - base) / base,
                })
                .collect();
            let hover_labels = window
                .iter()
                .map(|b| format!("{}: {unit}{:.2}", b.date.format("%Y-%m-%d"), b.adj_close))
                .collect();

            Some(Curve {
                label: first.date,
                points,
                hover_labels,
                is_latest,
                is_active,
            })
        })
        .collect()
}
