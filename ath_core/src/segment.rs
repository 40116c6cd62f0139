//! Partitioning a daily series into "new high to new high" episodes.
//!
//! A day is a new high when its adjusted close equals the running maximum of
//! all adjusted closes up to and including that day. Every new-high day starts
//! an episode, and the episode runs until the day before the next new high.
//!
//! Two trimming rules apply before episodes are formed:
//!
//! 1. The first bar is always dropped. It trivially equals its own running
//!    maximum and says nothing about a new high.
//! 2. Everything before the first remaining new high (the anchor) is dropped,
//!    since no drawdown is defined before the series' first genuine high.

use chrono::NaiveDate;
use market_data::models::series::PriceSeries;
use serde::Serialize;
use tracing::debug;

use crate::error::AnalysisError;

/// A maximal run of trading days from one new high to the day before the next.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Episode {
    /// Index of the new-high bar that starts the episode.
    pub start_index: usize,
    /// Index of the last bar belonging to the episode (inclusive).
    pub end_index: usize,
    pub start_date: NaiveDate,
    /// `None` while the drawdown is unresolved.
    pub end_date: Option<NaiveDate>,
    /// Length in trading days (bars).
    pub length: usize,
}

impl Episode {
    pub fn is_resolved(&self) -> bool {
        self.end_date.is_some()
    }
}

/// Output of [`segment`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segmentation {
    /// Running maximum of adjusted close over the whole series.
    pub running_max: Vec<f64>,
    /// `adj_close[i] == running_max[i]`, over the whole series.
    pub is_new_high: Vec<bool>,
    /// Index of the first new high after the baseline bar.
    pub anchor: usize,
    /// Episodes in chronological order. Never empty.
    pub episodes: Vec<Episode>,
    /// Index into `episodes` of the active episode.
    pub active: usize,
}

impl Segmentation {
    /// The longest episode; on ties the most recent one.
    pub fn active_episode(&self) -> &Episode {
        &self.episodes[self.active]
    }

    /// The chronologically last episode.
    pub fn latest_index(&self) -> usize {
        self.episodes.len() - 1
    }
}

/// Running maximum of `values`, non-decreasing by construction.
pub fn running_max(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(f64::NEG_INFINITY, |max, &v| {
            *max = max.max(v);
            Some(*max)
        })
        .collect()
}

/// Segments `series` into episodes and selects the active one.
///
/// Fails with [`AnalysisError::InsufficientData`] when fewer than two bars
/// remain after trimming.
pub fn segment(series: &PriceSeries) -> Result<Segmentation, AnalysisError> {
    let bars = series.bars();
    let closes: Vec<f64> = series.adj_closes().collect();
    let running_max = running_max(&closes);
    let is_new_high: Vec<bool> = closes
        .iter()
        .zip(&running_max)
        .map(|(close, max)| close == max)
        .collect();

    let n = bars.len();
    let anchor = (1..n)
        .find(|&i| is_new_high[i])
        .ok_or(AnalysisError::InsufficientData { usable: 0 })?;
    if n - anchor < 2 {
        return Err(AnalysisError::InsufficientData { usable: n - anchor });
    }

    let starts: Vec<usize> = (anchor..n).filter(|&i| is_new_high[i]).collect();
    let episodes: Vec<Episode> = starts
        .iter()
        .enumerate()
        .map(|(k, &start)| {
            let (end_index, end_date) = match starts.get(k + 1) {
                Some(&next) => (next - 1, Some(bars[next - 1].date)),
                // A final new high on the very last bar closes immediately.
                None if start == n - 1 => (start, Some(bars[start].date)),
                None => (n - 1, None),
            };
            Episode {
                start_index: start,
                end_index,
                start_date: bars[start].date,
                end_date,
                length: end_index - start + 1,
            }
        })
        .collect();

    // Keep the last episode reaching the maximum length.
    let active = episodes
        .iter()
        .enumerate()
        .fold(0, |best, (i, e)| {
            if e.length >= episodes[best].length { i } else { best }
        });

    debug!(
        symbol = series.symbol(),
        episodes = episodes.len(),
        active_start = %episodes[active].start_date,
        active_length = episodes[active].length,
        "segmented series"
    );

    Ok(Segmentation {
        running_max,
        is_new_high,
        anchor,
        episodes,
        active,
    })
}
