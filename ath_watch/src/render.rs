//! Plain-text rendering of an [`Analysis`].

use ath_core::{Analysis, Extremum, Refinement};

use crate::config::WatchConfig;

/// `unit` followed by `value` with two decimals and thousands separators.
pub fn format_price(unit: &str, value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{unit}{grouped}.{frac}")
}

/// Refined extremes show the minute, fallbacks only the day.
fn extremum_line(extremum: &Extremum, unit: &str, abbr: &str) -> String {
    let price = format_price(unit, extremum.price);
    match &extremum.refinement {
        Some(Refinement::Refined { timestamp }) => {
            format!("{} {abbr} : {price}", timestamp.format("%Y-%m-%d %H:%M"))
        }
        _ => format!("{} : {price}", extremum.date.format("%Y-%m-%d")),
    }
}

pub fn render_status(analysis: &Analysis) -> String {
    let ctx = &analysis.context;
    let unit = ctx.unit.as_str();
    let abbr = ctx.timezone_abbr.as_str();
    let status = &analysis.status;

    let mut lines = vec![
        format!("# Status: {}", ctx.symbol),
        "## Current Price".to_string(),
        format!(
            "{} {abbr} : {}",
            analysis.current.timestamp.format("%Y-%m-%d %H:%M"),
            format_price(unit, analysis.current.price)
        ),
        "## All-Time-High".to_string(),
        extremum_line(&analysis.ath, unit, abbr),
        "## Recent Low".to_string(),
        extremum_line(&analysis.recent_low, unit, abbr),
        String::new(),
    ];
    if status.is_at_ath {
        lines.push("- Current price is at the all-time-high.".to_string());
    } else {
        lines.push(format!(
            "- All-time-high is {:.2}% above the current price.",
            status.ath_gap_percent()
        ));
        lines.push(match status.position_ratio {
            Some(ratio) => format!(
                "- Current price is at {:.2}% between recent low and all-time-high.",
                ratio * 100.0
            ),
            None if status.current_price > analysis.ath.price => {
                "- Current price is above the daily all-time-high.".to_string()
            }
            None => "- Recent low and all-time-high coincide.".to_string(),
        });
    }

    if !analysis.curves.is_empty() {
        lines.push(String::new());
        lines.push("# Price Movement since ATH (close)".to_string());
    }
    let ongoing = analysis.episodes.last().is_some_and(|e| !e.is_resolved());
    for curve in &analysis.curves {
        let trough = curve
            .points
            .iter()
            .map(|p| p.percent_from_start)
            .fold(0.0_f64, f64::min);
        let span = if curve.is_latest && ongoing {
            format!("{} days, not recovered", curve.duration_days())
        } else {
            format!("recovered after {} days", curve.duration_days())
        };
        let tags: Vec<&str> = [(curve.is_latest, "latest"), (curve.is_active, "active")]
            .into_iter()
            .filter_map(|(on, tag)| on.then_some(tag))
            .collect();
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", tags.join(", "))
        };
        lines.push(format!(
            "{}  {span}, max drawdown {trough:.2}%{tags}",
            curve.label.format("%Y-%m-%d")
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

pub fn render_presets(config: &WatchConfig) -> String {
    let width = config.presets.keys().map(String::len).max().unwrap_or(0);
    config
        .presets
        .iter()
        .map(|(name, ticker)| format!("{name:<width$}  {ticker}\n"))
        .collect()
}
