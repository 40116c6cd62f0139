//! Local wall-clock to exchange-zone conversion.
//!
//! Exchange-local wall times (a trading day plus the closing bell) are turned
//! into zoned instants here. Two DST edge cases need a decision:
//!
//! - Ambiguous local times happen during "fall back" when a wall time occurs
//!   twice. They resolve to the earlier instant.
//! - Nonexistent local times happen during "spring forward" when a wall time
//!   is skipped. They shift forward in one-minute steps until the first valid
//!   instant, capped at 2 hours.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

const MAX_SHIFT_MINUTES: i64 = 120;

/// `day` at wall time `at` in `tz`, never failing.
///
/// If no instant is found within the shift window the wall time is read as
/// UTC.
pub fn at_local_time(day: NaiveDate, at: NaiveTime, tz: Tz) -> DateTime<Tz> {
    let naive = day.and_time(at);
    (0..=MAX_SHIFT_MINUTES)
        .find_map(|m| tz.from_local_datetime(&(naive + Duration::minutes(m))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}
