//! Bar-frequency inference for annualization.
//!
//! The breakpoints and factors are a deliberately coarse heuristic;
//! downstream results depend on them staying exactly as they are.

use chrono::{Duration, NaiveDateTime};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const MINUTES_PER_TRADING_DAY: f64 = 390.0;
const HALF_HOUR_BARS_PER_DAY: f64 = 13.0;

/// Annualization factor inferred from the median spacing between
/// consecutive timestamps:
///
/// - spacing < 5 minutes  → 252 × 390 (roughly 1-minute bars)
/// - spacing < 60 minutes → 252 × 13
/// - otherwise            → 252 (daily)
///
/// An index without complete timestamps defaults to daily.
pub fn annualization_factor(timestamps: &[Option<NaiveDateTime>]) -> f64 {
    if timestamps.iter().any(|t| t.is_none()) {
        return TRADING_DAYS_PER_YEAR;
    }
    let stamped: Vec<NaiveDateTime> = timestamps.iter().filter_map(|t| *t).collect();

    let Some(median) = median_spacing(&stamped) else {
        return TRADING_DAYS_PER_YEAR;
    };

    if median < Duration::minutes(5) {
        TRADING_DAYS_PER_YEAR * MINUTES_PER_TRADING_DAY
    } else if median < Duration::hours(1) {
        TRADING_DAYS_PER_YEAR * HALF_HOUR_BARS_PER_DAY
    } else {
        TRADING_DAYS_PER_YEAR
    }
}

/// Median of the consecutive timestamp deltas; `None` below two stamps.
/// For an even count the two middle deltas are averaged.
fn median_spacing(timestamps: &[NaiveDateTime]) -> Option<Duration> {
    if timestamps.len() < 2 {
        return None;
    }

    let mut deltas: Vec<Duration> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    deltas.sort();

    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some((deltas[mid - 1] + deltas[mid]) / 2)
    }
}
