//! Moving-average crossover demo signal.
//!
//! This is the stand-in signal the CLI uses when the data file carries no
//! signal column of its own; real callers are expected to feed signals from
//! an upstream model instead.

use crate::domain::bar::PriceBar;
use crate::domain::error::SignalBtError;
use crate::domain::signal::Signal;

pub const DEFAULT_FAST_WINDOW: usize = 20;
pub const DEFAULT_SLOW_WINDOW: usize = 50;

/// Long while the fast simple moving average sits above the slow one,
/// short otherwise. Bars where the slow window has not filled yet resolve
/// to short: an undefined comparison falls through to the else-branch.
pub fn sma_crossover_signals(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
) -> Result<Vec<Signal>, SignalBtError> {
    let invalid = |key: &str, reason: &str| SignalBtError::ConfigInvalid {
        section: "signal".into(),
        key: key.into(),
        reason: reason.into(),
    };

    if fast == 0 {
        return Err(invalid("fast_window", "must be at least 1"));
    }
    if slow <= fast {
        return Err(invalid(
            "slow_window",
            "must be greater than the fast window",
        ));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast_ma = rolling_mean(&closes, fast);
    let slow_ma = rolling_mean(&closes, slow);

    let signals = fast_ma
        .iter()
        .zip(slow_ma.iter())
        .map(|pair| match pair {
            (Some(f), Some(s)) if f > s => Signal::Long,
            _ => Signal::Short,
        })
        .collect();
    Ok(signals)
}

/// Simple rolling mean; `None` until the window fills.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut running = 0.0_f64;
    for (i, &v) in values.iter().enumerate() {
        running += v;
        if i >= window {
            running -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(running / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}
