//! Return and cost simulation over whole series.
//!
//! Every derived column is produced by one pass over the input series;
//! there is no stateful bar-by-bar trading loop. Undefined entries (the
//! first bar, bars touched by a bad close) are NaN, never zero.

use crate::domain::bar::PriceBar;
use crate::domain::error::SignalBtError;
use crate::domain::signal::Signal;
use chrono::NaiveDateTime;
use std::iter::once;

/// Immutable cost configuration for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    pub initial_capital: f64,
    pub commission_per_share: f64,
    pub slippage_bps: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            initial_capital: 100_000.0,
            commission_per_share: 0.0035,
            slippage_bps: 1.0,
        }
    }
}

impl CostModel {
    /// Slippage expressed as a fraction of notional.
    pub fn slippage_fraction(&self) -> f64 {
        self.slippage_bps / 10_000.0
    }

    pub fn validate(&self) -> Result<(), SignalBtError> {
        let invalid = |key: &str, reason: &str| SignalBtError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: reason.into(),
        };

        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(invalid("initial_capital", "must be a positive number"));
        }
        if !(self.commission_per_share.is_finite() && self.commission_per_share >= 0.0) {
            return Err(invalid("commission_per_share", "must be non-negative"));
        }
        if !(self.slippage_bps.is_finite() && self.slippage_bps >= 0.0) {
            return Err(invalid("slippage_bps", "must be non-negative"));
        }
        Ok(())
    }
}

/// The augmented per-bar series produced by [`simulate`]. All columns share
/// the input index; NaN marks entries a lag or a bad close left undefined.
#[derive(Debug, Clone)]
pub struct BacktestFrame {
    pub timestamps: Vec<Option<NaiveDateTime>>,
    pub log_return: Vec<f64>,
    pub strategy_return: Vec<f64>,
    pub turnover: Vec<f64>,
    pub cost: Vec<f64>,
    pub net_return: Vec<f64>,
    pub equity: Vec<f64>,
}

impl BacktestFrame {
    pub fn len(&self) -> usize {
        self.net_return.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net_return.is_empty()
    }

    /// Net returns with undefined bars dropped, the only view metrics
    /// aggregate over.
    pub fn defined_net_returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.net_return.iter().copied().filter(|r| !r.is_nan())
    }
}

/// Run the return and cost simulation. Pure function of its inputs.
///
/// The causality rule: `strategy_return[t] = signal[t-1] * log_return[t]`.
/// A position decided on bar t-1 earns the return realized over bar t;
/// pairing `signal[t]` with `log_return[t]` would leak the future.
pub fn simulate(
    bars: &[PriceBar],
    signals: &[Signal],
    cost_model: &CostModel,
) -> Result<BacktestFrame, SignalBtError> {
    if bars.len() != signals.len() {
        return Err(SignalBtError::LengthMismatch {
            bars: bars.len(),
            signals: signals.len(),
        });
    }
    if bars.is_empty() {
        return Ok(BacktestFrame {
            timestamps: Vec::new(),
            log_return: Vec::new(),
            strategy_return: Vec::new(),
            turnover: Vec::new(),
            cost: Vec::new(),
            net_return: Vec::new(),
            equity: Vec::new(),
        });
    }

    let timestamps: Vec<Option<NaiveDateTime>> = bars.iter().map(|b| b.timestamp).collect();

    // A non-positive or non-finite close poisons every ratio it enters.
    let closes: Vec<f64> = bars
        .iter()
        .map(|b| if b.has_valid_close() { b.close } else { f64::NAN })
        .collect();

    let log_return: Vec<f64> = once(f64::NAN)
        .chain(closes.windows(2).map(|w| (w[1] / w[0]).ln()))
        .collect();

    let strategy_return: Vec<f64> = once(f64::NAN)
        .chain(
            signals
                .iter()
                .zip(log_return.iter().skip(1))
                .map(|(prev_signal, ret)| prev_signal.as_f64() * ret),
        )
        .collect();

    // The first differencing result is 0, not undefined: opening a fresh
    // position is not penalized as a position change.
    let turnover: Vec<f64> = once(0.0)
        .chain(
            signals
                .windows(2)
                .map(|w| (w[1].as_f64() - w[0].as_f64()).abs()),
        )
        .collect();

    let slippage = cost_model.slippage_fraction();
    let cost: Vec<f64> = turnover
        .iter()
        .zip(closes.iter())
        .map(|(&trades, &close)| {
            if trades == 0.0 {
                0.0
            } else {
                trades * (cost_model.commission_per_share / close + slippage)
            }
        })
        .collect();

    let net_return: Vec<f64> = strategy_return
        .iter()
        .zip(cost.iter())
        .map(|(s, c)| s - c)
        .collect();

    // Compounding is additive in log-space: equity stays strictly positive
    // no matter how deep the drawdown. Undefined net returns contribute
    // nothing to the running sum rather than poisoning the curve.
    let equity: Vec<f64> = net_return
        .iter()
        .scan(0.0_f64, |acc, r| {
            if !r.is_nan() {
                *acc += r;
            }
            Some(cost_model.initial_capital * acc.exp())
        })
        .collect();

    Ok(BacktestFrame {
        timestamps,
        log_return,
        strategy_return,
        turnover,
        cost,
        net_return,
        equity,
    })
}
