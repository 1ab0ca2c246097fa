//! Performance metrics and statistics.

use crate::domain::frequency::annualization_factor;
use crate::domain::simulator::BacktestFrame;
use std::collections::BTreeMap;

/// Summary statistics over the defined portion of a net-return series.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate_bars: f64,
    pub equity_final: f64,
}

impl Metrics {
    /// Compute metrics over the bars with a defined net return. Returns
    /// `None` when no usable observations remain; the caller decides how to
    /// surface "not computable" (an empty map at the public boundary).
    pub fn compute(frame: &BacktestFrame, initial_capital: f64) -> Option<Self> {
        let clean: Vec<f64> = frame.defined_net_returns().collect();
        if clean.is_empty() {
            return None;
        }

        let ann_factor = annualization_factor(&frame.timestamps);
        let sqrt_ann = ann_factor.sqrt();

        let n = clean.len() as f64;
        let mean = clean.iter().sum::<f64>() / n;

        let sharpe_ratio = match sample_std(&clean) {
            Some(std) if std > 0.0 => (mean / std) * sqrt_ann,
            _ => 0.0,
        };

        let downside: Vec<f64> = clean.iter().copied().filter(|r| *r < 0.0).collect();
        let sortino_ratio = match sample_std(&downside) {
            Some(std) if std > 0.0 => (mean / std) * sqrt_ann,
            _ => 0.0,
        };

        // Equity is defined at every bar, so the frame being non-degenerate
        // guarantees a last value.
        let equity_final = *frame.equity.last()?;
        let total_return = equity_final / initial_capital - 1.0;

        let max_drawdown = compute_max_drawdown(&frame.equity);

        let wins = clean.iter().filter(|r| **r > 0.0).count();
        let win_rate_bars = wins as f64 / n;

        Some(Metrics {
            total_return,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            win_rate_bars,
            equity_final,
        })
    }

    /// The published metric map. Key names are part of the public contract.
    pub fn into_map(self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("total_return".to_string(), self.total_return),
            ("sharpe_ratio".to_string(), self.sharpe_ratio),
            ("sortino_ratio".to_string(), self.sortino_ratio),
            ("max_drawdown".to_string(), self.max_drawdown),
            ("win_rate_bars".to_string(), self.win_rate_bars),
            ("equity_final".to_string(), self.equity_final),
        ])
    }
}

/// Sample standard deviation (n-1 denominator). `None` below two
/// observations.
fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Deepest fractional decline of equity below its running peak. Zero when
/// equity never falls below a prior peak; always greater than -1 because
/// equity stays strictly positive.
fn compute_max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &e in equity {
        if e > peak {
            peak = e;
        }
        let dd = (e - peak) / peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}
