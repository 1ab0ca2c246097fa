//! The public backtest entry point.

use crate::domain::bar::PriceBar;
use crate::domain::error::SignalBtError;
use crate::domain::metrics::Metrics;
use crate::domain::signal::Signal;
use crate::domain::simulator::{simulate, BacktestFrame, CostModel};
use std::collections::BTreeMap;

/// One immutable cost configuration plus the stateless run operation.
/// Independent runs share nothing, so parameter sweeps can call `run`
/// concurrently from as many threads as the caller likes.
#[derive(Debug, Clone, Default)]
pub struct Backtester {
    cost_model: CostModel,
}

impl Backtester {
    pub fn new(cost_model: CostModel) -> Result<Self, SignalBtError> {
        cost_model.validate()?;
        Ok(Backtester { cost_model })
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// Simulate and reduce to the metric map. An empty map means the input
    /// had no usable return data, not that everything was zero.
    pub fn run(
        &self,
        bars: &[PriceBar],
        signals: &[Signal],
    ) -> Result<BTreeMap<String, f64>, SignalBtError> {
        let frame = simulate(bars, signals, &self.cost_model)?;
        Ok(Metrics::compute(&frame, self.cost_model.initial_capital)
            .map(Metrics::into_map)
            .unwrap_or_default())
    }

    /// Like [`Backtester::run`] but keeps the per-bar columns, for callers
    /// that want the equity curve and not just the summary.
    pub fn run_frame(
        &self,
        bars: &[PriceBar],
        signals: &[Signal],
    ) -> Result<(BacktestFrame, Option<Metrics>), SignalBtError> {
        let frame = simulate(bars, signals, &self.cost_model)?;
        let metrics = Metrics::compute(&frame, self.cost_model.initial_capital);
        Ok((frame, metrics))
    }
}
