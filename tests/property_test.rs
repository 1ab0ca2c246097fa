//! Property-based checks of the simulator's algorithmic contract.

mod common;

use common::bars_from_closes;
use proptest::prelude::*;
use signalbt::domain::metrics::Metrics;
use signalbt::domain::signal::Signal;
use signalbt::domain::simulator::{simulate, CostModel};

fn signal_strategy() -> impl Strategy<Value = Signal> {
    prop_oneof![
        Just(Signal::Short),
        Just(Signal::Flat),
        Just(Signal::Long),
    ]
}

/// Aligned (closes, signals) pair of shared random length.
fn series_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<Signal>)> {
    prop::collection::vec((1.0_f64..1_000.0, signal_strategy()), 2..60)
        .prop_map(|rows| rows.into_iter().unzip())
}

proptest! {
    #[test]
    fn no_lookahead((closes, signals) in series_strategy(),
                    replacement in signal_strategy(),
                    seed in any::<prop::sample::Index>()) {
        let bars = bars_from_closes(&closes);
        let t = seed.index(signals.len());

        let mut mutated = signals.clone();
        mutated[t] = replacement;

        let model = CostModel::default();
        let base = simulate(&bars, &signals, &model).unwrap();
        let edited = simulate(&bars, &mutated, &model).unwrap();

        // Changing the signal at bar t must not move strategy_return at or
        // before bar t; only bar t+1 may react.
        for i in 0..=t {
            let (a, b) = (base.strategy_return[i], edited.strategy_return[i]);
            prop_assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }

    #[test]
    fn higher_costs_never_help((closes, signals) in series_strategy(),
                               extra_slippage in 0.1_f64..50.0,
                               extra_commission in 0.0001_f64..0.1) {
        let bars = bars_from_closes(&closes);
        let cheap = CostModel::default();
        let dear = CostModel {
            commission_per_share: cheap.commission_per_share + extra_commission,
            slippage_bps: cheap.slippage_bps + extra_slippage,
            ..cheap.clone()
        };

        let base = simulate(&bars, &signals, &cheap).unwrap();
        let taxed = simulate(&bars, &signals, &dear).unwrap();

        for t in 0..bars.len() {
            if base.net_return[t].is_nan() {
                prop_assert!(taxed.net_return[t].is_nan());
            } else if base.turnover[t] > 0.0 {
                prop_assert!(taxed.net_return[t] < base.net_return[t]);
            } else {
                prop_assert_eq!(taxed.net_return[t], base.net_return[t]);
            }
        }
    }

    #[test]
    fn flat_signal_is_idempotent(closes in prop::collection::vec(1.0_f64..1_000.0, 2..60)) {
        let bars = bars_from_closes(&closes);
        let signals = vec![Signal::Flat; bars.len()];
        let model = CostModel::default();
        let frame = simulate(&bars, &signals, &model).unwrap();

        for t in 1..bars.len() {
            prop_assert_eq!(frame.net_return[t], 0.0);
        }
        for t in 0..bars.len() {
            prop_assert_eq!(frame.equity[t], model.initial_capital);
        }

        let metrics = Metrics::compute(&frame, model.initial_capital).unwrap();
        prop_assert_eq!(metrics.max_drawdown, 0.0);
        prop_assert_eq!(metrics.sharpe_ratio, 0.0);
        prop_assert_eq!(metrics.sortino_ratio, 0.0);
    }

    #[test]
    fn equity_positive_and_drawdown_bounded((closes, signals) in series_strategy()) {
        let bars = bars_from_closes(&closes);
        let model = CostModel::default();
        let frame = simulate(&bars, &signals, &model).unwrap();

        for &e in &frame.equity {
            prop_assert!(e.is_finite() && e > 0.0);
        }

        if let Some(metrics) = Metrics::compute(&frame, model.initial_capital) {
            prop_assert!(metrics.max_drawdown <= 0.0);
            prop_assert!(metrics.max_drawdown > -1.0);
        }
    }
}
