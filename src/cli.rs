//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtester::Backtester;
use crate::domain::crossover::{
    sma_crossover_signals, DEFAULT_FAST_WINDOW, DEFAULT_SLOW_WINDOW,
};
use crate::domain::error::SignalBtError;
use crate::domain::frequency::annualization_factor;
use crate::domain::metrics::Metrics;
use crate::domain::signal::Signal;
use crate::domain::simulator::CostModel;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "signalbt", about = "Vectorized signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a CSV price file
    Backtest {
        /// Price file with at least a close column
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        initial_capital: Option<f64>,
        #[arg(long)]
        commission_per_share: Option<f64>,
        #[arg(long)]
        slippage_bps: Option<f64>,
        /// Fast SMA window for the demo crossover signal
        #[arg(long)]
        fast: Option<usize>,
        /// Slow SMA window for the demo crossover signal
        #[arg(long)]
        slow: Option<usize>,
    },
    /// Show bar count, timestamp range and inferred frequency for a file
    Info {
        data: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            data,
            config,
            initial_capital,
            commission_per_share,
            slippage_bps,
            fast,
            slow,
        } => run_backtest(
            &data,
            config.as_ref(),
            Overrides {
                initial_capital,
                commission_per_share,
                slippage_bps,
                fast,
                slow,
            },
        ),
        Command::Info { data } => run_info(&data),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub initial_capital: Option<f64>,
    pub commission_per_share: Option<f64>,
    pub slippage_bps: Option<f64>,
    pub fast: Option<usize>,
    pub slow: Option<usize>,
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SignalBtError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_cost_model(
    config: Option<&dyn ConfigPort>,
    overrides: &Overrides,
) -> Result<CostModel, SignalBtError> {
    let defaults = CostModel::default();
    let from_config = |key: &str, default: f64| match config {
        Some(c) => c.get_double("backtest", key, default),
        None => default,
    };

    let model = CostModel {
        initial_capital: overrides
            .initial_capital
            .unwrap_or_else(|| from_config("initial_capital", defaults.initial_capital)),
        commission_per_share: overrides.commission_per_share.unwrap_or_else(|| {
            from_config("commission_per_share", defaults.commission_per_share)
        }),
        slippage_bps: overrides
            .slippage_bps
            .unwrap_or_else(|| from_config("slippage_bps", defaults.slippage_bps)),
    };
    model.validate()?;
    Ok(model)
}

pub fn resolve_signal_windows(
    config: Option<&dyn ConfigPort>,
    overrides: &Overrides,
) -> (usize, usize) {
    let from_config = |key: &str, default: usize| match config {
        Some(c) => c.get_int("signal", key, default as i64).max(0) as usize,
        None => default,
    };
    let fast = overrides
        .fast
        .unwrap_or_else(|| from_config("fast_window", DEFAULT_FAST_WINDOW));
    let slow = overrides
        .slow
        .unwrap_or_else(|| from_config("slow_window", DEFAULT_SLOW_WINDOW));
    (fast, slow)
}

fn run_backtest(
    data_path: &PathBuf,
    config_path: Option<&PathBuf>,
    overrides: Overrides,
) -> ExitCode {
    // Stage 1: Load config, if any
    let adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => Some(a),
                Err(code) => return code,
            }
        }
        None => None,
    };
    let config = adapter.as_ref().map(|a| a as &dyn ConfigPort);

    // Stage 2: Build and validate cost model
    let cost_model = match build_cost_model(config, &overrides) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Load price data
    eprintln!("Loading price data from {}", data_path.display());
    let data_port = CsvAdapter::new(data_path.clone());
    let bars = match data_port.fetch_bars() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} bars loaded", bars.len());

    // Stage 4: Resolve signal series: file-provided column, or demo crossover
    let signals: Vec<Signal> = match data_port.fetch_signals() {
        Ok(Some(s)) => {
            eprintln!("  using signal column from data file");
            s
        }
        Ok(None) => {
            let (fast, slow) = resolve_signal_windows(config, &overrides);
            eprintln!("  building SMA({fast})/SMA({slow}) crossover signal");
            match sma_crossover_signals(&bars, fast, slow) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Run and print
    let backtester = match Backtester::new(cost_model) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (frame, metrics) = match backtester.run_frame(&bars, &signals) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match metrics {
        Some(m) => {
            eprintln!(
                "  annualization factor: {}",
                annualization_factor(&frame.timestamps)
            );
            print_metrics(&m);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("error: no usable return data in {}", data_path.display());
            ExitCode::from(3)
        }
    }
}

fn print_metrics(m: &Metrics) {
    println!("{}", "-".repeat(30));
    println!("BACKTEST RESULTS");
    println!("{}", "-".repeat(30));
    println!("total_return: {:.2}%", m.total_return * 100.0);
    println!("sharpe_ratio: {:.2}", m.sharpe_ratio);
    println!("sortino_ratio: {:.2}", m.sortino_ratio);
    println!("max_drawdown: {:.2}%", m.max_drawdown * 100.0);
    println!("win_rate_bars: {:.2}%", m.win_rate_bars * 100.0);
    println!("equity_final: ${:.2}", m.equity_final);
    println!("{}", "-".repeat(30));
}

fn run_info(data_path: &PathBuf) -> ExitCode {
    let data_port = CsvAdapter::new(data_path.clone());
    let bars = match data_port.fetch_bars() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let timestamps: Vec<_> = bars.iter().map(|b| b.timestamp).collect();
    println!("{}: {} bars", data_path.display(), bars.len());
    match (
        timestamps.first().copied().flatten(),
        timestamps.last().copied().flatten(),
    ) {
        (Some(first), Some(last)) => println!("range: {} to {}", first, last),
        _ => println!("range: no timestamp column"),
    }
    println!("annualization factor: {}", annualization_factor(&timestamps));

    let has_signal_column = matches!(data_port.fetch_signals(), Ok(Some(_)));
    println!(
        "signal column: {}",
        if has_signal_column { "present" } else { "absent" }
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let overrides = Overrides::default();
    let cost_model = match build_cost_model(Some(&adapter), &overrides) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (fast, slow) = resolve_signal_windows(Some(&adapter), &overrides);
    if fast == 0 || slow <= fast {
        let err = SignalBtError::ConfigInvalid {
            section: "signal".into(),
            key: "slow_window".into(),
            reason: "windows must satisfy 0 < fast < slow".into(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    eprintln!("  initial_capital = {}", cost_model.initial_capital);
    eprintln!("  commission_per_share = {}", cost_model.commission_per_share);
    eprintln!("  slippage_bps = {}", cost_model.slippage_bps);
    eprintln!("  fast_window = {fast}, slow_window = {slow}");
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
