#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use signalbt::domain::bar::PriceBar;
use signalbt::domain::error::SignalBtError;
use signalbt::domain::signal::Signal;
use signalbt::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub signals: Option<Vec<Signal>>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self {
            bars,
            signals: None,
            error: None,
        }
    }

    pub fn with_signals(mut self, signals: Vec<Signal>) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, SignalBtError> {
        if let Some(reason) = &self.error {
            return Err(SignalBtError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.bars.clone())
    }

    fn fetch_signals(&self) -> Result<Option<Vec<Signal>>, SignalBtError> {
        Ok(self.signals.clone())
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes.iter().map(|&c| PriceBar::from_close(c)).collect()
}

pub fn timestamped_bars(closes: &[f64], start: NaiveDateTime, step: Duration) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::at(start + step * i as i32, c))
        .collect()
}

pub fn session_open(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

/// Signal flipping every bar between long and short, starting long.
pub fn alternating_signals(count: usize) -> Vec<Signal> {
    (0..count)
        .map(|i| if i % 2 == 0 { Signal::Long } else { Signal::Short })
        .collect()
}
