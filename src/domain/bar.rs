//! Price bar representation.

use chrono::NaiveDateTime;

/// One time-indexed price observation. Only `close` is mandatory; the
/// timestamp is needed for annualization-frequency inference and the other
/// columns ride along for callers that have them.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: Option<NaiveDateTime>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

impl PriceBar {
    /// A bar carrying only a close price.
    pub fn from_close(close: f64) -> Self {
        PriceBar {
            timestamp: None,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// A close-only bar pinned to a timestamp.
    pub fn at(timestamp: NaiveDateTime, close: f64) -> Self {
        PriceBar {
            timestamp: Some(timestamp),
            ..PriceBar::from_close(close)
        }
    }

    /// A close is usable for return arithmetic only if it is finite and
    /// strictly positive. Bad closes degrade to NaN downstream instead of
    /// aborting the run.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
