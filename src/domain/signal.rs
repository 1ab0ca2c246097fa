//! Directional signal values.

use crate::domain::error::SignalBtError;
use std::fmt;

/// Desired directional position held during a bar. The position is earned
/// against the *next* bar's return, never the bar it was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Short,
    Flat,
    Long,
}

impl Signal {
    pub fn as_f64(self) -> f64 {
        match self {
            Signal::Short => -1.0,
            Signal::Flat => 0.0,
            Signal::Long => 1.0,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }

    /// Parse a raw integer value, rejecting anything outside {-1, 0, 1}.
    /// `index` is carried for the error message only.
    pub fn from_i64(value: i64, index: usize) -> Result<Self, SignalBtError> {
        match value {
            -1 => Ok(Signal::Short),
            0 => Ok(Signal::Flat),
            1 => Ok(Signal::Long),
            other => Err(SignalBtError::InvalidSignal {
                value: other.to_string(),
                index,
            }),
        }
    }

    /// Parse a text cell, e.g. from a CSV signal column.
    pub fn from_str_cell(cell: &str, index: usize) -> Result<Self, SignalBtError> {
        cell.trim()
            .parse::<i64>()
            .map_err(|_| SignalBtError::InvalidSignal {
                value: cell.trim().to_string(),
                index,
            })
            .and_then(|v| Signal::from_i64(v, index))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}
