//! Data access port trait.
//!
//! The engine only asks a data source for two things: a chronologically
//! ordered price series with closes, and, when the source has one, an
//! aligned precomputed signal series.

use crate::domain::bar::PriceBar;
use crate::domain::error::SignalBtError;
use crate::domain::signal::Signal;

pub trait DataPort {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, SignalBtError>;

    /// A source-provided signal column, if the source carries one.
    /// `Ok(None)` means "no signal column", not an error.
    fn fetch_signals(&self) -> Result<Option<Vec<Signal>>, SignalBtError>;
}
