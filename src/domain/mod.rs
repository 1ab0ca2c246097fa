//! Core domain types and logic.

pub mod bar;
pub mod signal;
pub mod crossover;
pub mod simulator;
pub mod frequency;
pub mod metrics;
pub mod backtester;
pub mod error;
