//! Domain error types.

/// Top-level error type for signalbt.
#[derive(Debug, thiserror::Error)]
pub enum SignalBtError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("series length mismatch: {bars} price bars vs {signals} signals")]
    LengthMismatch { bars: usize, signals: usize },

    #[error("invalid signal value {value} at bar {index}: expected -1, 0 or 1")]
    InvalidSignal { value: String, index: usize },

    #[error("no price data in {path}")]
    NoData { path: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignalBtError> for std::process::ExitCode {
    fn from(err: &SignalBtError) -> Self {
        let code: u8 = match err {
            SignalBtError::Io(_) => 1,
            SignalBtError::ConfigParse { .. } | SignalBtError::ConfigInvalid { .. } => 2,
            SignalBtError::Data { .. } | SignalBtError::NoData { .. } => 3,
            SignalBtError::LengthMismatch { .. } | SignalBtError::InvalidSignal { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
