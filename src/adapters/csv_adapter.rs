//! CSV file data adapter.

use crate::domain::bar::PriceBar;
use crate::domain::error::SignalBtError;
use crate::domain::signal::Signal;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_content(&self) -> Result<String, SignalBtError> {
        fs::read_to_string(&self.path).map_err(|e| SignalBtError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })
    }

    /// Column positions resolved from the header row, case-insensitively.
    fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, SignalBtError> {
        let mut cols = Columns::default();
        for (i, name) in headers.iter().enumerate() {
            match name.trim().to_lowercase().as_str() {
                "timestamp" | "datetime" | "date" => cols.timestamp = Some(i),
                "open" => cols.open = Some(i),
                "high" => cols.high = Some(i),
                "low" => cols.low = Some(i),
                "close" => cols.close = Some(i),
                "volume" => cols.volume = Some(i),
                "signal" => cols.signal = Some(i),
                _ => {}
            }
        }
        if cols.close.is_none() {
            return Err(SignalBtError::Data {
                reason: "missing close column".into(),
            });
        }
        Ok(cols)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Columns {
    timestamp: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
    signal: Option<usize>,
}

/// A cell that fails to parse degrades to NaN so the affected bar is
/// excluded from aggregation downstream instead of aborting the run.
fn parse_price(record: &csv::StringRecord, col: Option<usize>) -> Option<f64> {
    col.and_then(|i| record.get(i))
        .map(|cell| cell.trim().parse::<f64>().unwrap_or(f64::NAN))
}

fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(cell, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, SignalBtError> {
        let content = self.read_content()?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let cols = Self::resolve_columns(rdr.headers().map_err(|e| SignalBtError::Data {
            reason: format!("CSV parse error: {}", e),
        })?)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SignalBtError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp = cols
                .timestamp
                .and_then(|i| record.get(i))
                .and_then(parse_timestamp);
            let close = parse_price(&record, cols.close).unwrap_or(f64::NAN);

            bars.push(PriceBar {
                timestamp,
                open: parse_price(&record, cols.open),
                high: parse_price(&record, cols.high),
                low: parse_price(&record, cols.low),
                close,
                volume: parse_price(&record, cols.volume),
            });
        }

        if bars.is_empty() {
            return Err(SignalBtError::NoData {
                path: self.path.display().to_string(),
            });
        }
        Ok(bars)
    }

    fn fetch_signals(&self) -> Result<Option<Vec<Signal>>, SignalBtError> {
        let content = self.read_content()?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let cols = Self::resolve_columns(rdr.headers().map_err(|e| SignalBtError::Data {
            reason: format!("CSV parse error: {}", e),
        })?)?;

        let Some(signal_col) = cols.signal else {
            return Ok(None);
        };

        let mut signals = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SignalBtError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let cell = record.get(signal_col).unwrap_or("");
            signals.push(Signal::from_str_cell(cell, index)?);
        }
        Ok(Some(signals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn fetch_bars_reads_full_ohlcv() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n",
        );
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        let bars = adapter.fetch_bars().unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(
            bars[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
        assert_eq!(bars[0].open, Some(100.0));
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, Some(50000.0));
    }

    #[test]
    fn fetch_bars_accepts_close_only_files() {
        let file = write_csv("close\n100.0\n101.5\n99.0\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        let bars = adapter.fetch_bars().unwrap();

        assert_eq!(bars.len(), 3);
        assert!(bars[0].timestamp.is_none());
        assert!(bars[0].open.is_none());
        assert_eq!(bars[1].close, 101.5);
    }

    #[test]
    fn fetch_bars_parses_intraday_timestamps() {
        let file = write_csv(
            "timestamp,close\n\
             2024-01-15 09:30:00,100.0\n\
             2024-01-15 09:31:00,100.5\n",
        );
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        let bars = adapter.fetch_bars().unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0);
        assert_eq!(bars[0].timestamp, expected);
    }

    #[test]
    fn fetch_bars_requires_close_column() {
        let file = write_csv("timestamp,open\n2024-01-15,100.0\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        let err = adapter.fetch_bars().unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn fetch_bars_errors_on_empty_file() {
        let file = write_csv("timestamp,close\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        assert!(matches!(
            adapter.fetch_bars().unwrap_err(),
            SignalBtError::NoData { .. }
        ));
    }

    #[test]
    fn unparseable_close_degrades_to_nan() {
        let file = write_csv("close\n100.0\nn/a\n102.0\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        let bars = adapter.fetch_bars().unwrap();
        assert!(bars[1].close.is_nan());
        assert_eq!(bars[2].close, 102.0);
    }

    #[test]
    fn fetch_signals_reads_signal_column() {
        let file = write_csv("close,signal\n100.0,1\n101.0,0\n102.0,-1\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        let signals = adapter.fetch_signals().unwrap().unwrap();
        assert_eq!(signals, vec![Signal::Long, Signal::Flat, Signal::Short]);
    }

    #[test]
    fn fetch_signals_none_without_column() {
        let file = write_csv("close\n100.0\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        assert!(adapter.fetch_signals().unwrap().is_none());
    }

    #[test]
    fn fetch_signals_fails_fast_on_out_of_set_value() {
        let file = write_csv("close,signal\n100.0,1\n101.0,2\n");
        let adapter = CsvAdapter::new(file.path().to_path_buf());
        let err = adapter.fetch_signals().unwrap_err();
        assert!(matches!(
            err,
            SignalBtError::InvalidSignal { index: 1, .. }
        ));
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let adapter = CsvAdapter::new(PathBuf::from("/nonexistent/prices.csv"));
        assert!(matches!(
            adapter.fetch_bars().unwrap_err(),
            SignalBtError::Data { .. }
        ));
    }
}
