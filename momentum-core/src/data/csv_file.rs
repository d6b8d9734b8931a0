//! Offline provider reading `<dir>/<TICKER>.csv`.
//!
//! Expected header: `date,open,high,low,close,volume` with ISO dates. Empty
//! cells are treated as missing values. Extra columns are ignored.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::provider::{normalize_bars, BarProvider, DataError, FetchOutcome, RawBar};
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    fn read(&self, path: &Path, lookback_days: usize) -> Result<Vec<Bar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut rows = Vec::new();
        for record in reader.deserialize::<CsvRow>() {
            let row = record.map_err(|e| DataError::Csv {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            rows.push(RawBar {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume.filter(|v| *v >= 0.0).map(|v| v.round() as u64),
            });
        }
        Ok(normalize_bars(rows, lookback_days))
    }
}

impl BarProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn get_daily_bars(&self, ticker: &str, lookback_days: usize) -> FetchOutcome {
        let path = self.path_for(ticker);
        match self.read(&path, lookback_days) {
            Ok(bars) => FetchOutcome::from_bars(ticker, bars),
            Err(e) => {
                warn!(ticker, error = %e, "csv read failed");
                FetchOutcome::Unavailable(e)
            }
        }
    }

    fn rate_limit_pause(&self) {}
}
