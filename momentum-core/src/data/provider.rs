//! Market-data boundary: provider trait, tagged fetch outcome, error types.
//!
//! Providers never fail a scan. Every problem fetching one ticker comes back as
//! [`FetchOutcome::Unavailable`] and the scanner moves on to the next.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::Bar;

/// One row as delivered by a provider, before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {ticker}")]
    Http { ticker: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed CSV {path}: {reason}")]
    Csv { path: String, reason: String },
}

/// Result of asking a provider for one ticker's history.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Ascending by date, at most `lookback_days` long, never empty.
    Bars(Vec<Bar>),
    Unavailable(DataError),
}

impl FetchOutcome {
    /// Wrap cleaned bars, treating an empty sequence as unavailable.
    pub fn from_bars(ticker: &str, bars: Vec<Bar>) -> Self {
        if bars.is_empty() {
            FetchOutcome::Unavailable(DataError::NoData {
                ticker: ticker.to_string(),
            })
        } else {
            FetchOutcome::Bars(bars)
        }
    }

    pub fn bars(self) -> Option<Vec<Bar>> {
        match self {
            FetchOutcome::Bars(bars) => Some(bars),
            FetchOutcome::Unavailable(_) => None,
        }
    }
}

impl From<Result<Vec<Bar>, DataError>> for FetchOutcome {
    fn from(result: Result<Vec<Bar>, DataError>) -> Self {
        match result {
            Ok(bars) => FetchOutcome::Bars(bars),
            Err(e) => FetchOutcome::Unavailable(e),
        }
    }
}

/// A source of daily bars.
pub trait BarProvider: Send + Sync {
    fn name(&self) -> &str;

    /// The most recent `lookback_days` daily bars for `ticker`.
    fn get_daily_bars(&self, ticker: &str, lookback_days: usize) -> FetchOutcome;

    /// Courtesy delay between consecutive requests.
    fn rate_limit_pause(&self);
}

/// Which provider a run should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Polygon when an API key is configured, otherwise Yahoo.
    #[default]
    Auto,
    Polygon,
    Yahoo,
    Csv,
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(DataSource::Auto),
            "polygon" => Ok(DataSource::Polygon),
            "yahoo" => Ok(DataSource::Yahoo),
            "csv" => Ok(DataSource::Csv),
            other => Err(format!(
                "unknown data source '{other}' (expected auto, polygon, yahoo or csv)"
            )),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::Auto => "auto",
            DataSource::Polygon => "polygon",
            DataSource::Yahoo => "yahoo",
            DataSource::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Clean provider rows into a bar sequence.
///
/// Rows without a close are dropped; missing open/high/low fall back to the
/// close and missing volume to zero. The result is sorted ascending, has one
/// bar per date (last row wins) and keeps only the newest `lookback_days`.
pub fn normalize_bars(rows: Vec<RawBar>, lookback_days: usize) -> Vec<Bar> {
    let mut bars: Vec<Bar> = rows
        .into_iter()
        .filter_map(|row| {
            let close = row.close.filter(|c| c.is_finite())?;
            let or_close = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(close);
            Some(Bar {
                date: row.date,
                open: or_close(row.open),
                high: or_close(row.high),
                low: or_close(row.low),
                close,
                volume: row.volume.unwrap_or(0),
            })
        })
        .collect();

    bars.sort_by_key(|b| b.date);
    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => deduped.push(bar),
        }
    }

    if deduped.len() > lookback_days {
        deduped.drain(..deduped.len() - lookback_days);
    }
    deduped
}
