//! Yahoo Finance provider (v8 chart API, no key).
//!
//! Yahoo has no official API and changes its response format without notice;
//! anything unexpected comes back as `ResponseFormatChanged`.

use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::circuit_breaker::CircuitBreaker;
use super::http::{build_client, get_json, RetryPolicy};
use super::provider::{normalize_bars, BarProvider, DataError, FetchOutcome, RawBar};
use crate::domain::Bar;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    pause: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        Ok(Self {
            client: build_client()?,
            circuit_breaker,
            retry: RetryPolicy::default(),
            pause: Duration::from_millis(500),
        })
    }

    /// Yahoo spells share classes with a dash: `BRK.B` → `BRK-B`.
    pub fn yahoo_symbol(ticker: &str) -> String {
        ticker.replace('.', "-")
    }

    fn fetch(&self, ticker: &str, lookback_days: usize) -> Result<Vec<Bar>, DataError> {
        let now = Utc::now();
        let start = now - ChronoDuration::days(lookback_days as i64 + 30);
        let url = format!("{CHART_URL}/{}", Self::yahoo_symbol(ticker));
        let query = [
            ("period1", start.timestamp().to_string()),
            ("period2", now.timestamp().to_string()),
            ("interval", "1d".to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ];
        let chart: ChartResponse =
            get_json(&self.client, &self.circuit_breaker, self.retry, ticker, &url, &query)?;
        let rows = parse_chart(ticker, chart)?;
        Ok(normalize_bars(rows, lookback_days))
    }
}

fn parse_chart(ticker: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
    let Some(data) = resp.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::NoData {
                ticker: ticker.to_string(),
            },
            Some(err) => DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
            None => DataError::ResponseFormatChanged(format!("no chart results for {ticker}")),
        });
    };

    let timestamps = data
        .timestamp
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("no timestamps for {ticker}")))?;
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("no quote data for {ticker}")))?;

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;
        rows.push(RawBar {
            date,
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close: quote.close.get(i).copied().flatten(),
            volume: quote.volume.get(i).copied().flatten(),
        });
    }
    Ok(rows)
}

impl BarProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn get_daily_bars(&self, ticker: &str, lookback_days: usize) -> FetchOutcome {
        match self.fetch(ticker, lookback_days) {
            Ok(bars) => FetchOutcome::from_bars(ticker, bars),
            Err(e) => {
                warn!(ticker, error = %e, "yahoo fetch failed");
                FetchOutcome::Unavailable(e)
            }
        }
    }

    fn rate_limit_pause(&self) {
        std::thread::sleep(self.pause);
    }
}
