//! Polygon.io provider (v2 aggregates API, requires an API key).

use chrono::{Duration as ChronoDuration, Local};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::circuit_breaker::CircuitBreaker;
use super::http::{build_client, get_json, RetryPolicy};
use super::provider::{normalize_bars, BarProvider, DataError, FetchOutcome, RawBar};
use crate::domain::Bar;

const BASE_URL: &str = "https://api.polygon.io";

#[derive(Debug, Deserialize)]
struct AggsResponse {
    #[serde(default, rename = "resultsCount")]
    results_count: usize,
    #[serde(default)]
    results: Vec<Agg>,
}

#[derive(Debug, Deserialize)]
struct Agg {
    /// Window start, epoch milliseconds.
    t: i64,
    o: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    c: Option<f64>,
    v: Option<f64>,
}

pub struct PolygonProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    circuit_breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    pause: Duration,
}

impl PolygonProvider {
    pub fn new(api_key: impl Into<String>, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DataError::AuthenticationRequired("POLYGON_API_KEY is empty".into()));
        }
        Ok(Self {
            client: build_client()?,
            api_key,
            circuit_breaker,
            retry: RetryPolicy::default(),
            pause: Duration::from_millis(250),
        })
    }

    fn fetch(&self, ticker: &str, lookback_days: usize) -> Result<Vec<Bar>, DataError> {
        let end = Local::now().date_naive();
        let start = end - ChronoDuration::days(lookback_days as i64 + 30);
        let url = format!("{BASE_URL}/v2/aggs/ticker/{ticker}/range/1/day/{start}/{end}");
        let query = [
            ("adjusted", "true".to_string()),
            ("sort", "asc".to_string()),
            ("limit", (lookback_days + 30).to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        let aggs: AggsResponse =
            get_json(&self.client, &self.circuit_breaker, self.retry, ticker, &url, &query)?;
        let rows = parse_aggs(aggs)?;
        Ok(normalize_bars(rows, lookback_days))
    }
}

fn parse_aggs(resp: AggsResponse) -> Result<Vec<RawBar>, DataError> {
    if resp.results_count == 0 {
        return Ok(Vec::new());
    }
    resp.results
        .into_iter()
        .map(|agg| {
            let date = chrono::DateTime::from_timestamp_millis(agg.t)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {}", agg.t))
                })?;
            Ok(RawBar {
                date,
                open: agg.o,
                high: agg.h,
                low: agg.l,
                close: agg.c,
                volume: agg.v.filter(|v| *v >= 0.0).map(|v| v.round() as u64),
            })
        })
        .collect()
}

impl BarProvider for PolygonProvider {
    fn name(&self) -> &str {
        "polygon"
    }

    fn get_daily_bars(&self, ticker: &str, lookback_days: usize) -> FetchOutcome {
        match self.fetch(ticker, lookback_days) {
            Ok(bars) => FetchOutcome::from_bars(ticker, bars),
            Err(e) => {
                warn!(ticker, error = %e, "polygon fetch failed");
                FetchOutcome::Unavailable(e)
            }
        }
    }

    fn rate_limit_pause(&self) {
        std::thread::sleep(self.pause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aggregates() {
        let json = r#"{
          "ticker": "AAPL", "resultsCount": 2, "status": "OK",
          "results": [
            {"v": 70790813.0, "o": 190.1, "c": 191.2, "h": 192.0, "l": 189.5, "t": 1717387200000},
            {"v": 5.5e7, "o": 191.2, "c": 193.0, "h": 193.4, "l": 190.9, "t": 1717473600000}
          ]
        }"#;
        let resp: AggsResponse = serde_json::from_str(json).unwrap();
        let rows = parse_aggs(resp).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].volume, Some(70_790_813));
        assert_eq!(rows[1].date.to_string(), "2024-06-04");
    }

    #[test]
    fn zero_results_is_empty() {
        let resp: AggsResponse = serde_json::from_str(r#"{"resultsCount": 0}"#).unwrap();
        assert!(parse_aggs(resp).unwrap().is_empty());
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = PolygonProvider::new("  ", Arc::new(CircuitBreaker::for_scan())).err();
        assert!(matches!(err, Some(DataError::AuthenticationRequired(_))));
    }
}
