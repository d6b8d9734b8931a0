//! Blocking HTTP GET with retry, backoff and circuit-breaker bookkeeping.

use serde::de::DeserializeOwned;
use std::time::Duration;

use super::circuit_breaker::CircuitBreaker;
use super::provider::DataError;

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

pub(crate) fn build_client() -> Result<reqwest::blocking::Client, DataError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and decode the JSON body.
///
/// 403 trips the breaker, 401 is returned at once, 429/5xx/timeouts are
/// retried with exponential backoff.
pub(crate) fn get_json<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    breaker: &CircuitBreaker,
    policy: RetryPolicy,
    ticker: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, DataError> {
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            std::thread::sleep(policy.base_delay * 2u32.pow(attempt - 1));
        }
        if !breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let resp = match client.get(url).query(query).send() {
            Ok(resp) => resp,
            Err(e) if e.is_connect() || e.is_timeout() => {
                breaker.record_failure();
                last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                continue;
            }
            Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
        };

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            breaker.trip();
            return Err(DataError::CircuitBreakerTripped);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataError::AuthenticationRequired(format!(
                "{url} rejected the credentials"
            )));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            breaker.record_failure();
            last_error = Some(DataError::Http {
                ticker: ticker.to_string(),
                status: status.as_u16(),
            });
            continue;
        }
        if !status.is_success() {
            return Err(DataError::Http {
                ticker: ticker.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.json::<T>().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;
        breaker.record_success();
        return Ok(body);
    }

    Err(last_error.unwrap_or_else(|| DataError::NetworkUnreachable("max retries exceeded".into())))
}
