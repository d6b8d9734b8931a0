//! Streaming indicator implementations.
//!
//! Every indicator is a small recurrence: it is fed one bar at a time and keeps
//! only the state needed for its next value. `FeatureEngine` composes them into
//! the per-instrument feature vector.

pub mod ema;
pub mod features;
pub mod rsi;
pub mod window;

pub use ema::{ema_of_series, Ema};
pub use features::{compute_features, AnalysisError, FeatureEngine, FeatureVector};
pub use rsi::{Rsi, NEUTRAL_RSI};
pub use window::RollingWindow;

use crate::domain::Bar;

/// A bar-driven streaming indicator.
pub trait Indicator {
    /// Stable name, e.g. `ema_21`.
    fn name(&self) -> &str;

    /// Bars consumed before `value` is defined.
    fn lookback(&self) -> usize;

    /// Fold the next bar into the indicator state.
    fn update(&mut self, bar: &Bar);

    /// Value as of the last bar, `None` while undefined.
    fn value(&self) -> Option<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
