//! Conviction scorer: bounded 0-100 rating of setup quality.
//!
//! Additive points, capped at 100:
//! - 25 trend aligned (either direction)
//! - 30 pullback to the fast EMA
//! - 15 strong signal (|strength| >= 4) on a volume surge, else 20 for a pullback on light volume
//! - 10 RSI in (35, 65), else 5 when RSI supports the bias without exhaustion
//! - 10 EMA spread beyond 3%, else 5 beyond 1.5%
//! - 10 five-day return agrees with the signal direction
//! - 5 benchmark weight above 3%

use super::classifier::TrendState;
use crate::config::ScannerConfig;
use crate::indicators::FeatureVector;

pub const MAX_CONVICTION: f64 = 100.0;

pub fn conviction_score(
    f: &FeatureVector,
    state: &TrendState,
    strength: i8,
    weight: f64,
    config: &ScannerConfig,
) -> f64 {
    let mut score: f64 = 0.0;

    if state.aligned() {
        score += 25.0;
    }
    if state.pullback() {
        score += 30.0;
    }

    if strength.abs() >= 4 && f.vol_ratio > config.conviction_volume_surge {
        score += 15.0;
    } else if f.vol_ratio < 1.0 && state.pullback() {
        score += 20.0;
    }

    if f.rsi > 35.0 && f.rsi < 65.0 {
        score += 10.0;
    } else if (strength > 0 && f.rsi < config.rsi_overbought)
        || (strength < 0 && f.rsi > config.rsi_oversold)
    {
        score += 5.0;
    }

    let spread = f.ema_spread().abs();
    if spread > 3.0 {
        score += 10.0;
    } else if spread > 1.5 {
        score += 5.0;
    }

    if (strength > 0 && f.change_5d > 0.0) || (strength < 0 && f.change_5d < 0.0) {
        score += 10.0;
    }

    if weight > 3.0 {
        score += 5.0;
    }

    score.min(MAX_CONVICTION)
}
