//! Signal classifier: maps a feature vector to a discrete trend state.
//!
//! The decision tree is evaluated top to bottom and the first matching rule
//! wins:
//!
//! | # | condition                                              | label         | strength |
//! |---|--------------------------------------------------------|---------------|----------|
//! | 1 | bull aligned, pullback to fast EMA, volume ratio < 1   | PULLBACK BUY  |  5 |
//! | 2 | bull aligned, volume ratio > surge, RSI < overbought   | STRONG BUY    |  4 |
//! | 3 | bull aligned                                           | BUY           |  3 |
//! | 4 | fast > mid and price > mid                             | LEAN BULL     |  2 |
//! | 5 | bear aligned, pullback to fast EMA, volume ratio < 1   | PULLBACK SELL | -5 |
//! | 6 | bear aligned, volume ratio > surge, RSI > oversold     | STRONG SELL   | -4 |
//! | 7 | bear aligned                                           | SELL          | -3 |
//! | 8 | fast < mid and price < mid                             | LEAN BEAR     | -2 |
//! | 9 | otherwise                                              | NEUTRAL       |  0 |

use tracing::debug;

use crate::config::ScannerConfig;
use crate::domain::SignalLabel;
use crate::indicators::FeatureVector;

/// Alignment and pullback flags derived from a feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendState {
    pub bull_aligned: bool,
    pub bear_aligned: bool,
    pub pullback_buy: bool,
    pub pullback_sell: bool,
}

impl TrendState {
    pub fn of(f: &FeatureVector, config: &ScannerConfig) -> Self {
        let bull_aligned = f.bull_aligned();
        let bear_aligned = f.bear_aligned();
        let dist = f.dist_to_fast();
        Self {
            bull_aligned,
            bear_aligned,
            pullback_buy: bull_aligned && config.pullback_long.contains(dist),
            pullback_sell: bear_aligned && config.pullback_short.contains(dist),
        }
    }

    pub fn aligned(&self) -> bool {
        self.bull_aligned || self.bear_aligned
    }

    pub fn pullback(&self) -> bool {
        self.pullback_buy || self.pullback_sell
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: SignalLabel,
    pub strength: i8,
    /// Human-readable rationale.
    pub note: String,
}

/// Classify the latest features. Pure: identical input yields identical output.
pub fn classify(f: &FeatureVector, config: &ScannerConfig) -> Classification {
    let state = TrendState::of(f, config);
    let (label, note) = if state.pullback_buy && f.vol_ratio < 1.0 {
        (
            SignalLabel::PullbackBuy,
            format!(
                "Price at 8 EMA (${:.2}) in uptrend on declining volume ({:.1}x). A+ long entry.",
                f.ema_fast, f.vol_ratio
            ),
        )
    } else if state.bull_aligned && f.vol_ratio > config.volume_surge && f.rsi < config.rsi_overbought
    {
        (
            SignalLabel::StrongBuy,
            format!(
                "Bull stack with volume surge ({:.1}x). Enter on an intraday dip.",
                f.vol_ratio
            ),
        )
    } else if state.bull_aligned {
        (
            SignalLabel::Buy,
            format!(
                "Trend up, EMAs stacked. Wait for a pullback to the 8 EMA (${:.2}).",
                f.ema_fast
            ),
        )
    } else if f.ema_fast > f.ema_mid && f.price > f.ema_mid {
        (
            SignalLabel::LeanBull,
            "Developing bullish trend. Wait for the full EMA stack.".to_string(),
        )
    } else if state.pullback_sell && f.vol_ratio < 1.0 {
        (
            SignalLabel::PullbackSell,
            format!(
                "Price at 8 EMA (${:.2}) in downtrend on light volume ({:.1}x). A+ short entry.",
                f.ema_fast, f.vol_ratio
            ),
        )
    } else if state.bear_aligned && f.vol_ratio > config.volume_surge && f.rsi > config.rsi_oversold
    {
        (
            SignalLabel::StrongSell,
            format!(
                "Bear stack with volume surge ({:.1}x). Enter on a bounce.",
                f.vol_ratio
            ),
        )
    } else if state.bear_aligned {
        (
            SignalLabel::Sell,
            format!(
                "Trend down. Wait for a bounce to the 8 EMA (${:.2}).",
                f.ema_fast
            ),
        )
    } else if f.ema_fast < f.ema_mid && f.price < f.ema_mid {
        (
            SignalLabel::LeanBear,
            "Bearish momentum developing. Wait for the full stack.".to_string(),
        )
    } else {
        (
            SignalLabel::Neutral,
            "No trend, EMAs tangled. Stay flat.".to_string(),
        )
    };

    Classification {
        label,
        strength: label.strength(),
        note,
    }
}

/// Stop, targets and per-share risk for a classified instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub stop_loss: f64,
    pub risk_per_share: f64,
    pub target_1: f64,
    pub target_2: f64,
}

pub fn trade_levels(f: &FeatureVector, strength: i8, config: &ScannerConfig) -> TradeLevels {
    let stop_loss = if f.bull_aligned() {
        f.ema_mid.min(f.support * (1.0 + config.level_buffer))
    } else if f.bear_aligned() {
        f.ema_mid.max(f.resistance * (1.0 - config.level_buffer))
    } else if strength >= 0 {
        f.support
    } else {
        f.resistance
    };

    let mut risk_per_share = (f.price - stop_loss).abs();
    if risk_per_share < config.min_risk_per_share {
        let synthetic = f.price * config.fallback_risk_pct;
        debug!(
            price = f.price,
            stop_loss,
            synthetic_risk = synthetic,
            "degenerate stop distance, substituting synthetic risk"
        );
        risk_per_share = synthetic;
    }

    let (target_1, target_2) = match strength.signum() {
        1 => (
            f.price + risk_per_share * config.target_1_r,
            f.price + risk_per_share * config.target_2_r,
        ),
        -1 => (
            f.price - risk_per_share * config.target_1_r,
            f.price - risk_per_share * config.target_2_r,
        ),
        _ => (f.price, f.price),
    };

    TradeLevels {
        stop_loss,
        risk_per_share,
        target_1,
        target_2,
    }
}
