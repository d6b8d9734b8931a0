//! Regime detector: aggregates per-instrument states into a market posture.

use crate::domain::{round_to, Regime, RegimeLabel, Signal};
use crate::indicators::NEUTRAL_RSI;

/// |strength| at or above this counts as actionable.
const ACTIONABLE_STRENGTH: i8 = 4;

pub fn detect_regime(signals: &[Signal], benchmark: Option<&Signal>) -> Regime {
    let total = signals.len();
    let bull_count = signals.iter().filter(|s| s.is_bullish()).count();
    let bear_count = signals.iter().filter(|s| s.is_bearish()).count();
    let neutral_count = total - bull_count - bear_count;
    let actionable_count = signals
        .iter()
        .filter(|s| s.signal_strength.abs() >= ACTIONABLE_STRENGTH)
        .count();

    let (avg_rsi, bull_pct) = if total == 0 {
        (NEUTRAL_RSI, 0.0)
    } else {
        (
            signals.iter().map(|s| s.rsi).sum::<f64>() / total as f64,
            bull_count as f64 / total as f64 * 100.0,
        )
    };

    let label = if bull_pct > 70.0 {
        RegimeLabel::StrongUptrend
    } else if bull_pct > 50.0 {
        RegimeLabel::ModerateBull
    } else if bull_pct > 30.0 {
        RegimeLabel::Choppy
    } else {
        RegimeLabel::Bearish
    };

    let description = match label {
        RegimeLabel::StrongUptrend => {
            format!("{bull_count}/{total} bullish. Aggressive pullback entries.")
        }
        RegimeLabel::ModerateBull => format!("{bull_count}/{total} bullish. Mixed but leaning up."),
        RegimeLabel::Choppy => "No clear direction. Reduce frequency.".to_string(),
        RegimeLabel::Bearish => format!("{bear_count}/{total} bearish."),
    };

    Regime {
        regime: label,
        bull_count,
        bear_count,
        neutral_count,
        avg_rsi: round_to(avg_rsi, 1),
        actionable_count,
        sizing_advice: label.sizing_advice().to_string(),
        description,
        regime_multiplier: label.multiplier(),
        spy_above_21ema: benchmark.map(|b| b.current_price > b.ema21),
    }
}
