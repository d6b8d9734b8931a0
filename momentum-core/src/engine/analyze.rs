//! Per-instrument analysis: bars → features → classification → Signal.

use super::classifier::{classify, trade_levels, TrendState};
use super::conviction::conviction_score;
use crate::config::ScannerConfig;
use crate::domain::{round_to, Bar, Instrument, Signal};
use crate::indicators::{compute_features, AnalysisError, FeatureVector};

/// Analyze one instrument's bar history.
///
/// Fails with `InsufficientHistory` when fewer than `slow EMA + 5` bars are given.
pub fn analyze_instrument(
    bars: &[Bar],
    instrument: &Instrument,
    config: &ScannerConfig,
) -> Result<Signal, AnalysisError> {
    let features = compute_features(bars, config)?;
    Ok(build_signal(&features, instrument, config))
}

/// Assemble a Signal from an already computed feature vector.
pub fn build_signal(f: &FeatureVector, instrument: &Instrument, config: &ScannerConfig) -> Signal {
    let state = TrendState::of(f, config);
    let classification = classify(f, config);
    let strength = classification.strength;
    let levels = trade_levels(f, strength, config);

    let risk_amount = config.account_size as f64 * config.risk_pct;
    let position_size = if levels.risk_per_share > 0.0 {
        (risk_amount / levels.risk_per_share).floor() as u64
    } else {
        0
    };

    let conviction = conviction_score(f, &state, strength, instrument.weight, config);

    Signal {
        ticker: instrument.ticker.clone(),
        name: instrument.name.clone(),
        weight: instrument.weight,
        sector: instrument.sector.clone(),
        current_price: round_to(f.price, 2),
        ema8: round_to(f.ema_fast, 2),
        ema21: round_to(f.ema_mid, 2),
        ema50: round_to(f.ema_slow, 2),
        rsi: round_to(f.rsi, 1),
        vol_ratio: round_to(f.vol_ratio, 2),
        change_1d: round_to(f.change_1d, 2),
        change_5d: round_to(f.change_5d, 2),
        change_20d: round_to(f.change_20d, 2),
        bull_stacked: state.bull_aligned,
        bear_stacked: state.bear_aligned,
        ema_spread: round_to(f.ema_spread(), 2),
        dist_to_8: round_to(f.dist_to_fast(), 2),
        dist_to_21: round_to(f.dist_to_mid(), 2),
        is_pullback_buy: state.pullback_buy,
        is_pullback_sell: state.pullback_sell,
        signal: classification.label,
        signal_strength: strength,
        action_note: classification.note,
        stop_loss: round_to(levels.stop_loss, 2),
        target_1: round_to(levels.target_1, 2),
        target_2: round_to(levels.target_2, 2),
        risk_per_share: round_to(levels.risk_per_share, 2),
        position_size,
        support: round_to(f.support, 2),
        resistance: round_to(f.resistance, 2),
        conviction_score: round_to(conviction, 1),
    }
}
