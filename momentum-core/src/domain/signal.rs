//! Per-instrument signal, recomputed on every scan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trend state assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalLabel {
    #[serde(rename = "PULLBACK BUY")]
    PullbackBuy,
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "LEAN BULL")]
    LeanBull,
    #[serde(rename = "PULLBACK SELL")]
    PullbackSell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "LEAN BEAR")]
    LeanBear,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}

impl SignalLabel {
    /// Signed strength in [-5, 5].
    pub fn strength(self) -> i8 {
        match self {
            SignalLabel::PullbackBuy => 5,
            SignalLabel::StrongBuy => 4,
            SignalLabel::Buy => 3,
            SignalLabel::LeanBull => 2,
            SignalLabel::Neutral => 0,
            SignalLabel::LeanBear => -2,
            SignalLabel::Sell => -3,
            SignalLabel::StrongSell => -4,
            SignalLabel::PullbackSell => -5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalLabel::PullbackBuy => "PULLBACK BUY",
            SignalLabel::StrongBuy => "STRONG BUY",
            SignalLabel::Buy => "BUY",
            SignalLabel::LeanBull => "LEAN BULL",
            SignalLabel::PullbackSell => "PULLBACK SELL",
            SignalLabel::StrongSell => "STRONG SELL",
            SignalLabel::Sell => "SELL",
            SignalLabel::LeanBear => "LEAN BEAR",
            SignalLabel::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the order book and the reports need to know about one instrument today.
///
/// Prices and EMAs are rounded to cents, RSI and conviction to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub ticker: String,
    pub name: String,
    pub weight: f64,
    pub sector: String,
    pub current_price: f64,
    pub ema8: f64,
    pub ema21: f64,
    pub ema50: f64,
    pub rsi: f64,
    pub vol_ratio: f64,
    pub change_1d: f64,
    pub change_5d: f64,
    pub change_20d: f64,
    pub bull_stacked: bool,
    pub bear_stacked: bool,
    pub ema_spread: f64,
    pub dist_to_8: f64,
    pub dist_to_21: f64,
    pub is_pullback_buy: bool,
    pub is_pullback_sell: bool,
    pub signal: SignalLabel,
    pub signal_strength: i8,
    pub action_note: String,
    pub stop_loss: f64,
    pub target_1: f64,
    pub target_2: f64,
    pub risk_per_share: f64,
    pub position_size: u64,
    pub support: f64,
    pub resistance: f64,
    pub conviction_score: f64,
}

impl Signal {
    pub fn is_bullish(&self) -> bool {
        self.signal_strength > 0
    }

    pub fn is_bearish(&self) -> bool {
        self.signal_strength < 0
    }
}
