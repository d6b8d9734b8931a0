use serde::{Deserialize, Serialize};
use std::fmt;

/// Market-wide posture derived from the share of bullish instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeLabel {
    #[serde(rename = "STRONG UPTREND")]
    StrongUptrend,
    #[serde(rename = "MODERATE BULL")]
    ModerateBull,
    #[serde(rename = "CHOPPY")]
    Choppy,
    #[serde(rename = "BEARISH")]
    Bearish,
}

impl RegimeLabel {
    /// Scale applied to capital available for new entries.
    pub fn multiplier(self) -> f64 {
        match self {
            RegimeLabel::StrongUptrend => 1.5,
            RegimeLabel::ModerateBull => 1.0,
            RegimeLabel::Choppy => 0.5,
            RegimeLabel::Bearish => 0.25,
        }
    }

    pub fn sizing_advice(self) -> &'static str {
        match self {
            RegimeLabel::StrongUptrend => "SIZE UP. Full positions, environment favors momentum.",
            RegimeLabel::ModerateBull => "NORMAL. Be selective, highest-conviction only.",
            RegimeLabel::Choppy => "HALF SIZE. Choppy tape kills swing traders, cut exposure.",
            RegimeLabel::Bearish => "QUARTER SIZE. Only high-conviction setups or stay cash.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegimeLabel::StrongUptrend => "STRONG UPTREND",
            RegimeLabel::ModerateBull => "MODERATE BULL",
            RegimeLabel::Choppy => "CHOPPY",
            RegimeLabel::Bearish => "BEARISH",
        }
    }
}

impl fmt::Display for RegimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub regime: RegimeLabel,
    pub bull_count: usize,
    pub bear_count: usize,
    pub neutral_count: usize,
    pub avg_rsi: f64,
    pub actionable_count: usize,
    pub sizing_advice: String,
    pub description: String,
    pub regime_multiplier: f64,
    /// Only known when a benchmark signal was available.
    pub spy_above_21ema: Option<bool>,
}
