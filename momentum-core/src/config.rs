//! Scanner configuration: one immutable value object for every tunable.
//!
//! Every field has a default matching the production strategy, so a TOML file
//! only needs to list the values it overrides:
//!
//! ```toml
//! max_positions = 3
//! risk_pct = 0.01
//!
//! [ema]
//! fast = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Trend periods for the fast/mid/slow exponential moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaPeriods {
    pub fast: usize,
    pub mid: usize,
    pub slow: usize,
}

impl Default for EmaPeriods {
    fn default() -> Self {
        Self {
            fast: 8,
            mid: 21,
            slow: 50,
        }
    }
}

/// Price band around the fast EMA, in percent, that counts as a pullback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PullbackBand {
    pub lower: f64,
    pub upper: f64,
}

impl PullbackBand {
    /// Open interval test.
    pub fn contains(&self, dist_pct: f64) -> bool {
        self.lower < dist_pct && dist_pct < self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub ema: EmaPeriods,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// RSI above this exits a long.
    pub rsi_exhaustion_high: f64,
    /// RSI below this exits a short.
    pub rsi_exhaustion_low: f64,
    /// Calendar of trading days requested from the data provider.
    pub lookback_days: usize,
    pub volume_short_window: usize,
    pub volume_long_window: usize,
    /// Window for support (min low) and resistance (max high).
    pub level_window: usize,
    pub pullback_long: PullbackBand,
    pub pullback_short: PullbackBand,
    pub volume_surge: f64,
    /// Volume ratio that earns the conviction surge bonus on strong signals.
    pub conviction_volume_surge: f64,
    /// Stop placed this fraction beyond support/resistance.
    pub level_buffer: f64,
    pub target_1_r: f64,
    pub target_2_r: f64,
    /// Risk per share below this is treated as degenerate.
    pub min_risk_per_share: f64,
    /// Synthetic risk, as a fraction of price, used for degenerate stops.
    pub fallback_risk_pct: f64,
    /// Fraction of the account risked per trade.
    pub risk_pct: f64,
    /// Fraction of the account at risk across all positions.
    pub max_portfolio_risk: f64,
    pub max_positions: usize,
    /// Unrealized gain, in percent, after which a long's stop trails to the fast EMA.
    pub tighten_stop_gain_pct: f64,
    /// Buy orders allocated less than this many dollars are dropped.
    pub min_order_dollars: f64,
    pub account_size: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            ema: EmaPeriods::default(),
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            rsi_exhaustion_high: 80.0,
            rsi_exhaustion_low: 20.0,
            lookback_days: 80,
            volume_short_window: 5,
            volume_long_window: 20,
            level_window: 20,
            pullback_long: PullbackBand {
                lower: -1.5,
                upper: 0.5,
            },
            pullback_short: PullbackBand {
                lower: -0.5,
                upper: 1.5,
            },
            volume_surge: 1.3,
            conviction_volume_surge: 1.2,
            level_buffer: 0.005,
            target_1_r: 2.5,
            target_2_r: 3.5,
            min_risk_per_share: 0.01,
            fallback_risk_pct: 0.02,
            risk_pct: 0.02,
            max_portfolio_risk: 0.10,
            max_positions: 5,
            tighten_stop_gain_pct: 3.0,
            min_order_dollars: 1.0,
            account_size: 1000,
        }
    }
}

impl ScannerConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Minimum number of bars needed before a signal can be produced.
    pub fn min_history(&self) -> usize {
        self.ema.slow + 5
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let EmaPeriods { fast, mid, slow } = self.ema;
        if fast == 0 || !(fast < mid && mid < slow) {
            return Err(ConfigError::Invalid(format!(
                "EMA periods must be strictly ascending and non-zero, got {fast}/{mid}/{slow}"
            )));
        }
        if self.rsi_period == 0 {
            return Err(ConfigError::Invalid("rsi_period must be >= 1".into()));
        }
        if self.volume_short_window == 0 || self.volume_long_window < self.volume_short_window {
            return Err(ConfigError::Invalid(
                "volume windows must be non-zero with long >= short".into(),
            ));
        }
        if self.level_window == 0 {
            return Err(ConfigError::Invalid("level_window must be >= 1".into()));
        }
        if !(self.risk_pct > 0.0 && self.risk_pct < 1.0) {
            return Err(ConfigError::Invalid("risk_pct must be in (0, 1)".into()));
        }
        if self.max_portfolio_risk <= 0.0 {
            return Err(ConfigError::Invalid("max_portfolio_risk must be > 0".into()));
        }
        if self.max_positions == 0 {
            return Err(ConfigError::Invalid("max_positions must be >= 1".into()));
        }
        if self.account_size == 0 {
            return Err(ConfigError::Invalid("account_size must be positive".into()));
        }
        if self.lookback_days < self.min_history() {
            return Err(ConfigError::Invalid(format!(
                "lookback_days {} is shorter than the {} bars the slow EMA needs",
                self.lookback_days,
                self.min_history()
            )));
        }
        Ok(())
    }

    /// Same config with a different account size.
    pub fn with_account_size(mut self, account_size: u64) -> Self {
        self.account_size = account_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScannerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.min_history(), 55);
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config = ScannerConfig::from_toml(
            r#"
max_positions = 3

[ema]
fast = 10
"#,
        )
        .unwrap();
        assert_eq!(config.max_positions, 3);
        assert_eq!(config.ema.fast, 10);
        assert_eq!(config.ema.mid, 21);
        assert_eq!(config.rsi_period, 14);
    }

    #[test]
    fn rejects_unordered_ema_periods() {
        let err = ScannerConfig::from_toml("[ema]\nfast = 30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_short_lookback() {
        assert!(ScannerConfig::from_toml("lookback_days = 40\n").is_err());
    }

    #[test]
    fn pullback_band_is_open_interval() {
        let band = ScannerConfig::default().pullback_long;
        assert!(band.contains(-1.0));
        assert!(!band.contains(-1.5));
        assert!(!band.contains(0.5));
    }
}
