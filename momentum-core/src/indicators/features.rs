//! Feature engine: folds a bar sequence into the feature vector the classifier reads.
//!
//! Each indicator keeps only its last value plus the trailing windows it
//! needs, so the engine can be driven bar by bar and inspected at any point.

use thiserror::Error;

use super::{Ema, Indicator, RollingWindow, Rsi};
use crate::config::ScannerConfig;
use crate::domain::Bar;

/// Longest trailing return horizon, in sessions.
const MAX_RETURN_HORIZON: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("insufficient history: {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },
}

/// Technical features of one instrument as of its latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub price: f64,
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub vol_ratio: f64,
    pub change_1d: f64,
    pub change_5d: f64,
    pub change_20d: f64,
    pub support: f64,
    pub resistance: f64,
}

impl FeatureVector {
    /// fast > mid > slow
    pub fn bull_aligned(&self) -> bool {
        self.ema_fast > self.ema_mid && self.ema_mid > self.ema_slow
    }

    /// fast < mid < slow
    pub fn bear_aligned(&self) -> bool {
        self.ema_fast < self.ema_mid && self.ema_mid < self.ema_slow
    }

    /// Distance between fast and slow EMA, in percent of the slow EMA.
    pub fn ema_spread(&self) -> f64 {
        (self.ema_fast - self.ema_slow) / self.ema_slow * 100.0
    }

    /// Price distance from the fast EMA, in percent.
    pub fn dist_to_fast(&self) -> f64 {
        (self.price - self.ema_fast) / self.ema_fast * 100.0
    }

    /// Price distance from the mid EMA, in percent.
    pub fn dist_to_mid(&self) -> f64 {
        (self.price - self.ema_mid) / self.ema_mid * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct FeatureEngine {
    fast: Ema,
    mid: Ema,
    slow: Ema,
    rsi: Rsi,
    volume_short: RollingWindow,
    volume_long: RollingWindow,
    closes: RollingWindow,
    highs: RollingWindow,
    lows: RollingWindow,
    bars_seen: usize,
    min_history: usize,
}

impl FeatureEngine {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            fast: Ema::new(config.ema.fast),
            mid: Ema::new(config.ema.mid),
            slow: Ema::new(config.ema.slow),
            rsi: Rsi::new(config.rsi_period),
            volume_short: RollingWindow::new(config.volume_short_window),
            volume_long: RollingWindow::new(config.volume_long_window),
            closes: RollingWindow::new(MAX_RETURN_HORIZON + 1),
            highs: RollingWindow::new(config.level_window),
            lows: RollingWindow::new(config.level_window),
            bars_seen: 0,
            min_history: config.min_history(),
        }
    }

    pub fn update(&mut self, bar: &Bar) {
        self.fast.update(bar);
        self.mid.update(bar);
        self.slow.update(bar);
        self.rsi.update(bar);
        self.volume_short.push(bar.volume as f64);
        self.volume_long.push(bar.volume as f64);
        self.closes.push(bar.close);
        self.highs.push(bar.high);
        self.lows.push(bar.low);
        self.bars_seen += 1;
    }

    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    /// Features as of the latest bar, once enough history has been seen.
    pub fn snapshot(&self) -> Result<FeatureVector, AnalysisError> {
        let insufficient = AnalysisError::InsufficientHistory {
            have: self.bars_seen,
            need: self.min_history,
        };
        if self.bars_seen < self.min_history {
            return Err(insufficient);
        }
        let (Some(price), Some(ema_fast), Some(ema_mid), Some(ema_slow)) = (
            self.closes.latest(),
            self.fast.value(),
            self.mid.value(),
            self.slow.value(),
        ) else {
            return Err(insufficient);
        };

        let vol_ratio = match (self.volume_short.mean(), self.volume_long.mean()) {
            (Some(short), Some(long)) if long > 0.0 => short / long,
            _ => 1.0,
        };

        Ok(FeatureVector {
            price,
            ema_fast,
            ema_mid,
            ema_slow,
            rsi: self.rsi.value_or_neutral(),
            vol_ratio,
            change_1d: self.trailing_return(1),
            change_5d: self.trailing_return(5),
            change_20d: self.trailing_return(20),
            support: self.lows.min().unwrap_or(price),
            resistance: self.highs.max().unwrap_or(price),
        })
    }

    /// Percent change of close over `n` sessions, zero without enough bars.
    fn trailing_return(&self, n: usize) -> f64 {
        match (self.closes.latest(), self.closes.ago(n)) {
            (Some(now), Some(then)) if then != 0.0 => (now - then) / then * 100.0,
            _ => 0.0,
        }
    }
}

/// Run the engine over a full bar sequence.
pub fn compute_features(
    bars: &[Bar],
    config: &ScannerConfig,
) -> Result<FeatureVector, AnalysisError> {
    let mut engine = FeatureEngine::new(config);
    for bar in bars {
        engine.update(bar);
    }
    engine.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn too_few_bars_is_insufficient_history() {
        let config = ScannerConfig::default();
        let bars = make_bars(&[100.0; 54]);
        let err = compute_features(&bars, &config).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientHistory { have: 54, need: 55 });
    }

    #[test]
    fn flat_series_converges_to_price() {
        let config = ScannerConfig::default();
        let bars = make_bars(&[100.0; 60]);
        let f = compute_features(&bars, &config).unwrap();
        assert_approx(f.ema_fast, 100.0, 1e-9);
        assert_approx(f.ema_mid, 100.0, 1e-9);
        assert_approx(f.ema_slow, 100.0, 1e-9);
        assert_eq!(f.rsi, 50.0);
        assert_eq!(f.vol_ratio, 1.0);
        assert_eq!(f.change_20d, 0.0);
        assert!(!f.bull_aligned() && !f.bear_aligned());
    }

    #[test]
    fn trailing_returns_and_levels() {
        let config = ScannerConfig::default();
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let f = compute_features(&bars, &config).unwrap();
        assert_approx(f.change_1d, (159.0 - 158.0) / 158.0 * 100.0, 1e-9);
        assert_approx(f.change_5d, (159.0 - 154.0) / 154.0 * 100.0, 1e-9);
        assert_approx(f.change_20d, (159.0 - 139.0) / 139.0 * 100.0, 1e-9);
        // make_bars: low = min(open, close) - 1 over the last 20 bars
        assert_approx(f.support, 138.0, 1e-9);
        assert_approx(f.resistance, 160.0, 1e-9);
        assert!(f.bull_aligned());
    }

    #[test]
    fn zero_volume_gives_unit_ratio() {
        let config = ScannerConfig::default();
        let mut bars = make_bars(&[100.0; 60]);
        for bar in &mut bars {
            bar.volume = 0;
        }
        let f = compute_features(&bars, &config).unwrap();
        assert_eq!(f.vol_ratio, 1.0);
    }

    #[test]
    fn volume_ratio_uses_short_over_long_mean() {
        let config = ScannerConfig::default();
        let mut bars = make_bars(&[100.0; 60]);
        let n = bars.len();
        for bar in &mut bars[n - 5..] {
            bar.volume = 3000;
        }
        let f = compute_features(&bars, &config).unwrap();
        // short mean 3000, long mean (15 * 1000 + 5 * 3000) / 20 = 1500
        assert_approx(f.vol_ratio, 2.0, 1e-9);
    }
}
