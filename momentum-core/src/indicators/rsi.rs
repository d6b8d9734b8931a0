//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses as an exponential
//! recurrence with alpha = 1 / period. The first bar counts as a zero-change
//! observation. RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period - 1. Before that, and when there has been no movement at
//! all, the value is the neutral 50.

use super::Indicator;
use crate::domain::Bar;

pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    alpha: f64,
    prev_close: Option<f64>,
    avg_gain: f64,
    avg_loss: f64,
    observations: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            alpha: 1.0 / period as f64,
            prev_close: None,
            avg_gain: 0.0,
            avg_loss: 0.0,
            observations: 0,
            name: format!("rsi_{period}"),
        }
    }

    pub fn push(&mut self, close: f64) {
        let change = self.prev_close.map_or(0.0, |prev| close - prev);
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if self.observations == 0 {
            self.avg_gain = gain;
            self.avg_loss = loss;
        } else {
            self.avg_gain += self.alpha * (gain - self.avg_gain);
            self.avg_loss += self.alpha * (loss - self.avg_loss);
        }
        self.observations += 1;
        self.prev_close = Some(close);
    }

    pub fn is_warm(&self) -> bool {
        self.observations >= self.period
    }

    /// Current RSI, falling back to 50 when undefined.
    pub fn value_or_neutral(&self) -> f64 {
        self.value().unwrap_or(NEUTRAL_RSI)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn update(&mut self, bar: &Bar) {
        self.push(bar.close);
    }

    fn value(&self) -> Option<f64> {
        if !self.is_warm() {
            return None;
        }
        compute_rsi(self.avg_gain, self.avg_loss)
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        None // no movement
    } else if avg_loss == 0.0 {
        Some(100.0)
    } else {
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn run(closes: &[f64], period: usize) -> Rsi {
        let mut rsi = Rsi::new(period);
        for bar in make_bars(closes) {
            rsi.update(&bar);
        }
        rsi
    }

    #[test]
    fn rsi_all_gains() {
        let rsi = run(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3);
        assert_approx(rsi.value().unwrap(), 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let rsi = run(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        assert_approx(rsi.value().unwrap(), 0.0, 1e-6);
    }

    #[test]
    fn rsi_known_value() {
        // period 2, alpha 0.5. Changes: 0, +2, -1
        // gain: 0 -> 1 -> 0.5 ; loss: 0 -> 0 -> 0.5 ; RSI = 50
        let rsi = run(&[10.0, 12.0, 11.0], 2);
        assert_approx(rsi.value().unwrap(), 50.0, 1e-9);

        // One more up move of 1: gain 0.75, loss 0.25 -> 100 - 100/4 = 75
        let rsi = run(&[10.0, 12.0, 11.0, 12.0], 2);
        assert_approx(rsi.value().unwrap(), 75.0, 1e-9);
    }

    #[test]
    fn rsi_flat_series_is_neutral() {
        let rsi = run(&[100.0; 20], 14);
        assert!(rsi.value().is_none());
        assert_eq!(rsi.value_or_neutral(), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_before_warmup_is_neutral() {
        let rsi = run(&[100.0, 110.0, 120.0], 14);
        assert!(!rsi.is_warm());
        assert_eq!(rsi.value_or_neutral(), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_bounds() {
        let mut rsi = Rsi::new(3);
        for (i, bar) in make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0])
            .iter()
            .enumerate()
        {
            rsi.update(bar);
            let v = rsi.value_or_neutral();
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
        }
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 13);
    }
}
