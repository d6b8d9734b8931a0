//! Sector rotation: per-sector breadth and five-day momentum for the weekly review.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectorTrend {
    Leading,
    Lagging,
    Mixed,
}

impl fmt::Display for SectorTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorTrend::Leading => write!(f, "LEADING"),
            SectorTrend::Lagging => write!(f, "LAGGING"),
            SectorTrend::Mixed => write!(f, "MIXED"),
        }
    }
}

/// Accumulated breadth for one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorStats {
    pub sector: String,
    pub bull_count: usize,
    pub bear_count: usize,
    pub total: usize,
    /// Five-day returns of the sector's members, in percent.
    pub return_samples: Vec<f64>,
}

impl SectorStats {
    fn new(sector: &str) -> Self {
        Self {
            sector: sector.to_string(),
            bull_count: 0,
            bear_count: 0,
            total: 0,
            return_samples: Vec::new(),
        }
    }

    fn add(&mut self, signal: &Signal) {
        self.total += 1;
        self.return_samples.push(signal.change_5d);
        if signal.is_bullish() {
            self.bull_count += 1;
        } else if signal.is_bearish() {
            self.bear_count += 1;
        }
    }

    pub fn mean_return(&self) -> f64 {
        if self.return_samples.is_empty() {
            0.0
        } else {
            self.return_samples.iter().sum::<f64>() / self.return_samples.len() as f64
        }
    }

    pub fn trend(&self) -> SectorTrend {
        if self.bull_count > self.bear_count {
            SectorTrend::Leading
        } else if self.bear_count > self.bull_count {
            SectorTrend::Lagging
        } else {
            SectorTrend::Mixed
        }
    }
}

/// One pass over the signals, sectors in first-seen order, then sorted by mean
/// five-day return (strongest first, ties keep first-seen order).
pub fn sector_rotation(signals: &[Signal]) -> Vec<SectorStats> {
    let mut stats: Vec<SectorStats> = Vec::new();
    for signal in signals {
        let idx = match stats.iter().position(|s| s.sector == signal.sector) {
            Some(idx) => idx,
            None => {
                stats.push(SectorStats::new(&signal.sector));
                stats.len() - 1
            }
        };
        stats[idx].add(signal);
    }
    stats.sort_by(|a, b| b.mean_return().total_cmp(&a.mean_return()));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::signal;

    fn in_sector(ticker: &str, sector: &str, strength: i8, change_5d: f64) -> Signal {
        let mut s = signal(ticker, strength, 50.0);
        s.sector = sector.to_string();
        s.change_5d = change_5d;
        s
    }

    #[test]
    fn groups_and_ranks_by_mean_return() {
        let signals = vec![
            in_sector("A", "Tech", 4, 2.0),
            in_sector("B", "Energy", -3, -1.0),
            in_sector("C", "Tech", -2, 4.0),
            in_sector("D", "Health", 3, 5.0),
            in_sector("E", "Energy", 0, -3.0),
        ];
        let stats = sector_rotation(&signals);
        let order: Vec<&str> = stats.iter().map(|s| s.sector.as_str()).collect();
        assert_eq!(order, ["Health", "Tech", "Energy"]);

        let tech = &stats[1];
        assert_eq!(tech.total, 2);
        assert_eq!(tech.mean_return(), 3.0);
        assert_eq!(tech.trend(), SectorTrend::Mixed);
        assert_eq!(stats[0].trend(), SectorTrend::Leading);
        assert_eq!(stats[2].trend(), SectorTrend::Lagging);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let signals = vec![in_sector("A", "Retail", 0, 1.0), in_sector("B", "Banks", 0, 1.0)];
        let stats = sector_rotation(&signals);
        assert_eq!(stats[0].sector, "Retail");
        assert_eq!(stats[1].sector, "Banks");
    }
}
