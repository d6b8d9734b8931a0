use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Trade direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// A confirmed open position, as persisted in the position file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_price: f64,
    pub shares: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub direction: Direction,
    pub dollar_amount: f64,
    pub entry_date: NaiveDateTime,
}

impl Position {
    /// Unrealized P&L in percent, signed so that a gain is positive for either direction.
    pub fn pnl_pct(&self, current_price: f64) -> f64 {
        let raw = (current_price - self.entry_price) / self.entry_price * 100.0;
        match self.direction {
            Direction::Long => raw,
            Direction::Short => -raw,
        }
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.shares * current_price
    }
}

/// Open positions keyed by ticker. Ordered so that reconciliation is deterministic.
pub type Positions = BTreeMap<String, Position>;
