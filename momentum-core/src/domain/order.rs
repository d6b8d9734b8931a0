//! Orders emitted by the order book generator.
//!
//! Orders are ephemeral: they are proposals for a human to execute and confirm.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::signal::SignalLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL/EXIT")]
    SellExit,
    #[serde(rename = "TAKE PROFIT (sell 50%)")]
    TakeProfit,
    #[serde(rename = "TIGHTEN STOP")]
    TightenStop,
}

impl OrderAction {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderAction::Buy => "BUY",
            OrderAction::SellExit => "SELL/EXIT",
            OrderAction::TakeProfit => "TAKE PROFIT (sell 50%)",
            OrderAction::TightenStop => "TIGHTEN STOP",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub action: OrderAction,
    pub ticker: String,
    pub name: String,
    pub price: f64,
    /// May be fractional for new entries.
    pub shares: f64,
    pub dollar_amount: f64,
    pub portfolio_pct: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub risk_reward: String,
    pub reason: String,
    pub priority: u32,
    pub option_type: String,
    pub signal: SignalLabel,
    pub conviction: f64,
}

/// The three ordered order sequences produced by one run. Sells are executed first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub sell_orders: Vec<Order>,
    pub manage_orders: Vec<Order>,
    pub buy_orders: Vec<Order>,
}

impl OrderBook {
    pub fn is_empty(&self) -> bool {
        self.sell_orders.is_empty() && self.manage_orders.is_empty() && self.buy_orders.is_empty()
    }

    /// Total dollars allocated across new entries.
    pub fn buy_dollars(&self) -> f64 {
        self.buy_orders.iter().map(|o| o.dollar_amount).sum()
    }

    /// Total account percentage allocated across new entries.
    pub fn buy_pct(&self) -> f64 {
        self.buy_orders.iter().map(|o| o.portfolio_pct).sum()
    }
}
