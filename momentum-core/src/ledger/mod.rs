//! Position ledger: the durable record of confirmed open positions.
//!
//! The scan only reads it. Positions change exclusively through confirmed
//! orders ([`PositionLedger::apply`]), and every change is saved before it
//! becomes visible in memory.
//!
//! Precondition: one writer per invocation. Concurrent runs against the same
//! store are not detected.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use crate::domain::{round_to, Direction, Order, OrderAction, Position, Positions};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to persist positions to {path}: {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize positions: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("corrupt position file {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Storage behind the ledger.
pub trait PositionStore {
    /// Current positions. A missing or unreadable store reads as empty.
    fn load(&self) -> Positions;

    /// Replace the stored positions.
    fn save(&mut self, positions: &Positions) -> Result<(), LedgerError>;
}

/// Positions plus the store they are persisted to.
#[derive(Debug)]
pub struct PositionLedger<S: PositionStore> {
    store: S,
    positions: Positions,
}

impl<S: PositionStore> PositionLedger<S> {
    pub fn open(store: S) -> Self {
        let positions = store.load();
        Self { store, positions }
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a confirmed buy as an open long. An existing entry for the
    /// ticker is replaced.
    pub fn record_entry(&mut self, order: &Order, at: NaiveDateTime) -> Result<(), LedgerError> {
        let position = Position {
            entry_price: order.price,
            shares: order.shares,
            stop_loss: order.stop_loss,
            target: order.target,
            direction: Direction::Long,
            dollar_amount: order.dollar_amount,
            entry_date: at,
        };
        let mut next = self.positions.clone();
        next.insert(order.ticker.clone(), position);
        self.commit(next)?;
        info!(ticker = %order.ticker, shares = order.shares, price = order.price, "position opened");
        Ok(())
    }

    /// Remove a closed position. Returns it, or `None` if it was not open.
    pub fn record_exit(&mut self, ticker: &str) -> Result<Option<Position>, LedgerError> {
        let mut next = self.positions.clone();
        let Some(closed) = next.remove(ticker) else {
            return Ok(None);
        };
        self.commit(next)?;
        info!(ticker, "position closed");
        Ok(Some(closed))
    }

    /// Move the stored stop. Returns false if the ticker is not open.
    pub fn update_stop(&mut self, ticker: &str, stop_loss: f64) -> Result<bool, LedgerError> {
        let mut next = self.positions.clone();
        let Some(pos) = next.get_mut(ticker) else {
            return Ok(false);
        };
        pos.stop_loss = stop_loss;
        self.commit(next)?;
        info!(ticker, stop_loss, "stop updated");
        Ok(true)
    }

    /// Record a partial close: shrink the position and carry the trailed stop
    /// and runner target. Selling the whole size closes the position.
    pub fn record_partial_exit(
        &mut self,
        ticker: &str,
        shares_sold: f64,
        stop_loss: f64,
        target: f64,
    ) -> Result<bool, LedgerError> {
        let mut next = self.positions.clone();
        let Some(pos) = next.get_mut(ticker) else {
            return Ok(false);
        };
        let remaining = round_to(pos.shares - shares_sold, 4);
        if remaining <= 0.0 {
            next.remove(ticker);
        } else {
            pos.dollar_amount = round_to(pos.dollar_amount * remaining / pos.shares, 2);
            pos.shares = remaining;
            pos.stop_loss = stop_loss;
            pos.target = target;
        }
        self.commit(next)?;
        info!(ticker, shares_sold, remaining = remaining.max(0.0), "partial exit recorded");
        Ok(true)
    }

    /// Apply a confirmed order of any kind.
    pub fn apply(&mut self, order: &Order, at: NaiveDateTime) -> Result<(), LedgerError> {
        match order.action {
            OrderAction::Buy => self.record_entry(order, at),
            OrderAction::SellExit => self.record_exit(&order.ticker).map(|_| ()),
            OrderAction::TightenStop => self.update_stop(&order.ticker, order.stop_loss).map(|_| ()),
            OrderAction::TakeProfit => self
                .record_partial_exit(&order.ticker, order.shares, order.stop_loss, order.target)
                .map(|_| ()),
        }
    }

    fn commit(&mut self, next: Positions) -> Result<(), LedgerError> {
        self.store.save(&next)?;
        self.positions = next;
        Ok(())
    }
}
