//! Scan snapshot: the JSON record of one run.
//!
//! `latest-scan.json` is rewritten after every scan for the dashboard;
//! `scan_YYYYMMDD_HHMMSS.json` files accumulate as a history when asked for.
//! Both are written atomically.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use momentum_core::domain::{round_to, Order, Regime, Signal};
use momentum_core::persist::write_atomic;

use crate::scan::ScanOutcome;

pub const LATEST_FILE: &str = "latest-scan.json";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize scan snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub timestamp: NaiveDateTime,
    pub regime: Regime,
    pub signals: Vec<Signal>,
    pub buy_orders: Vec<Order>,
    pub sell_orders: Vec<Order>,
    pub manage_orders: Vec<Order>,
}

impl ScanSnapshot {
    pub fn from_outcome(outcome: &ScanOutcome, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            regime: outcome.regime.clone(),
            signals: outcome.signals.clone(),
            buy_orders: rounded(&outcome.orders.buy_orders),
            sell_orders: rounded(&outcome.orders.sell_orders),
            manage_orders: rounded(&outcome.orders.manage_orders),
        }
    }

    /// `scan_YYYYMMDD_HHMMSS.json`
    pub fn log_file_name(&self) -> String {
        format!("scan_{}.json", self.timestamp.format("%Y%m%d_%H%M%S"))
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace `<dir>/latest-scan.json`.
    pub fn write_latest(&self, dir: &Path) -> Result<PathBuf, SnapshotError> {
        self.write_to(dir.join(LATEST_FILE))
    }

    /// Add a timestamped scan log under `dir`.
    pub fn save_scan_log(&self, dir: &Path) -> Result<PathBuf, SnapshotError> {
        self.write_to(dir.join(self.log_file_name()))
    }

    fn write_to(&self, path: PathBuf) -> Result<PathBuf, SnapshotError> {
        let json = self.to_json()?;
        write_atomic(&path, json.as_bytes()).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "scan snapshot written");
        Ok(path)
    }
}

/// Snapshot copies carry `portfolio_pct` to one decimal; the book keeps full precision.
fn rounded(orders: &[Order]) -> Vec<Order> {
    orders
        .iter()
        .map(|o| Order {
            portfolio_pct: round_to(o.portfolio_pct, 1),
            ..o.clone()
        })
        .collect()
}
