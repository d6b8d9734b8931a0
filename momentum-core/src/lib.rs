//! Momentum Core: the scanner's engine.
//!
//! - Domain types (bars, instruments, signals, regime, orders, positions)
//! - Streaming indicators folded into a per-instrument feature vector
//! - Nine-state trend classifier, trade levels and conviction scoring
//! - Regime detection and sector rotation
//! - Order book generation against the open positions
//! - Position ledger behind a load/save store
//! - Market-data providers behind the `BarProvider` trait

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod ledger;
pub mod persist;

pub use config::{ConfigError, ScannerConfig};
