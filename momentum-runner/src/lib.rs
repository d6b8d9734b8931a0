//! Momentum Runner: everything around one scan.
//!
//! This crate builds on `momentum-core` to provide:
//! - Scan orchestration over a `BarProvider` with per-instrument isolation
//! - Scan snapshots (`latest-scan.json`) and timestamped scan logs
//! - The plain-text order book report
//! - SMS formatting and Twilio delivery
//! - Interactive confirmation of executed orders into the position ledger

pub mod confirm;
pub mod report;
pub mod scan;
pub mod sms;
pub mod snapshot;

pub use confirm::{confirm_orders, ConfirmError, ConfirmSummary};
pub use report::{format_order_book, ReportOptions};
pub use scan::{ScanError, ScanOutcome, Scanner, Skipped};
pub use sms::{format_sms, SmsSender, TwilioCredentials, TwilioSender};
pub use snapshot::{ScanSnapshot, SnapshotError, LATEST_FILE};
