//! Scan engine: turns per-instrument features into signals, a market regime,
//! and a prioritized order book.
//!
//! 1. Analyze: bars → features → classification, trade levels, conviction
//! 2. Regime: aggregate breadth across all signals
//! 3. Order book: reconcile open positions, then allocate new entries

pub mod analyze;
pub mod classifier;
pub mod conviction;
pub mod order_book;
pub mod regime;
pub mod sector;

pub use analyze::{analyze_instrument, build_signal};
pub use classifier::{classify, trade_levels, Classification, TradeLevels, TrendState};
pub use conviction::{conviction_score, MAX_CONVICTION};
pub use order_book::{available_capital, generate_orders, risk_reward_label, OrderBookGenerator};
pub use regime::detect_regime;
pub use sector::{sector_rotation, SectorStats, SectorTrend};
