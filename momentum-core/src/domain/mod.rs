//! Domain types for the momentum scanner.

pub mod bar;
pub mod instrument;
pub mod order;
pub mod position;
pub mod regime;
pub mod signal;

pub use bar::Bar;
pub use instrument::{Instrument, Watchlist};
pub use order::{Order, OrderAction, OrderBook};
pub use position::{Direction, Position, Positions};
pub use regime::{Regime, RegimeLabel};
pub use signal::{Signal, SignalLabel};

/// Round to `places` decimal places, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
