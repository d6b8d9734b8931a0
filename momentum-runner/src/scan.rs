//! Scan orchestration: one sequential pass over the watchlist.
//!
//! For each instrument: fetch bars, pause for the provider's rate limit,
//! analyze. A ticker with no data or too little history is skipped with a
//! warning; the scan only fails when no instrument produced a signal.
//!
//! The position store is read, never written, during a scan.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use momentum_core::config::ScannerConfig;
use momentum_core::data::{BarProvider, FetchOutcome};
use momentum_core::domain::{Instrument, OrderBook, Positions, Regime, Signal, Watchlist};
use momentum_core::engine::{analyze_instrument, detect_regime, generate_orders};
use momentum_core::ledger::PositionStore;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no usable market data: none of the {attempted} watchlist instruments produced a signal")]
    NoUsableData { attempted: usize },
}

/// Why an instrument produced no signal this run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub ticker: String,
    pub reason: String,
}

/// Everything one scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Watchlist order, instruments without data omitted.
    pub signals: Vec<Signal>,
    pub benchmark: Option<Signal>,
    pub regime: Regime,
    pub orders: OrderBook,
    /// Positions as loaded at the start of the scan.
    pub positions: Positions,
    pub skipped: Vec<Skipped>,
}

pub struct Scanner<'a> {
    provider: &'a dyn BarProvider,
    config: &'a ScannerConfig,
    watchlist: &'a Watchlist,
}

impl<'a> Scanner<'a> {
    pub fn new(
        provider: &'a dyn BarProvider,
        config: &'a ScannerConfig,
        watchlist: &'a Watchlist,
    ) -> Self {
        Self {
            provider,
            config,
            watchlist,
        }
    }

    pub fn run(&self, store: &dyn PositionStore) -> Result<ScanOutcome, ScanError> {
        info!(
            provider = self.provider.name(),
            instruments = self.watchlist.instruments.len(),
            account = self.config.account_size,
            risk_per_trade = self.config.account_size as f64 * self.config.risk_pct,
            "scan started"
        );

        let mut signals = Vec::with_capacity(self.watchlist.instruments.len());
        let mut skipped = Vec::new();
        for instrument in &self.watchlist.instruments {
            info!(ticker = %instrument.ticker, "scanning");
            let outcome = self
                .provider
                .get_daily_bars(&instrument.ticker, self.config.lookback_days);
            self.provider.rate_limit_pause();

            match self.analyze(instrument, outcome) {
                Ok(signal) => signals.push(signal),
                Err(reason) => {
                    warn!(ticker = %instrument.ticker, %reason, "skipped");
                    skipped.push(Skipped {
                        ticker: instrument.ticker.clone(),
                        reason,
                    });
                }
            }
        }

        if signals.is_empty() {
            return Err(ScanError::NoUsableData {
                attempted: self.watchlist.instruments.len(),
            });
        }

        let bench = &self.watchlist.benchmark;
        let outcome = self
            .provider
            .get_daily_bars(&bench.ticker, self.config.lookback_days);
        let benchmark = match self.analyze(bench, outcome) {
            Ok(signal) => Some(signal),
            Err(reason) => {
                warn!(ticker = %bench.ticker, %reason, "benchmark unavailable, regime without it");
                None
            }
        };

        let regime = detect_regime(&signals, benchmark.as_ref());
        let positions = store.load();
        let orders = generate_orders(&signals, &regime, &positions, self.config);

        info!(
            regime = %regime.regime,
            buy = orders.buy_orders.len(),
            sell = orders.sell_orders.len(),
            manage = orders.manage_orders.len(),
            skipped = skipped.len(),
            "scan complete"
        );

        Ok(ScanOutcome {
            signals,
            benchmark,
            regime,
            orders,
            positions,
            skipped,
        })
    }

    fn analyze(&self, instrument: &Instrument, outcome: FetchOutcome) -> Result<Signal, String> {
        match outcome {
            FetchOutcome::Bars(bars) => {
                analyze_instrument(&bars, instrument, self.config).map_err(|e| e.to_string())
            }
            FetchOutcome::Unavailable(e) => Err(e.to_string()),
        }
    }
}
