//! Order book generator: reconciles open positions against today's signals.
//!
//! One pass per run:
//! 1. Reconcile every open position that has a current signal: exit it, take
//!    partial profit, tighten its stop, or leave it alone.
//! 2. Pick new entries among bullish signals (strength >= 3) not already held,
//!    best conviction first, up to the free position slots.
//! 3. Split the regime-scaled capital across the picks in proportion to
//!    conviction.
//!
//! The generator is a pure function of (signals, regime, positions, config).
//! It only reads the ledger; nothing changes until a human confirms an order.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::ScannerConfig;
use crate::domain::{
    round_to, Direction, Order, OrderAction, OrderBook, Position, Positions, Regime, Signal,
};

/// Minimum bullish strength for a new entry.
const ENTRY_STRENGTH: i8 = 3;

/// Strength, against the position, at which a reversal forces an exit.
const REVERSAL_STRENGTH: i8 = 3;

pub struct OrderBookGenerator<'a> {
    config: &'a ScannerConfig,
}

impl<'a> OrderBookGenerator<'a> {
    pub fn new(config: &'a ScannerConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, signals: &[Signal], regime: &Regime, positions: &Positions) -> OrderBook {
        let mut book = OrderBook::default();

        // ── 1. Existing positions ──
        for (ticker, pos) in positions {
            let Some(sig) = signals.iter().find(|s| &s.ticker == ticker) else {
                continue;
            };
            let pnl_pct = pos.pnl_pct(sig.current_price);

            if let Some(reason) = self.exit_reason(pos, sig, pnl_pct) {
                book.sell_orders.push(exit_order(ticker, pos, sig, reason));
                continue;
            }
            if let Some(order) = self.manage_order(ticker, pos, sig, pnl_pct) {
                book.manage_orders.push(order);
            }
        }

        // ── 2. New entries ──
        let exiting: BTreeSet<&str> = book.sell_orders.iter().map(|o| o.ticker.as_str()).collect();
        let mut candidates: Vec<&Signal> = signals
            .iter()
            .filter(|s| {
                s.signal_strength >= ENTRY_STRENGTH
                    && !positions.contains_key(&s.ticker)
                    && !exiting.contains(s.ticker.as_str())
            })
            .collect();
        candidates.sort_by(|a, b| b.conviction_score.total_cmp(&a.conviction_score));

        let keeping = positions.len().saturating_sub(book.sell_orders.len());
        let open_slots = self.config.max_positions.saturating_sub(keeping);
        candidates.truncate(open_slots);

        // ── 3. Allocation ──
        book.buy_orders = self.allocate(&candidates, regime);
        debug!(
            sells = book.sell_orders.len(),
            manage = book.manage_orders.len(),
            buys = book.buy_orders.len(),
            open_slots,
            "order book generated"
        );
        book
    }

    /// Evaluate all four exit triggers in order. A later trigger overwrites the
    /// reason set by an earlier one, so the last match is reported.
    fn exit_reason(&self, pos: &Position, sig: &Signal, pnl_pct: f64) -> Option<String> {
        let price = sig.current_price;
        let mut reason = None;

        match pos.direction {
            Direction::Long if price <= pos.stop_loss => {
                reason = Some(format!(
                    "STOP HIT: ${price:.2} ≤ ${:.2}. P&L: {pnl_pct:+.1}%",
                    pos.stop_loss
                ));
            }
            Direction::Short if price >= pos.stop_loss => {
                reason = Some(format!(
                    "STOP HIT: ${price:.2} ≥ ${:.2}. P&L: {pnl_pct:+.1}%",
                    pos.stop_loss
                ));
            }
            _ => {}
        }

        match pos.direction {
            Direction::Long if sig.bear_stacked => {
                reason = Some(format!("EMAs FLIPPED BEARISH. Exit all. P&L: {pnl_pct:+.1}%"));
            }
            Direction::Short if sig.bull_stacked => {
                reason = Some(format!("EMAs FLIPPED BULLISH. Exit all. P&L: {pnl_pct:+.1}%"));
            }
            _ => {}
        }

        let reversed = match pos.direction {
            Direction::Long => sig.signal_strength <= -REVERSAL_STRENGTH,
            Direction::Short => sig.signal_strength >= REVERSAL_STRENGTH,
        };
        if reversed {
            reason = Some(format!(
                "SIGNAL → {}. Trend reversed. P&L: {pnl_pct:+.1}%",
                sig.signal
            ));
        }

        match pos.direction {
            Direction::Long if sig.rsi > self.config.rsi_exhaustion_high => {
                reason = Some(format!(
                    "RSI {:.1} OVERBOUGHT exhaustion. Take profits. P&L: {pnl_pct:+.1}%",
                    sig.rsi
                ));
            }
            Direction::Short if sig.rsi < self.config.rsi_exhaustion_low => {
                reason = Some(format!(
                    "RSI {:.1} OVERSOLD exhaustion. Take profits. P&L: {pnl_pct:+.1}%",
                    sig.rsi
                ));
            }
            _ => {}
        }

        reason
    }

    /// Take half off at the target, or trail a winning long's stop to the fast EMA.
    fn manage_order(&self, ticker: &str, pos: &Position, sig: &Signal, pnl_pct: f64) -> Option<Order> {
        let price = sig.current_price;
        let target_hit = match pos.direction {
            Direction::Long => price >= pos.target,
            Direction::Short => price <= pos.target,
        };

        if target_hit {
            let half = (pos.shares / 2.0).floor().max(1.0).min(pos.shares);
            return Some(Order {
                action: OrderAction::TakeProfit,
                ticker: ticker.to_string(),
                name: sig.name.clone(),
                price,
                shares: half,
                dollar_amount: round_to(half * price, 2),
                portfolio_pct: 0.0,
                stop_loss: round_to(sig.ema21, 2),
                target: sig.target_2,
                risk_reward: "Runner".to_string(),
                reason: format!(
                    "Hit {}R target! Sell half. Trail stop → 21 EMA ${:.2}. P&L: {pnl_pct:+.1}%",
                    self.config.target_1_r, sig.ema21
                ),
                priority: 2,
                option_type: "Partial close".to_string(),
                signal: sig.signal,
                conviction: 0.0,
            });
        }

        if pnl_pct > self.config.tighten_stop_gain_pct
            && pos.direction == Direction::Long
            && sig.ema8 > pos.stop_loss
        {
            return Some(Order {
                action: OrderAction::TightenStop,
                ticker: ticker.to_string(),
                name: sig.name.clone(),
                price,
                shares: pos.shares,
                dollar_amount: round_to(pos.shares * price, 2),
                portfolio_pct: 0.0,
                stop_loss: round_to(sig.ema8, 2),
                target: pos.target,
                risk_reward: "N/A".to_string(),
                reason: format!(
                    "Up {pnl_pct:+.1}%. Move stop → 8 EMA ${:.2} to lock gains.",
                    sig.ema8
                ),
                priority: 3,
                option_type: "Adjust stop".to_string(),
                signal: sig.signal,
                conviction: 0.0,
            });
        }

        None
    }

    fn allocate(&self, picks: &[&Signal], regime: &Regime) -> Vec<Order> {
        if picks.is_empty() {
            return Vec::new();
        }

        let account = self.config.account_size as f64;
        let available = available_capital(self.config, regime);
        let total_conviction = match picks.iter().map(|s| s.conviction_score).sum::<f64>() {
            t if t > 0.0 => t,
            _ => 1.0,
        };

        let mut orders = Vec::with_capacity(picks.len());
        for (idx, sig) in picks.iter().enumerate() {
            let dollar_alloc = available * (sig.conviction_score / total_conviction);
            let shares = if sig.current_price > 0.0 {
                floor_to_cents(dollar_alloc / sig.current_price)
            } else {
                0.0
            };
            let dollar_amount = round_to(shares * sig.current_price, 2);
            if dollar_amount < self.config.min_order_dollars {
                debug!(ticker = %sig.ticker, dollar_alloc, "allocation below minimum order, skipped");
                continue;
            }

            orders.push(Order {
                action: OrderAction::Buy,
                ticker: sig.ticker.clone(),
                name: sig.name.clone(),
                price: sig.current_price,
                shares,
                dollar_amount,
                portfolio_pct: dollar_amount / account * 100.0,
                stop_loss: sig.stop_loss,
                target: sig.target_1,
                risk_reward: risk_reward_label(sig),
                reason: sig.action_note.clone(),
                priority: idx as u32 + 1,
                option_type: "Shares (market or limit order)".to_string(),
                signal: sig.signal,
                conviction: sig.conviction_score,
            });
        }
        orders
    }
}

/// Capital available for new entries: the regime-scaled account, capped so the
/// summed per-trade risk stays within the portfolio risk budget.
pub fn available_capital(config: &ScannerConfig, regime: &Regime) -> f64 {
    let account = config.account_size as f64;
    (account * regime.regime_multiplier).min(account * config.max_portfolio_risk / config.risk_pct)
}

/// Reward to first target over per-share risk, e.g. `2.5:1`.
pub fn risk_reward_label(sig: &Signal) -> String {
    if sig.risk_per_share > 0.0 {
        let reward = (sig.target_1 - sig.current_price).abs();
        format!("{:.1}:1", reward / sig.risk_per_share)
    } else {
        "N/A".to_string()
    }
}

/// Convenience wrapper around [`OrderBookGenerator`].
pub fn generate_orders(
    signals: &[Signal],
    regime: &Regime,
    positions: &Positions,
    config: &ScannerConfig,
) -> OrderBook {
    OrderBookGenerator::new(config).generate(signals, regime, positions)
}

fn exit_order(ticker: &str, pos: &Position, sig: &Signal, reason: String) -> Order {
    Order {
        action: OrderAction::SellExit,
        ticker: ticker.to_string(),
        name: sig.name.clone(),
        price: sig.current_price,
        shares: pos.shares,
        dollar_amount: round_to(pos.shares * sig.current_price, 2),
        portfolio_pct: 0.0,
        stop_loss: 0.0,
        target: 0.0,
        risk_reward: "N/A".to_string(),
        reason,
        priority: 1,
        option_type: "Close position".to_string(),
        signal: sig.signal,
        conviction: 0.0,
    }
}

/// Round a fractional share count down to hundredths so an order never spends
/// more than its allocation.
fn floor_to_cents(shares: f64) -> f64 {
    ((shares * 100.0) + 1e-9).floor() / 100.0
}
