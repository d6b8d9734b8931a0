//! Plain-text order book report printed after each scan.

use chrono::NaiveDateTime;
use std::fmt::Write;

use momentum_core::domain::{Order, Positions, Regime, Signal};
use momentum_core::engine::sector_rotation;

use crate::scan::ScanOutcome;

const WIDTH: usize = 72;
const SPLIT_BAR: usize = 40;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub weekly: bool,
    pub account_size: u64,
    pub generated_at: NaiveDateTime,
}

/// `1234.5` → `1,234.50`
pub fn money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Whole dollars with thousands separators.
pub fn whole_money(value: f64) -> String {
    let cents = money(value.round());
    cents.trim_end_matches(".00").to_string()
}

/// Share counts print without a trailing `.0`; fractional shares keep their digits.
pub fn qty(shares: f64) -> String {
    if shares.fract() == 0.0 {
        format!("{shares:.0}")
    } else {
        let s = format!("{shares:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Multipliers always show a decimal: `1.0x`, `0.25x`.
pub fn multiplier(m: f64) -> String {
    if m.fract() == 0.0 {
        format!("{m:.1}x")
    } else {
        format!("{m}x")
    }
}

fn rule(out: &mut String, ch: char) {
    out.push_str("  ");
    out.extend(std::iter::repeat(ch).take(WIDTH - 2));
    out.push('\n');
}

fn banner(out: &mut String) {
    out.extend(std::iter::repeat('█').take(WIDTH));
    out.push('\n');
}

fn section(out: &mut String, ch: char, title: &str) {
    out.push('\n');
    out.extend(std::iter::repeat(ch).take(WIDTH));
    let _ = writeln!(out, "\n  {title}");
    out.extend(std::iter::repeat(ch).take(WIDTH));
    out.push('\n');
}

pub fn format_order_book(outcome: &ScanOutcome, opts: &ReportOptions) -> String {
    let mut out = String::new();
    let mode = if opts.weekly { "WEEKLY REVIEW" } else { "DAILY ORDER BOOK" };

    out.push('\n');
    banner(&mut out);
    let _ = writeln!(out, "  ◈ MOMENTUM SCANNER: {mode}");
    let _ = writeln!(
        out,
        "  {}  |  Account: ${}",
        opts.generated_at.format("%Y-%m-%d %H:%M"),
        whole_money(opts.account_size as f64)
    );
    banner(&mut out);

    write_regime(&mut out, &outcome.regime);

    let book = &outcome.orders;
    if !book.sell_orders.is_empty() {
        section(&mut out, '═', "SELL / EXIT (do these first)");
        for o in &book.sell_orders {
            let _ = writeln!(out, "\n  ✕ {}  {} ({})", o.action, o.ticker, o.name);
            let _ = writeln!(
                out,
                "    Price: ${:.2}  |  Shares: {}  |  Value: ${}",
                o.price,
                qty(o.shares),
                money(o.dollar_amount)
            );
            let _ = writeln!(out, "    {}", o.reason);
        }
    }

    if !book.manage_orders.is_empty() {
        section(&mut out, '═', "MANAGE (adjust existing positions)");
        for o in &book.manage_orders {
            let _ = writeln!(out, "\n  ⚙ {}  {} ({})", o.action, o.ticker, o.name);
            let _ = writeln!(out, "    {}", o.reason);
            if o.stop_loss != 0.0 {
                let _ = writeln!(out, "    New Stop: ${:.2}  |  Target: ${:.2}", o.stop_loss, o.target);
            }
        }
    }

    if !book.buy_orders.is_empty() {
        write_buys(&mut out, &book.buy_orders, &outcome.regime);
    } else if book.sell_orders.is_empty() && book.manage_orders.is_empty() {
        section(&mut out, '═', "NO ORDERS TODAY");
        out.push_str("  No actionable setups. Most of the year's gains come from a few trades.\n");
        out.push_str("  Patience IS the strategy.\n");
    }

    if !outcome.positions.is_empty() {
        write_positions(&mut out, &outcome.positions, &outcome.signals);
    }

    write_watchlist(&mut out, &outcome.signals);

    if opts.weekly {
        section(&mut out, '─', "SECTOR ROTATION");
        for stats in sector_rotation(&outcome.signals) {
            let _ = writeln!(
                out,
                "  {:<12} {}/{} bull  |  5D: {:+.2}%  |  {}",
                stats.sector,
                stats.bull_count,
                stats.total,
                stats.mean_return(),
                stats.trend()
            );
        }
    }

    out.push('\n');
    banner(&mut out);
    out.push_str("  Not financial advice. Verify before executing.\n");
    banner(&mut out);
    out
}

fn write_regime(out: &mut String, regime: &Regime) {
    let _ = writeln!(
        out,
        "\n  REGIME: {}  (sizing: {})",
        regime.regime,
        multiplier(regime.regime_multiplier)
    );
    let _ = writeln!(out, "  {}", regime.description);
    let _ = writeln!(
        out,
        "  Bull: {} | Bear: {} | Neutral: {} | RSI: {:.1}",
        regime.bull_count, regime.bear_count, regime.neutral_count, regime.avg_rsi
    );
    let benchmark = match regime.spy_above_21ema {
        Some(true) => " | SPY ABOVE 21 EMA",
        Some(false) => " | SPY BELOW 21 EMA",
        None => "",
    };
    let _ = writeln!(out, "  → {}{benchmark}", regime.sizing_advice);
}

fn write_buys(out: &mut String, buys: &[Order], regime: &Regime) {
    section(out, '═', "BUY ORDERS (new positions)");

    let total_pct: f64 = buys.iter().map(|o| o.portfolio_pct).sum();
    let total_dollars: f64 = buys.iter().map(|o| o.dollar_amount).sum();
    let _ = writeln!(
        out,
        "\n  TOTAL ALLOCATION: {total_pct:.1}% of account  (${})",
        money(total_dollars)
    );
    let _ = writeln!(out, "  Regime sizing: {} applied", multiplier(regime.regime_multiplier));

    out.push_str("\n  PORTFOLIO SPLIT:\n");
    rule(out, '─');
    for o in buys {
        let filled = ((o.portfolio_pct / total_pct.max(0.1)) * SPLIT_BAR as f64) as usize;
        let filled = filled.min(SPLIT_BAR);
        let bar: String = "█".repeat(filled) + &"░".repeat(SPLIT_BAR - filled);
        let _ = writeln!(
            out,
            "  {:<7} {bar}  {:5.1}%  ${:>9}  score:{:.0}",
            o.ticker,
            o.portfolio_pct,
            money(o.dollar_amount),
            o.conviction
        );
    }
    rule(out, '─');

    for o in buys {
        let _ = writeln!(out, "\n  #{}  {}  {} ({})", o.priority, o.action, o.ticker, o.name);
        out.push_str("  ┌───────────────────────────────────────────────────────\n");
        let _ = writeln!(out, "  │ Signal:      {} (conviction: {:.0}/100)", o.signal, o.conviction);
        let _ = writeln!(out, "  │ Price:       ${:.2}", o.price);
        let _ = writeln!(out, "  │ Shares:      {}", qty(o.shares));
        let _ = writeln!(
            out,
            "  │ $ Amount:    ${}  ({:.1}% of account)",
            money(o.dollar_amount),
            o.portfolio_pct
        );
        let _ = writeln!(out, "  │ Order:       {}", o.option_type);
        let _ = writeln!(out, "  │ Stop Loss:   ${:.2}", o.stop_loss);
        let _ = writeln!(out, "  │ Target:      ${:.2}  (R:R = {})", o.target, o.risk_reward);
        let _ = writeln!(out, "  │ Why:         {}", o.reason);
        out.push_str("  └───────────────────────────────────────────────────────\n");
    }
}

fn write_positions(out: &mut String, positions: &Positions, signals: &[Signal]) {
    section(out, '─', "OPEN POSITIONS");
    let _ = writeln!(
        out,
        "  {:<8}{:>9}{:>9}{:>9}{:>9}{:>9}{:>7}",
        "TICKER", "ENTRY", "NOW", "P&L", "STOP", "TARGET", "DIR"
    );
    rule(out, '─');
    for (ticker, pos) in positions {
        let now = signals
            .iter()
            .find(|s| &s.ticker == ticker)
            .map_or(pos.entry_price, |s| s.current_price);
        let _ = writeln!(
            out,
            "  {ticker:<8}${:>7.2}  ${now:>7.2}  {:>+7.1}%  ${:>7.2}  ${:>7.2}  {:>6}",
            pos.entry_price,
            pos.pnl_pct(now),
            pos.stop_loss,
            pos.target,
            pos.direction.to_string(),
        );
    }
}

fn write_watchlist(out: &mut String, signals: &[Signal]) {
    section(out, '─', "FULL WATCHLIST (sorted by conviction)");
    let _ = writeln!(
        out,
        "  {:<7}{:>8}{:>7}{:>7}{:>5}{:>5}{:>6}{:>15}",
        "TICKER", "PRICE", "1D", "5D", "RSI", "VOL", "SCORE", "SIGNAL"
    );
    rule(out, '─');

    let mut sorted: Vec<&Signal> = signals.iter().collect();
    sorted.sort_by(|a, b| b.conviction_score.total_cmp(&a.conviction_score));
    for s in sorted {
        let _ = writeln!(
            out,
            "  {:<7}${:>7.2}{:>+6.1}%{:>+6.1}%{:>4.0}{:>4.1}x{:>5.0}{:>15}",
            s.ticker,
            s.current_price,
            s.change_1d,
            s.change_5d,
            s.rsi,
            s.vol_ratio,
            s.conviction_score,
            format!("  {}", s.signal)
        );
    }
}
