//! End-to-end scanner scenarios.
//!
//! A. Flat prices: EMAs converge to price, RSI 50, NEUTRAL, low conviction.
//! B. Steady uptrend pulling back 1% under the 8 EMA on light volume: PULLBACK BUY.
//! C. Long position whose stop sits above the current price: one SELL/EXIT, STOP HIT.
//! D. Five candidates, three positions open, cap of five: two buys, best conviction first.

use chrono::NaiveDate;
use momentum_core::config::ScannerConfig;
use momentum_core::domain::{
    Bar, Direction, Instrument, OrderAction, Position, Positions, Signal, SignalLabel,
};
use momentum_core::engine::{analyze_instrument, detect_regime, generate_orders};
use momentum_core::indicators::FeatureEngine;

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn bars_from(closes: &[f64], volumes: &[u64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume,
            }
        })
        .collect()
}

fn instrument() -> Instrument {
    Instrument::new("AAPL", "Apple", 7.0, "Tech")
}

/// A bullish BUY signal at $100 with a healthy RSI.
fn buy_signal(ticker: &str, conviction: f64) -> Signal {
    Signal {
        ticker: ticker.to_string(),
        name: ticker.to_string(),
        weight: 2.0,
        sector: "Tech".to_string(),
        current_price: 100.0,
        ema8: 99.0,
        ema21: 97.0,
        ema50: 93.0,
        rsi: 58.0,
        vol_ratio: 1.1,
        change_1d: 0.4,
        change_5d: 2.0,
        change_20d: 6.0,
        bull_stacked: true,
        bear_stacked: false,
        ema_spread: 6.45,
        dist_to_8: 1.01,
        dist_to_21: 3.09,
        is_pullback_buy: false,
        is_pullback_sell: false,
        signal: SignalLabel::Buy,
        signal_strength: 3,
        action_note: "Trend up, EMAs stacked.".to_string(),
        stop_loss: 96.0,
        target_1: 110.0,
        target_2: 114.0,
        risk_per_share: 4.0,
        position_size: 5,
        support: 95.0,
        resistance: 102.0,
        conviction_score: conviction,
    }
}

fn long_position(entry: f64, stop: f64, target: f64) -> Position {
    Position {
        entry_price: entry,
        shares: 3.0,
        stop_loss: stop,
        target,
        direction: Direction::Long,
        dollar_amount: entry * 3.0,
        entry_date: NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap(),
    }
}

// ──────────────────────────────────────────────
// Scenarios
// ──────────────────────────────────────────────

#[test]
fn scenario_a_flat_prices_are_neutral() {
    let config = ScannerConfig::default();
    let bars = bars_from(&[50.0; 60], &[1000; 60]);
    let signal = analyze_instrument(&bars, &instrument(), &config).unwrap();

    assert_eq!(signal.ema8, 50.0);
    assert_eq!(signal.ema21, 50.0);
    assert_eq!(signal.ema50, 50.0);
    assert_eq!(signal.rsi, 50.0);
    assert_eq!(signal.signal, SignalLabel::Neutral);
    assert_eq!(signal.signal_strength, 0);
    assert!(signal.conviction_score <= 20.0, "conviction {}", signal.conviction_score);
}

#[test]
fn scenario_b_pullback_in_uptrend_is_pullback_buy() {
    let config = ScannerConfig::default();
    let mut closes: Vec<f64> = (0..59).map(|i| 100.0 + i as f64).collect();
    let mut volumes = vec![1000u64; 60];
    for v in &mut volumes[55..] {
        *v = 500;
    }

    // Pick the last close so it lands exactly 1% under the updated 8 EMA.
    let mut engine = FeatureEngine::new(&config);
    for bar in bars_from(&closes, &volumes[..59]) {
        engine.update(&bar);
    }
    let ema8 = engine.snapshot().unwrap().ema_fast;
    let alpha = 2.0 / 9.0;
    closes.push(0.99 * ema8 * (1.0 - alpha) / (1.0 - 0.99 * alpha));

    let bars = bars_from(&closes, &volumes);
    let signal = analyze_instrument(&bars, &instrument(), &config).unwrap();

    assert!(signal.bull_stacked);
    assert!(signal.is_pullback_buy);
    assert!((signal.dist_to_8 + 1.0).abs() < 0.011, "dist {}", signal.dist_to_8);
    assert!(signal.vol_ratio < 1.0);
    assert_eq!(signal.signal, SignalLabel::PullbackBuy);
    assert_eq!(signal.signal_strength, 5);
    assert!(signal.conviction_score >= 55.0, "conviction {}", signal.conviction_score);
    assert!(signal.stop_loss < signal.current_price);
    assert!(signal.target_1 > signal.current_price);
}

#[test]
fn scenario_c_stop_above_price_exits_once() {
    let config = ScannerConfig::default();
    let signals = vec![buy_signal("AAPL", 40.0)];
    let mut positions = Positions::new();
    positions.insert("AAPL".to_string(), long_position(104.0, 101.0, 115.0));

    let regime = detect_regime(&signals, None);
    let book = generate_orders(&signals, &regime, &positions, &config);

    assert_eq!(book.sell_orders.len(), 1);
    let exit = &book.sell_orders[0];
    assert_eq!(exit.action, OrderAction::SellExit);
    assert_eq!(exit.ticker, "AAPL");
    assert!(exit.reason.contains("STOP HIT"), "{}", exit.reason);
    assert!(exit.reason.contains("-3.8%"), "{}", exit.reason);
    assert!(book.manage_orders.is_empty());
    // the exiting ticker is not re-bought the same day
    assert!(book.buy_orders.iter().all(|o| o.ticker != "AAPL"));
}

#[test]
fn scenario_d_two_slots_go_to_highest_conviction() {
    let config = ScannerConfig::default();
    let signals = vec![
        buy_signal("AAA", 40.0),
        buy_signal("BBB", 85.0),
        buy_signal("CCC", 55.0),
        buy_signal("DDD", 70.0),
        buy_signal("EEE", 35.0),
        buy_signal("HLD1", 50.0),
        buy_signal("HLD2", 50.0),
        buy_signal("HLD3", 50.0),
    ];
    let mut positions = Positions::new();
    for ticker in ["HLD1", "HLD2", "HLD3"] {
        positions.insert(ticker.to_string(), long_position(99.0, 90.0, 130.0));
    }

    let regime = detect_regime(&signals, None);
    let book = generate_orders(&signals, &regime, &positions, &config);

    assert!(book.sell_orders.is_empty());
    let tickers: Vec<&str> = book.buy_orders.iter().map(|o| o.ticker.as_str()).collect();
    assert_eq!(tickers, ["BBB", "DDD"]);
    assert_eq!(book.buy_orders[0].priority, 1);
    assert_eq!(book.buy_orders[1].priority, 2);

    // all bullish → strong uptrend → 1.5x of a $1000 account
    let total: f64 = book.buy_orders.iter().map(|o| o.dollar_amount).sum();
    assert!(total <= 1500.0 + 0.01, "total {total}");
    assert!(book.buy_orders[0].dollar_amount > book.buy_orders[1].dollar_amount);
}
