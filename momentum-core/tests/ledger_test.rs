//! Position ledger persistence: confirmed orders survive a reload, the file
//! format stays plain JSON, and nothing is written by merely computing orders.

use chrono::NaiveDate;
use std::fs;
use momentum_core::config::ScannerConfig;
use momentum_core::domain::{Direction, OrderAction, Positions, Signal, SignalLabel};
use momentum_core::engine::{detect_regime, generate_orders};
use momentum_core::ledger::{JsonFileStore, PositionLedger, PositionStore};

fn signal(ticker: &str, price: f64, strength: i8, conviction: f64) -> Signal {
    let label = match strength {
        s if s >= 3 => SignalLabel::Buy,
        s if s <= -3 => SignalLabel::Sell,
        _ => SignalLabel::Neutral,
    };
    Signal {
        ticker: ticker.to_string(),
        name: ticker.to_string(),
        weight: 4.0,
        sector: "Tech".to_string(),
        current_price: price,
        ema8: price * 0.99,
        ema21: price * 0.97,
        ema50: price * 0.94,
        rsi: 55.0,
        vol_ratio: 1.0,
        change_1d: 0.0,
        change_5d: 1.0,
        change_20d: 3.0,
        bull_stacked: strength >= 3,
        bear_stacked: strength <= -3,
        ema_spread: 5.3,
        dist_to_8: 1.0,
        dist_to_21: 3.1,
        is_pullback_buy: false,
        is_pullback_sell: false,
        signal: label,
        signal_strength: label.strength(),
        action_note: "note".to_string(),
        stop_loss: price * 0.96,
        target_1: price * 1.1,
        target_2: price * 1.14,
        risk_per_share: price * 0.04,
        position_size: 1,
        support: price * 0.95,
        resistance: price * 1.03,
        conviction_score: conviction,
    }
}

fn confirmed_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(6, 35, 12)
        .unwrap()
}

#[test]
fn confirmed_buy_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    let config = ScannerConfig::default();

    let signals = vec![signal("NVDA", 120.0, 3, 60.0)];
    let regime = detect_regime(&signals, None);
    let mut ledger = PositionLedger::open(JsonFileStore::new(&path));
    let book = generate_orders(&signals, &regime, ledger.positions(), &config);

    // computing orders writes nothing
    assert!(!path.exists());

    let buy = &book.buy_orders[0];
    ledger.apply(buy, confirmed_at()).unwrap();

    let reloaded = JsonFileStore::new(&path).load();
    let pos = &reloaded["NVDA"];
    assert_eq!(pos.direction, Direction::Long);
    assert_eq!(pos.entry_price, 120.0);
    assert_eq!(pos.shares, buy.shares);
    assert_eq!(pos.stop_loss, buy.stop_loss);
    assert_eq!(pos.entry_date, confirmed_at());
}

#[test]
fn confirmed_exit_removes_position_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    let config = ScannerConfig::default();

    let mut ledger = PositionLedger::open(JsonFileStore::new(&path));
    let entry = generate_orders(
        &[signal("AMD", 150.0, 3, 50.0)],
        &detect_regime(&[], None),
        &Positions::new(),
        &config,
    );
    ledger.apply(&entry.buy_orders[0], confirmed_at()).unwrap();

    let reversal = vec![signal("AMD", 140.0, -3, 0.0)];
    let book = generate_orders(&reversal, &detect_regime(&reversal, None), ledger.positions(), &config);
    assert_eq!(book.sell_orders.len(), 1);
    assert_eq!(book.sell_orders[0].action, OrderAction::SellExit);

    ledger.apply(&book.sell_orders[0], confirmed_at()).unwrap();
    assert!(JsonFileStore::new(&path).load().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
}

#[test]
fn hand_edited_file_with_integers_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    fs::write(
        &path,
        r#"{
  "SPY": {
    "entry_price": 510,
    "shares": 1,
    "stop_loss": 495.5,
    "target": 550,
    "direction": "LONG",
    "dollar_amount": 510,
    "entry_date": "2024-05-20T06:31:00"
  }
}"#,
    )
    .unwrap();

    let ledger = PositionLedger::open(JsonFileStore::new(&path));
    assert_eq!(ledger.positions()["SPY"].target, 550.0);
}

#[test]
fn truncated_file_reads_as_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    fs::write(&path, r#"{"SPY": {"entry_price": 51"#).unwrap();

    let ledger = PositionLedger::open(JsonFileStore::new(&path));
    assert!(ledger.positions().is_empty());
}
