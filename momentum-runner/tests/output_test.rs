//! Run outputs: snapshot files on disk and the text report layout.

use chrono::{NaiveDate, NaiveDateTime};
use std::fs;

use momentum_core::config::ScannerConfig;
use momentum_core::domain::{Direction, Position, Positions, Signal, SignalLabel};
use momentum_core::engine::{detect_regime, generate_orders};
use momentum_runner::{format_order_book, ReportOptions, ScanOutcome, ScanSnapshot, LATEST_FILE};

fn signal(ticker: &str, sector: &str, strength: i8, conviction: f64, change_5d: f64) -> Signal {
    let label = match strength {
        s if s >= 3 => SignalLabel::Buy,
        s if s <= -3 => SignalLabel::Sell,
        _ => SignalLabel::Neutral,
    };
    Signal {
        ticker: ticker.to_string(),
        name: format!("{ticker} Corp"),
        weight: 4.0,
        sector: sector.to_string(),
        current_price: 100.0,
        ema8: 99.0,
        ema21: 97.0,
        ema50: 94.0,
        rsi: 55.0,
        vol_ratio: 1.1,
        change_1d: 0.4,
        change_5d,
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
        stop_loss: 96.0,
        target_1: 110.0,
        target_2: 114.0,
        risk_per_share: 4.0,
        position_size: 5,
        support: 95.0,
        resistance: 103.0,
        conviction_score: conviction,
    }
}

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(6, 35, 12)
        .unwrap()
}

fn outcome(signals: Vec<Signal>, positions: Positions) -> ScanOutcome {
    let config = ScannerConfig::default().with_account_size(10_000);
    let regime = detect_regime(&signals, None);
    let orders = generate_orders(&signals, &regime, &positions, &config);
    ScanOutcome {
        signals,
        benchmark: None,
        regime,
        orders,
        positions,
        skipped: Vec::new(),
    }
}

fn daily() -> ReportOptions {
    ReportOptions {
        weekly: false,
        account_size: 10_000,
        generated_at: at(),
    }
}

#[test]
fn latest_snapshot_is_replaced_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let run = outcome(vec![signal("NVDA", "Tech", 3, 60.0, 2.0)], Positions::new());

    let snapshot = ScanSnapshot::from_outcome(&run, at());
    let path = snapshot.write_latest(dir.path()).unwrap();
    assert_eq!(path, dir.path().join(LATEST_FILE));

    // a second run overwrites, leaving no temp file behind
    snapshot.write_latest(dir.path()).unwrap();
    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![LATEST_FILE.to_string()]);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["timestamp"], "2024-06-03T06:35:12");
    assert_eq!(json["regime"]["regime"], "STRONG UPTREND");
    assert_eq!(json["buy_orders"][0]["ticker"], "NVDA");
    assert_eq!(json["buy_orders"][0]["action"], "BUY");
    assert!(json["sell_orders"].as_array().unwrap().is_empty());

    let back: ScanSnapshot = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn snapshot_rounds_portfolio_share_to_one_decimal() {
    let mut run = outcome(vec![signal("NVDA", "Tech", 3, 60.0, 2.0)], Positions::new());
    run.orders.buy_orders[0].portfolio_pct = 100.0 / 3.0;

    let snapshot = ScanSnapshot::from_outcome(&run, at());
    assert_eq!(snapshot.buy_orders[0].portfolio_pct, 33.3);
    assert_eq!(run.orders.buy_orders[0].portfolio_pct, 100.0 / 3.0);

    let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(json["buy_orders"][0]["portfolio_pct"], 33.3);
}

#[test]
fn scan_log_is_named_by_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("scan_logs");
    let run = outcome(vec![signal("NVDA", "Tech", 0, 20.0, 0.0)], Positions::new());

    let path = ScanSnapshot::from_outcome(&run, at())
        .save_scan_log(&logs)
        .unwrap();

    assert_eq!(path, logs.join("scan_20240603_063512.json"));
    assert!(path.exists());
}

#[test]
fn quiet_book_reports_no_orders() {
    let run = outcome(vec![signal("KO", "Staples", 0, 10.0, -0.5)], Positions::new());
    let report = format_order_book(&run, &daily());

    assert!(report.contains("DAILY ORDER BOOK"));
    assert!(report.contains("2024-06-03 06:35  |  Account: $10,000"));
    assert!(report.contains("NO ORDERS TODAY"));
    assert!(report.contains("Patience IS the strategy."));
    assert!(report.contains("FULL WATCHLIST"));
    assert!(!report.contains("OPEN POSITIONS"));
    assert!(!report.contains("SECTOR ROTATION"));
    assert!(report.contains("Not financial advice."));
}

#[test]
fn buy_block_and_watchlist_order() {
    let run = outcome(
        vec![
            signal("AAA", "Tech", 3, 40.0, 1.0),
            signal("BBB", "Tech", 3, 70.0, 2.0),
        ],
        Positions::new(),
    );
    let report = format_order_book(&run, &daily());

    assert!(report.contains("BUY ORDERS"));
    assert!(report.contains("TOTAL ALLOCATION"));
    assert!(report.contains("#1  BUY  BBB (BBB Corp)"));
    assert!(report.contains("#2  BUY  AAA (AAA Corp)"));
    assert!(!report.contains("NO ORDERS TODAY"));

    // watchlist is sorted by conviction, strongest first
    let watch = report.split("FULL WATCHLIST").nth(1).unwrap();
    let bbb = watch.find("BBB").unwrap();
    let aaa = watch.find("AAA").unwrap();
    assert!(bbb < aaa);
}

#[test]
fn open_positions_show_signed_pnl() {
    let mut positions = Positions::new();
    positions.insert(
        "TSLA".to_string(),
        Position {
            entry_price: 110.0,
            shares: 2.0,
            stop_loss: 90.0,
            target: 130.0,
            direction: Direction::Short,
            dollar_amount: 220.0,
            entry_date: at(),
        },
    );
    let run = outcome(vec![signal("TSLA", "Auto", 0, 20.0, 0.0)], positions);
    let report = format_order_book(&run, &daily());

    let table = report.split("OPEN POSITIONS").nth(1).unwrap();
    let row = table.lines().find(|l| l.trim_start().starts_with("TSLA")).unwrap();
    // short from 110 to 100 is a gain
    assert!(row.contains("+9.1%"));
    assert!(row.contains("SHORT"));
}

#[test]
fn weekly_review_adds_sector_rotation() {
    let run = outcome(
        vec![
            signal("AAA", "Tech", 3, 40.0, 3.0),
            signal("BBB", "Energy", -3, 0.0, -2.0),
        ],
        Positions::new(),
    );
    let report = format_order_book(
        &run,
        &ReportOptions {
            weekly: true,
            ..daily()
        },
    );

    assert!(report.contains("WEEKLY REVIEW"));
    let rotation = report.split("SECTOR ROTATION").nth(1).unwrap();
    let tech = rotation.find("Tech").unwrap();
    let energy = rotation.find("Energy").unwrap();
    assert!(tech < energy);
    assert!(rotation.contains("1/1 bull  |  5D: +3.00%  |  LEADING"));
    assert!(rotation.contains("0/1 bull  |  5D: -2.00%  |  LAGGING"));
}
