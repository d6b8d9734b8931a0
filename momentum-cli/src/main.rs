//! Momentum CLI: the daily order book.
//!
//! One invocation is one scan: fetch the watchlist, print the order book,
//! optionally text it, always refresh `latest-scan.json`, and with `--record`
//! ask which orders were actually executed.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use momentum_core::config::ScannerConfig;
use momentum_core::data::{open_provider, DataSource, ProviderSettings};
use momentum_core::domain::Watchlist;
use momentum_core::ledger::{JsonFileStore, PositionLedger};
use momentum_runner::{
    confirm_orders, format_order_book, format_sms, ReportOptions, ScanSnapshot, Scanner,
    SmsSender, TwilioSender,
};

#[derive(Parser)]
#[command(
    name = "momentum",
    about = "Momentum scanner: daily order book for the top index holdings"
)]
struct Cli {
    /// Send the order summary by SMS.
    #[arg(long, default_value_t = false)]
    sms: bool,

    /// Weekly review mode (adds sector rotation).
    #[arg(long, default_value_t = false)]
    weekly: bool,

    /// Account size in dollars. Overrides the config file.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    account: Option<u64>,

    /// Also save a timestamped scan log under <output-dir>/scan_logs.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// No report on stdout; only warnings are logged.
    #[arg(long, default_value_t = false)]
    quiet: bool,

    /// Market data source: auto, polygon, yahoo or csv.
    #[arg(long, default_value = "auto")]
    data_source: DataSource,

    /// Directory of <TICKER>.csv files for --data-source csv.
    #[arg(long, default_value = "data/csv")]
    csv_dir: PathBuf,

    /// After the scan, interactively record which orders you executed.
    #[arg(long, default_value_t = false)]
    record: bool,

    /// Scanner config (TOML). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watchlist (TOML). Defaults to the top fifteen index holdings.
    #[arg(long)]
    watchlist: Option<PathBuf>,

    /// Position ledger file.
    #[arg(long, default_value = "positions.json")]
    positions: PathBuf,

    /// Where latest-scan.json and scan logs are written.
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    init_logging(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ScannerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScannerConfig::default(),
    };
    if let Some(account) = cli.account {
        config = config.with_account_size(account);
    }
    let watchlist = match &cli.watchlist {
        Some(path) => Watchlist::from_file(path)
            .with_context(|| format!("loading watchlist {}", path.display()))?,
        None => Watchlist::default_spy(),
    };

    let settings = ProviderSettings {
        polygon_api_key: std::env::var("POLYGON_API_KEY").ok(),
        csv_dir: cli.csv_dir.clone(),
    };
    let provider = open_provider(cli.data_source, &settings)
        .context("no usable data source (use --data-source yahoo or set POLYGON_API_KEY)")?;

    let store = JsonFileStore::new(&cli.positions);
    let outcome = Scanner::new(provider.as_ref(), &config, &watchlist).run(&store)?;
    let now = Local::now().naive_local();

    if !cli.quiet {
        let opts = ReportOptions {
            weekly: cli.weekly,
            account_size: config.account_size,
            generated_at: now,
        };
        println!("{}", format_order_book(&outcome, &opts));
    }

    if cli.sms {
        let body = format_sms(&outcome.orders, &outcome.regime, now.date());
        if !cli.quiet {
            println!("\n--- SMS PREVIEW ---\n{body}\n--- END SMS ---\n");
        }
        TwilioSender::from_env().send(&body);
    }

    let snapshot = ScanSnapshot::from_outcome(&outcome, now);
    if cli.json {
        let dir = cli.output_dir.join("scan_logs");
        snapshot
            .save_scan_log(&dir)
            .with_context(|| format!("saving scan log under {}", dir.display()))?;
    }
    let latest = snapshot
        .write_latest(&cli.output_dir)
        .context("writing latest scan snapshot")?;
    info!(path = %latest.display(), "dashboard data refreshed");

    if cli.record {
        let mut ledger = PositionLedger::open(store);
        let summary = confirm_orders(
            &outcome.orders,
            &mut ledger,
            &mut io::stdin().lock(),
            &mut io::stdout().lock(),
            Local::now().naive_local(),
        )?;
        info!(
            recorded = summary.recorded.len(),
            closed = summary.closed.len(),
            adjusted = summary.adjusted.len(),
            declined = summary.declined,
            "order confirmation finished"
        );
    }

    Ok(())
}
