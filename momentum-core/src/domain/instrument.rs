//! Instrument metadata and the watchlist.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ConfigError;

/// Static description of a tradable instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub ticker: String,
    pub name: String,
    /// Weight in the benchmark index, in percent.
    pub weight: f64,
    pub sector: String,
}

impl Instrument {
    pub fn new(ticker: &str, name: &str, weight: f64, sector: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: name.to_string(),
            weight,
            sector: sector.to_string(),
        }
    }
}

/// The instruments scanned each run plus the benchmark used for regime context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    pub instruments: Vec<Instrument>,
    pub benchmark: Instrument,
}

impl Watchlist {
    /// Load a watchlist from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a watchlist from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let list: Self = toml::from_str(content)?;
        if list.instruments.is_empty() {
            return Err(ConfigError::Invalid("watchlist has no instruments".into()));
        }
        Ok(list)
    }

    /// Top fifteen S&P 500 holdings by index weight, benchmarked against SPY.
    pub fn default_spy() -> Self {
        let instruments = vec![
            Instrument::new("NVDA", "NVIDIA", 7.83, "Tech"),
            Instrument::new("AAPL", "Apple", 6.47, "Tech"),
            Instrument::new("MSFT", "Microsoft", 5.39, "Tech"),
            Instrument::new("AMZN", "Amazon", 3.93, "Consumer"),
            Instrument::new("GOOGL", "Alphabet", 3.32, "Tech"),
            Instrument::new("AVGO", "Broadcom", 2.64, "Tech"),
            Instrument::new("META", "Meta", 2.63, "Tech"),
            Instrument::new("TSLA", "Tesla", 2.04, "Consumer"),
            Instrument::new("BRK.B", "Berkshire", 1.49, "Finance"),
            Instrument::new("JPM", "JPMorgan", 1.35, "Finance"),
            Instrument::new("LLY", "Eli Lilly", 1.30, "Health"),
            Instrument::new("V", "Visa", 1.10, "Finance"),
            Instrument::new("UNH", "UnitedHealth", 1.05, "Health"),
            Instrument::new("COST", "Costco", 0.98, "Consumer"),
            Instrument::new("WMT", "Walmart", 0.92, "Consumer"),
        ];
        Self {
            instruments,
            benchmark: Instrument::new("SPY", "S&P 500", 100.0, "Index"),
        }
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.ticker.as_str()).collect()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::default_spy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_watchlist_has_fifteen_names() {
        let list = Watchlist::default_spy();
        assert_eq!(list.instruments.len(), 15);
        assert_eq!(list.benchmark.ticker, "SPY");
        assert_eq!(list.tickers()[0], "NVDA");
    }

    #[test]
    fn parses_toml_watchlist() {
        let toml = r#"
[benchmark]
ticker = "QQQ"
name = "Nasdaq 100"
weight = 100.0
sector = "Index"

[[instruments]]
ticker = "AAPL"
name = "Apple"
weight = 6.5
sector = "Tech"
"#;
        let list = Watchlist::from_toml(toml).unwrap();
        assert_eq!(list.benchmark.ticker, "QQQ");
        assert_eq!(list.instruments[0].name, "Apple");
    }

    #[test]
    fn empty_watchlist_is_rejected() {
        let toml = r#"
instruments = []
[benchmark]
ticker = "SPY"
name = "S&P 500"
weight = 100.0
sector = "Index"
"#;
        assert!(Watchlist::from_toml(toml).is_err());
    }
}
