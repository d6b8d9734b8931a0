//! Market-data providers: Yahoo, Polygon and offline CSV behind one trait.

pub mod circuit_breaker;
pub mod csv_file;
mod http;
pub mod polygon;
pub mod provider;
pub mod yahoo;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use csv_file::CsvProvider;
pub use polygon::PolygonProvider;
pub use provider::{normalize_bars, BarProvider, DataError, DataSource, FetchOutcome, RawBar};
pub use yahoo::YahooProvider;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// What a provider needs from the environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub polygon_api_key: Option<String>,
    pub csv_dir: PathBuf,
}

/// Build the provider for `source`.
///
/// `Auto` picks Polygon when a key is set and Yahoo otherwise. An explicit
/// `Polygon` without a key is an error.
pub fn open_provider(
    source: DataSource,
    settings: &ProviderSettings,
) -> Result<Box<dyn BarProvider>, DataError> {
    let key = settings
        .polygon_api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty());
    let breaker = Arc::new(CircuitBreaker::for_scan());

    let provider: Box<dyn BarProvider> = match (source, key) {
        (DataSource::Polygon, None) => {
            return Err(DataError::AuthenticationRequired(
                "data source polygon requires POLYGON_API_KEY".into(),
            ))
        }
        (DataSource::Polygon | DataSource::Auto, Some(key)) => {
            Box::new(PolygonProvider::new(key, breaker)?)
        }
        (DataSource::Yahoo | DataSource::Auto, _) => Box::new(YahooProvider::new(breaker)?),
        (DataSource::Csv, _) => Box::new(CsvProvider::new(settings.csv_dir.clone())),
    };
    info!(provider = provider.name(), "data source selected");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_polygon_needs_a_key() {
        let settings = ProviderSettings::default();
        assert!(matches!(
            open_provider(DataSource::Polygon, &settings),
            Err(DataError::AuthenticationRequired(_))
        ));
    }

    #[test]
    fn auto_prefers_polygon_when_keyed() {
        let settings = ProviderSettings {
            polygon_api_key: Some("pk_test".into()),
            ..Default::default()
        };
        assert_eq!(open_provider(DataSource::Auto, &settings).unwrap().name(), "polygon");

        let settings = ProviderSettings {
            polygon_api_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(open_provider(DataSource::Auto, &settings).unwrap().name(), "yahoo");
    }

    #[test]
    fn csv_reads_from_directory() {
        let settings = ProviderSettings {
            csv_dir: PathBuf::from("data"),
            ..Default::default()
        };
        assert_eq!(open_provider(DataSource::Csv, &settings).unwrap().name(), "csv");
    }
}
