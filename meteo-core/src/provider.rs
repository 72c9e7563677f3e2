use crate::{Config, Location, WeatherReport, error::Result, provider::open_meteo::OpenMeteoProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Location resolver and weather aggregator backed by an external service.
///
/// "Nothing found" is `Ok(None)`; errors are reserved for transport failures.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Best match for a place name. `query` must already be trimmed and non-empty.
    async fn geocode_by_name(&self, query: &str) -> Result<Option<Location>>;

    /// Place name for coordinates. The returned location keeps the given coordinates.
    async fn geocode_by_coordinates(&self, latitude: f64, longitude: f64)
    -> Result<Option<Location>>;

    async fn fetch_report(&self, latitude: f64, longitude: f64) -> Result<WeatherReport>;
}

/// Construct the provider described by the configuration.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::new(
        config.geocoding_base(),
        config.forecast_base(),
        &config.language,
    )?;

    Ok(Box::new(provider))
}
