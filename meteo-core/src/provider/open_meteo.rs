use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{
    error::{MeteoError, Result},
    forecast::{DAILY_FIELDS, HOURLY_FIELDS, RawForecast, normalize},
    model::{Location, WeatherReport},
};

use super::WeatherProvider;

const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo geocoding and forecast APIs. No API key is required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_base: String,
    forecast_base: String,
    language: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(geocoding_base: &str, forecast_base: &str, language: &str) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            geocoding_base: geocoding_base.trim_end_matches('/').to_string(),
            forecast_base: forecast_base.trim_end_matches('/').to_string(),
            language: language.to_string(),
            http,
        })
    }

    async fn get(
        &self,
        operation: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Response> {
        tracing::debug!("{} request: {} {:?}", operation, url, query);

        let res = self.http.get(url).query(query).send().await?;
        let status = res.status();

        if !status.is_success() {
            tracing::debug!("{} request failed with status {}", operation, status);
            return Err(MeteoError::Status { operation, status });
        }

        Ok(res)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl GeoResponse {
    fn first(self) -> Option<GeoResult> {
        self.results.and_then(|r| r.into_iter().next())
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn geocode_by_name(&self, query: &str) -> Result<Option<Location>> {
        let url = format!("{}/search", self.geocoding_base);

        let res = self
            .get(
                "Geocoding",
                &url,
                &[
                    ("name", query.to_string()),
                    ("count", "1".to_string()),
                    ("language", self.language.clone()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        let parsed: GeoResponse = res.json().await?;

        Ok(parsed
            .first()
            .map(|r| Location::new(r.name, r.country, r.latitude, r.longitude)))
    }

    async fn geocode_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>> {
        let url = format!("{}/reverse", self.geocoding_base);

        let res = self
            .get(
                "Reverse geocoding",
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("count", "1".to_string()),
                    ("language", self.language.clone()),
                    ("format", "json".to_string()),
                ],
            )
            .await;

        // An unsuccessful reverse lookup just means "no name for this place".
        let res = match res {
            Err(MeteoError::Status { .. }) => return Ok(None),
            other => other?,
        };

        let parsed: GeoResponse = res.json().await?;

        Ok(parsed
            .first()
            .map(|r| Location::new(r.name, r.country, latitude, longitude)))
    }

    async fn fetch_report(&self, latitude: f64, longitude: f64) -> Result<WeatherReport> {
        let url = format!("{}/forecast", self.forecast_base);

        let res = self
            .get(
                "Forecast",
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("timezone", "auto".to_string()),
                    ("current_weather", "true".to_string()),
                    ("hourly", HOURLY_FIELDS.join(",")),
                    ("daily", DAILY_FIELDS.join(",")),
                ],
            )
            .await?;

        let raw: RawForecast = res.json().await?;
        let report = normalize(raw);

        tracing::debug!(
            "Forecast for ({}, {}): {} days",
            latitude,
            longitude,
            report.daily.len()
        );

        Ok(report)
    }
}
