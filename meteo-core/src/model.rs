use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named place with coordinates.
///
/// Serialized as `{name, country, latitude, longitude}`; this is the exact
/// shape stored in the recent-locations file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Name used when reverse geocoding yields nothing.
    pub const FALLBACK_NAME: &'static str = "Current Location";

    pub fn new(name: impl Into<String>, country: Option<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country,
            latitude,
            longitude,
        }
    }

    /// Synthetic location for bare coordinates.
    pub fn fallback(latitude: f64, longitude: f64) -> Self {
        Self::new(Self::FALLBACK_NAME, None, latitude, longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub wind_kmh: f64,
    pub humidity: u8,
    pub weather_code: i32,
}

/// One calendar day of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    /// ISO date (`YYYY-MM-DD`) as delivered by the upstream service.
    pub date: String,
    pub max_c: f64,
    pub min_c: f64,
    pub wind_kmh: f64,
    pub humidity: u8,
    pub weather_code: i32,
}

impl DayForecast {
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Current conditions plus up to five forecast days, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub daily: Vec<DayForecast>,
}

impl WeatherReport {
    pub fn today(&self) -> Option<&DayForecast> {
        self.daily.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_serializes_with_plain_keys() {
        let loc = Location::new("Paris", Some("France".into()), 48.85, 2.35);
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Paris",
                "country": "France",
                "latitude": 48.85,
                "longitude": 2.35,
            })
        );
    }

    #[test]
    fn location_without_country_key_deserializes() {
        let loc: Location =
            serde_json::from_str(r#"{"name":"Current Location","latitude":1.5,"longitude":-2.0}"#)
                .unwrap();
        assert_eq!(loc, Location::fallback(1.5, -2.0));
    }

    #[test]
    fn day_forecast_parses_date() {
        let day = DayForecast {
            date: "2024-01-01".into(),
            max_c: 10.0,
            min_c: 2.0,
            wind_kmh: 0.0,
            humidity: 70,
            weather_code: 61,
        };
        assert_eq!(day.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1));

        let bad = DayForecast { date: String::new(), ..day };
        assert_eq!(bad.date_naive(), None);
    }
}
