//! Raw Open-Meteo forecast payload and its normalization into a [`WeatherReport`].
//!
//! Every field of the payload is optional. Absent values (missing keys,
//! missing arrays, `null` elements, short arrays) read as zero.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use crate::model::{CurrentWeather, DayForecast, WeatherReport};

/// Number of forecast days kept in a report.
pub const FORECAST_DAYS: usize = 5;

pub const HOURLY_FIELDS: &[&str] = &[
    "temperature_2m",
    "relativehumidity_2m",
    "windspeed_10m",
    "weathercode",
];

pub const DAILY_FIELDS: &[&str] = &[
    "temperature_2m_max",
    "temperature_2m_min",
    "weathercode",
    "windspeed_10m_max",
    "precipitation_sum",
];

#[derive(Debug, Default, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub current_weather: Option<RawCurrent>,
    #[serde(default)]
    pub hourly: Option<RawHourly>,
    #[serde(default)]
    pub daily: Option<RawDaily>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCurrent {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub weathercode: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHourly {
    #[serde(default, deserialize_with = "nullable_series")]
    pub time: Vec<Option<String>>,
    #[serde(default, deserialize_with = "nullable_series")]
    pub relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "nullable_series")]
    pub windspeed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDaily {
    #[serde(default, deserialize_with = "nullable_series")]
    pub time: Vec<Option<String>>,
    #[serde(default, deserialize_with = "nullable_series")]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "nullable_series")]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "nullable_series")]
    pub weathercode: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "nullable_series")]
    pub windspeed_10m_max: Vec<Option<f64>>,
}

/// A series sent as `null` reads the same as a missing one.
fn nullable_series<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn at(series: &[Option<f64>], idx: usize) -> Option<f64> {
    series.get(idx).copied().flatten()
}

fn to_humidity(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn to_code(value: f64) -> i32 {
    value.round() as i32
}

/// Calendar-date prefix of an hourly timestamp (`2024-01-01T13:00` -> `2024-01-01`).
fn date_prefix(time: &str) -> &str {
    time.get(..10).unwrap_or(time)
}

pub fn normalize(raw: RawForecast) -> WeatherReport {
    let current = raw.current_weather.unwrap_or_default();
    let hourly = raw.hourly.unwrap_or_default();
    let daily = raw.daily.unwrap_or_default();

    WeatherReport {
        current: current_snapshot(&current, &hourly),
        daily: daily_forecast(&daily, &hourly),
    }
}

/// Humidity and wind come from the hourly sample whose timestamp equals the
/// current-conditions timestamp. Without a match humidity is 0 while wind
/// keeps the value reported with the current conditions.
fn current_snapshot(current: &RawCurrent, hourly: &RawHourly) -> CurrentWeather {
    let reported_wind = current.windspeed.unwrap_or(0.0);

    let idx = current.time.as_deref().and_then(|now| {
        hourly
            .time
            .iter()
            .position(|t| t.as_deref() == Some(now))
    });

    let (humidity_now, wind_now) = match idx {
        Some(idx) => (
            at(&hourly.relativehumidity_2m, idx).unwrap_or(0.0),
            at(&hourly.windspeed_10m, idx).unwrap_or(reported_wind),
        ),
        None => (0.0, reported_wind),
    };

    CurrentWeather {
        temperature_c: current.temperature.unwrap_or(0.0),
        wind_kmh: wind_now,
        humidity: to_humidity(humidity_now),
        weather_code: to_code(current.weathercode.unwrap_or(0.0)),
    }
}

fn daily_forecast(daily: &RawDaily, hourly: &RawHourly) -> Vec<DayForecast> {
    let by_day = humidity_by_day(hourly);

    daily
        .time
        .iter()
        .take(FORECAST_DAYS)
        .enumerate()
        .map(|(i, date)| {
            let date = date.clone().unwrap_or_default();
            let humidity = by_day
                .get(date.as_str())
                .map(|&(sum, count)| to_humidity(sum / f64::from(count.max(1))))
                .unwrap_or(0);

            DayForecast {
                max_c: at(&daily.temperature_2m_max, i).unwrap_or(0.0),
                min_c: at(&daily.temperature_2m_min, i).unwrap_or(0.0),
                wind_kmh: at(&daily.windspeed_10m_max, i).unwrap_or(0.0),
                humidity,
                weather_code: to_code(at(&daily.weathercode, i).unwrap_or(0.0)),
                date,
            }
        })
        .collect()
}

/// Sum and sample count of hourly humidity per calendar date.
fn humidity_by_day(hourly: &RawHourly) -> HashMap<&str, (f64, u32)> {
    let mut by_day: HashMap<&str, (f64, u32)> = HashMap::new();

    for (i, time) in hourly.time.iter().enumerate() {
        let Some(time) = time.as_deref().filter(|t| !t.is_empty()) else {
            continue;
        };
        let entry = by_day.entry(date_prefix(time)).or_default();
        entry.0 += at(&hourly.relativehumidity_2m, i).unwrap_or(0.0);
        entry.1 += 1;
    }

    by_day
}
