//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Location resolution and weather aggregation over Open-Meteo
//! - The persisted recent-locations cache
//! - The session that ties them together behind a presentation boundary
//!
//! It is used by `meteo-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod present;
pub mod provider;
pub mod recent;
pub mod session;
pub mod units;

pub use config::Config;
pub use error::MeteoError;
pub use model::{CurrentWeather, DayForecast, Location, WeatherReport};
pub use present::{Notice, Presenter, Severity, WeatherView};
pub use provider::{WeatherProvider, open_meteo::OpenMeteoProvider, provider_from_config};
pub use recent::{RecentList, RecentStore};
pub use session::{ActionStatus, Session, SessionSettings};
pub use units::{Summary, TemperatureUnit, celsius_to_fahrenheit, classify_code, is_rainy};
