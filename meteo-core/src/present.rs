//! Boundary between the session and whatever displays its results.

use crate::{Location, RecentList, WeatherReport, units::TemperatureUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Destructive,
}

/// Short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// What to draw for "today" and the forecast. Both fields are `None`
/// before the first successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct WeatherView<'a> {
    pub location: Option<&'a Location>,
    pub report: Option<&'a WeatherReport>,
    pub unit: TemperatureUnit,
}

pub trait Presenter: Send + Sync {
    /// Triggering controls should be disabled while `loading` is true.
    fn set_loading(&self, loading: bool);

    fn show_weather(&self, view: WeatherView<'_>);

    fn show_recent(&self, recent: &RecentList);

    fn notify(&self, notice: &Notice);
}
