//! One interactive session: the current location, report and unit, plus the
//! actions that change them.
//!
//! Every action that goes to the network takes a new request generation.
//! Results are applied only while their generation is still the latest, so a
//! slow response can never overwrite the outcome of a newer action.

use parking_lot::Mutex;

use crate::{
    Config,
    error::MeteoError,
    model::{Location, WeatherReport},
    present::{Notice, Presenter, WeatherView},
    provider::WeatherProvider,
    recent::{RecentList, RecentStore},
    units::TemperatureUnit,
};

const FETCH_FAILED: &str = "Failed to fetch weather.";
const LOCATE_FAILED: &str = "Failed to fetch location weather.";

/// How an action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// A new report is now current.
    Applied,
    /// The city or recent entry does not exist.
    NotFound,
    /// The upstream service could not be reached.
    Failed,
    /// A newer action started before this one completed; its result was dropped.
    Superseded,
    /// Nothing to do (e.g. blank query or invalid coordinates).
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub unit: TemperatureUnit,
    pub heat_alert_c: f64,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            unit: config.unit,
            heat_alert_c: config.heat_alert_c,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, Default)]
struct SessionState {
    location: Option<Location>,
    report: Option<WeatherReport>,
    unit: TemperatureUnit,
    loading: bool,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

pub struct Session {
    provider: Box<dyn WeatherProvider>,
    recent: RecentStore,
    presenter: Box<dyn Presenter>,
    heat_alert_c: f64,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        recent: RecentStore,
        presenter: Box<dyn Presenter>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            provider,
            recent,
            presenter,
            heat_alert_c: settings.heat_alert_c,
            state: Mutex::new(SessionState {
                unit: settings.unit,
                ..SessionState::default()
            }),
        }
    }

    /// Present the persisted recent list and the empty weather view.
    pub fn start(&self) {
        self.presenter.show_recent(&self.recent());
        self.render();
    }

    /// Look up `query` by name, fetch its weather and remember it.
    pub async fn search(&self, query: &str) -> ActionStatus {
        let query = query.trim();
        if query.is_empty() {
            self.presenter.notify(&Notice::info(
                "Enter a city name",
                "Please type a city to search.",
            ));
            return ActionStatus::Ignored;
        }

        let ticket = self.begin();
        tracing::debug!("Searching for '{}'", query);

        let status = match self.provider.geocode_by_name(query).await {
            Ok(Some(loc)) => self.fetch_and_apply(ticket, loc, true, FETCH_FAILED).await,
            Ok(None) if self.is_current(ticket) => {
                self.presenter
                    .notify(&Notice::info("City not found", "Try another search."));
                ActionStatus::NotFound
            }
            Ok(None) => ActionStatus::Superseded,
            Err(e) => self.fail(ticket, &e, FETCH_FAILED),
        };

        self.finish(ticket);
        status
    }

    /// Weather for raw coordinates, named by reverse geocoding when possible.
    pub async fn locate(&self, latitude: f64, longitude: f64) -> ActionStatus {
        if !valid_coordinates(latitude, longitude) {
            self.presenter.notify(&Notice::destructive(
                "Location error",
                format!("Invalid coordinates ({latitude}, {longitude})."),
            ));
            return ActionStatus::Ignored;
        }

        let ticket = self.begin();

        let loc = match self.provider.geocode_by_coordinates(latitude, longitude).await {
            Ok(Some(loc)) => loc,
            Ok(None) => Location::fallback(latitude, longitude),
            Err(e) => {
                tracing::debug!("Reverse geocoding failed, using coordinates: {}", e);
                Location::fallback(latitude, longitude)
            }
        };

        let status = self.fetch_and_apply(ticket, loc, false, LOCATE_FAILED).await;
        self.finish(ticket);
        status
    }

    /// Fetch weather for the entry at `index` of the persisted recent list.
    pub async fn select_recent(&self, index: usize) -> ActionStatus {
        let Some(loc) = self.recent().select(index).cloned() else {
            tracing::debug!("No recent location at index {}", index);
            return ActionStatus::NotFound;
        };

        let ticket = self.begin();
        let status = self.fetch_and_apply(ticket, loc, false, FETCH_FAILED).await;
        self.finish(ticket);
        status
    }

    pub fn set_unit(&self, unit: TemperatureUnit) {
        self.state.lock().unit = unit;
        self.render();
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.state.lock().unit
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn current_location(&self) -> Option<Location> {
        self.state.lock().location.clone()
    }

    pub fn current_report(&self) -> Option<WeatherReport> {
        self.state.lock().report.clone()
    }

    /// The persisted recent list; unreadable storage reads as empty.
    pub fn recent(&self) -> RecentList {
        self.recent.load().unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            RecentList::new()
        })
    }

    async fn fetch_and_apply(
        &self,
        ticket: Ticket,
        loc: Location,
        remember: bool,
        failure: &str,
    ) -> ActionStatus {
        let report = match self.provider.fetch_report(loc.latitude, loc.longitude).await {
            Ok(report) => report,
            Err(e) => return self.fail(ticket, &e, failure),
        };

        let hot = report.current.temperature_c > self.heat_alert_c;

        {
            let mut state = self.state.lock();
            if state.generation != ticket.0 {
                tracing::debug!("Dropping stale weather for {}", loc.name);
                return ActionStatus::Superseded;
            }
            state.location = Some(loc.clone());
            state.report = Some(report);
        }

        tracing::info!("Weather updated for {}", loc.name);
        self.render();

        if remember {
            self.remember(loc);
        }

        if hot {
            self.presenter.notify(&Notice::destructive(
                "Heat alert",
                "Extreme temperature detected for today.",
            ));
        }

        ActionStatus::Applied
    }

    fn remember(&self, loc: Location) {
        let existing = self.recent();
        let list = match self.recent.record(loc.clone(), existing.clone()) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Could not save recent locations: {}", e);
                existing.inserted(loc)
            }
        };
        self.presenter.show_recent(&list);
    }

    fn fail(&self, ticket: Ticket, err: &MeteoError, description: &str) -> ActionStatus {
        if !self.is_current(ticket) {
            tracing::debug!("Ignoring failure of superseded request: {}", err);
            return ActionStatus::Superseded;
        }

        tracing::warn!("{}", err);
        self.presenter.notify(&Notice::destructive("Error", description));
        ActionStatus::Failed
    }

    fn begin(&self) -> Ticket {
        let ticket = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.loading = true;
            Ticket(state.generation)
        };
        self.presenter.set_loading(true);
        ticket
    }

    fn finish(&self, ticket: Ticket) {
        let cleared = {
            let mut state = self.state.lock();
            let cleared = state.generation == ticket.0 && state.loading;
            if cleared {
                state.loading = false;
            }
            cleared
        };
        if cleared {
            self.presenter.set_loading(false);
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.state.lock().generation == ticket.0
    }

    fn render(&self) {
        let (location, report, unit) = {
            let state = self.state.lock();
            (state.location.clone(), state.report.clone(), state.unit)
        };

        self.presenter.show_weather(WeatherView {
            location: location.as_ref(),
            report: report.as_ref(),
            unit,
        });
    }
}

fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}
