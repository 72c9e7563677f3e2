use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Select, Text};
use meteo_core::{
    ActionStatus, Config, RecentStore, Session, SessionSettings, TemperatureUnit,
    provider_from_config,
};

use crate::render::{TerminalPresenter, location_label};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Current weather and 5-day forecast for a city")]
pub struct Cli {
    /// Temperature unit for this run; defaults to the configured unit.
    #[arg(long, short, global = true, value_enum)]
    pub unit: Option<UnitArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Celsius,
    Fahrenheit,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Celsius => TemperatureUnit::Celsius,
            UnitArg::Fahrenheit => TemperatureUnit::Fahrenheit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for a city and remember it.
    Search {
        /// City name, e.g. "Berlin".
        city: String,
    },

    /// Show weather for coordinates.
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// List recently searched cities, or show weather for one of them.
    Recent {
        /// Position in the list, as printed by `meteo recent`.
        index: Option<usize>,
    },

    /// Interactively configure unit, language and heat alert threshold.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load()?;

        if let Command::Configure = self.command {
            configure(&mut config)?;
            return Ok(ExitCode::SUCCESS);
        }

        let recent = RecentStore::new(config.recent_file_path()?);

        if let Command::Recent { index: None } = self.command {
            print_recent(&recent);
            return Ok(ExitCode::SUCCESS);
        }

        let mut settings = SessionSettings::from(&config);
        if let Some(unit) = self.unit {
            settings.unit = unit.into();
        }

        let provider = provider_from_config(&config)?;
        let session = Session::new(provider, recent, Box::new(TerminalPresenter), settings);

        let status = match self.command {
            Command::Search { city } => session.search(&city).await,
            Command::Locate { lat, lon } => session.locate(lat, lon).await,
            Command::Recent { index: Some(index) } => {
                let status = session.select_recent(index).await;
                if status == ActionStatus::NotFound {
                    eprintln!("No recent city at position {index}. Run `meteo recent` to list them.");
                }
                status
            }
            Command::Recent { index: None } | Command::Configure => ActionStatus::Ignored,
        };

        Ok(match status {
            ActionStatus::Failed => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        })
    }
}

fn print_recent(store: &RecentStore) {
    let list = match store.load() {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("{}", e);
            Default::default()
        }
    };

    if list.is_empty() {
        println!("No recent cities yet. Try `meteo search <city>`.");
        return;
    }

    for (idx, loc) in list.iter().enumerate() {
        println!("[{idx}] {}", location_label(loc));
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let units = TemperatureUnit::all().to_vec();
    let start = units.iter().position(|u| *u == config.unit).unwrap_or(0);

    config.unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read temperature unit")?;

    config.language = Text::new("Language for place names:")
        .with_default(&config.language)
        .prompt()
        .context("Failed to read language")?;

    config.heat_alert_c = CustomType::<f64>::new("Heat alert above (°C):")
        .with_default(config.heat_alert_c)
        .with_error_message("Please enter a number")
        .prompt()
        .context("Failed to read heat alert threshold")?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
