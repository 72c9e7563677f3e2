use chrono::Datelike;
use meteo_core::{
    Location, Notice, Presenter, RecentList, Severity, WeatherView, classify_code, is_rainy,
};

/// Prints session output to the terminal: weather on stdout, notices on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPresenter;

/// `"Paris, France"`, or just the name when the country is unknown.
pub fn location_title(loc: &Location) -> String {
    match &loc.country {
        Some(country) if !country.is_empty() => format!("{}, {}", loc.name, country),
        _ => loc.name.clone(),
    }
}

/// `"Paris (France)"`, as used in the recent list.
pub fn location_label(loc: &Location) -> String {
    match &loc.country {
        Some(country) if !country.is_empty() => format!("{} ({})", loc.name, country),
        _ => loc.name.clone(),
    }
}

fn icon(code: i32) -> &'static str {
    if is_rainy(code) {
        "🌧️"
    } else if code == 0 {
        "☀️"
    } else {
        "⛅"
    }
}

pub fn format_weather(view: WeatherView<'_>) -> String {
    let Some(report) = view.report else {
        return format!("Today\n  --{}\n  -- km/h  --%\n", view.unit.symbol());
    };

    let unit = view.unit;
    let current = &report.current;
    let title = view.location.map(location_title).unwrap_or_else(|| "Today".to_string());

    let (max_c, min_c) = report
        .today()
        .map(|d| (d.max_c, d.min_c))
        .unwrap_or((current.temperature_c, current.temperature_c));

    let mut out = format!(
        "{title}\n  {} {}  {}\n  {} / {}\n  Wind {} km/h  Humidity {}%\n",
        icon(current.weather_code),
        unit.format(current.temperature_c),
        classify_code(current.weather_code),
        unit.format(max_c),
        unit.format(min_c),
        current.wind_kmh.round(),
        current.humidity,
    );

    if !report.daily.is_empty() {
        out.push_str("\nForecast:\n");
    }
    for day in &report.daily {
        let label = day
            .date_naive()
            .map(|d| d.weekday().to_string())
            .unwrap_or_else(|| day.date.clone());
        out.push_str(&format!(
            "  {label:<4} {} {:>5} / {:<5} {:>3} km/h {:>3}%  {}\n",
            icon(day.weather_code),
            unit.format(day.max_c),
            unit.format(day.min_c),
            day.wind_kmh.round(),
            day.humidity,
            classify_code(day.weather_code),
        ));
    }

    out
}

impl Presenter for TerminalPresenter {
    fn set_loading(&self, loading: bool) {
        tracing::debug!("loading: {}", loading);
    }

    fn show_weather(&self, view: WeatherView<'_>) {
        print!("{}", format_weather(view));
    }

    fn show_recent(&self, recent: &RecentList) {
        if recent.is_empty() {
            return;
        }
        let names: Vec<String> = recent.iter().map(location_label).collect();
        println!("\nRecent: {}", names.join(", "));
    }

    fn notify(&self, notice: &Notice) {
        match notice.severity {
            Severity::Destructive => eprintln!("error: {}: {}", notice.title, notice.description),
            Severity::Info => eprintln!("{}: {}", notice.title, notice.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::{CurrentWeather, DayForecast, TemperatureUnit, WeatherReport};

    fn report() -> WeatherReport {
        WeatherReport {
            current: CurrentWeather {
                temperature_c: 21.4,
                wind_kmh: 12.6,
                humidity: 55,
                weather_code: 61,
            },
            daily: vec![DayForecast {
                date: "2024-01-01".into(),
                max_c: 24.0,
                min_c: 15.0,
                wind_kmh: 20.0,
                humidity: 70,
                weather_code: 0,
            }],
        }
    }

    #[test]
    fn titles_and_labels() {
        let paris = Location::new("Paris", Some("France".into()), 48.85, 2.35);
        assert_eq!(location_title(&paris), "Paris, France");
        assert_eq!(location_label(&paris), "Paris (France)");

        let here = Location::fallback(1.0, 2.0);
        assert_eq!(location_title(&here), "Current Location");
        assert_eq!(location_label(&here), "Current Location");
    }

    #[test]
    fn format_weather_in_celsius() {
        let report = report();
        let paris = Location::new("Paris", Some("France".into()), 48.85, 2.35);
        let text = format_weather(WeatherView {
            location: Some(&paris),
            report: Some(&report),
            unit: TemperatureUnit::Celsius,
        });

        assert!(text.starts_with("Paris, France\n"));
        assert!(text.contains("🌧️ 21°C  Rain"));
        assert!(text.contains("24°C / 15°C"));
        assert!(text.contains("Wind 13 km/h  Humidity 55%"));
        assert!(text.contains("Mon"));
        assert!(text.contains("Clear"));
    }

    #[test]
    fn format_weather_in_fahrenheit() {
        let report = report();
        let text = format_weather(WeatherView {
            location: None,
            report: Some(&report),
            unit: TemperatureUnit::Fahrenheit,
        });

        assert!(text.starts_with("Today\n"));
        assert!(text.contains("71°F"));
        assert!(text.contains("75°F / 59°F"));
    }

    #[test]
    fn format_empty_view() {
        let text = format_weather(WeatherView {
            location: None,
            report: None,
            unit: TemperatureUnit::Celsius,
        });
        assert!(text.contains("--°C"));
    }
}
