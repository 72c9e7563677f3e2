//! Pure helpers around WMO weather codes and temperature units.
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::{Deserialize, Serialize};

/// Sky/precipitation summary derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Summary {
    Clear,
    PartlyCloudy,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl Summary {
    pub fn label(&self) -> &'static str {
        match self {
            Summary::Clear => "Clear",
            Summary::PartlyCloudy => "Partly cloudy",
            Summary::Fog => "Fog",
            Summary::Drizzle => "Drizzle",
            Summary::Rain => "Rain",
            Summary::FreezingRain => "Freezing rain",
            Summary::Snow => "Snow",
            Summary::Thunderstorm => "Thunderstorm",
            Summary::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_code(code: i32) -> Summary {
    match code {
        0 => Summary::Clear,
        1..=3 => Summary::PartlyCloudy,
        45 | 48 => Summary::Fog,
        51..=57 => Summary::Drizzle,
        61 | 63 | 65 | 80 | 81 | 82 => Summary::Rain,
        66 | 67 => Summary::FreezingRain,
        71 | 73 | 75 | 77 | 85 | 86 => Summary::Snow,
        95 | 96 | 99 => Summary::Thunderstorm,
        _ => Summary::Unknown,
    }
}

/// Drizzle, rain, showers and thunderstorms.
pub fn is_rainy(code: i32) -> bool {
    matches!(code, 51..=67 | 80..=99)
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    /// Rounded reading with its unit symbol, e.g. `"21°C"`.
    pub fn format(&self, celsius: f64) -> String {
        format!("{}{}", self.convert(celsius).round(), self.symbol())
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rainy_codes_cover_drizzle_rain_and_storms() {
        for code in 0..=99 {
            let expected = (51..=67).contains(&code) || (80..=99).contains(&code);
            assert_eq!(is_rainy(code), expected, "code {code}");
        }
    }

    #[test]
    fn rainy_outside_known_range_is_false() {
        assert!(!is_rainy(-1));
        assert!(!is_rainy(100));
        assert!(!is_rainy(200));
    }

    #[test]
    fn classify_known_codes() {
        assert_eq!(classify_code(0), Summary::Clear);
        assert_eq!(classify_code(2), Summary::PartlyCloudy);
        assert_eq!(classify_code(48), Summary::Fog);
        assert_eq!(classify_code(57), Summary::Drizzle);
        assert_eq!(classify_code(61), Summary::Rain);
        assert_eq!(classify_code(82), Summary::Rain);
        assert_eq!(classify_code(66), Summary::FreezingRain);
        assert_eq!(classify_code(71), Summary::Snow);
        assert_eq!(classify_code(86), Summary::Snow);
        assert_eq!(classify_code(95), Summary::Thunderstorm);
    }

    #[test]
    fn classify_unlisted_codes_as_unknown() {
        assert_eq!(classify_code(200), Summary::Unknown);
        assert_eq!(classify_code(4), Summary::Unknown);
        assert_eq!(classify_code(62), Summary::Unknown);
        assert_eq!(classify_code(-1), Summary::Unknown);
    }

    #[test]
    fn summary_labels() {
        assert_eq!(Summary::PartlyCloudy.label(), "Partly cloudy");
        assert_eq!(Summary::FreezingRain.to_string(), "Freezing rain");
    }

    #[test]
    fn celsius_to_fahrenheit_fixed_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn unit_formats_rounded_reading() {
        assert_eq!(TemperatureUnit::Celsius.format(21.4), "21°C");
        assert_eq!(TemperatureUnit::Fahrenheit.format(100.0), "212°F");
    }

    #[test]
    fn unit_as_str_roundtrip() {
        for unit in TemperatureUnit::all() {
            let parsed = TemperatureUnit::try_from(unit.as_str()).expect("roundtrip should succeed");
            assert_eq!(*unit, parsed);
        }
        assert!(TemperatureUnit::try_from("kelvin").is_err());
    }
}
