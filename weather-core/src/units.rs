//! Temperature display conversion.
//!
//! Stored temperatures stay in Celsius; the unit only affects formatting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
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

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
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
            "celsius" | "c" | "metric" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" | "imperial" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Convert a Celsius reading into `unit`.
pub fn to_display_unit(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Rounded temperature with its unit symbol, e.g. `21°C`.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    // Half away from zero; going through i64 also avoids printing "-0".
    let rounded = to_display_unit(celsius, unit).round() as i64;
    format!("{rounded}{}", unit.symbol())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_is_identity() {
        assert_eq!(to_display_unit(21.3, TemperatureUnit::Celsius), 21.3);
    }

    #[test]
    fn formats_reference_points() {
        assert_eq!(format_temperature(0.0, TemperatureUnit::Fahrenheit), "32°F");
        assert_eq!(format_temperature(100.0, TemperatureUnit::Celsius), "100°C");
        assert_eq!(format_temperature(-40.0, TemperatureUnit::Fahrenheit), "-40°F");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_temperature(2.5, TemperatureUnit::Celsius), "3°C");
        assert_eq!(format_temperature(-2.5, TemperatureUnit::Celsius), "-3°C");
        assert_eq!(format_temperature(-0.4, TemperatureUnit::Celsius), "0°C");
    }

    #[test]
    fn parses_and_toggles() {
        for unit in TemperatureUnit::all() {
            let parsed = TemperatureUnit::try_from(unit.as_str()).expect("roundtrip should succeed");
            assert_eq!(*unit, parsed);
            assert_eq!(unit.toggled().toggled(), *unit);
        }

        let err = TemperatureUnit::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit"));
    }
}
