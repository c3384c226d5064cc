use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Where to ask the provider for weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    City(String),
    Coords(Coordinates),
}

impl Location {
    /// Query parameters identifying this location on the provider side.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Location::City(name) => vec![("q", name.clone())],
            Location::Coords(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }

    /// Stable key used by the query cache.
    pub fn cache_key(&self) -> String {
        match self {
            Location::City(name) => format!("city:{}", name.trim().to_lowercase()),
            Location::Coords(c) => format!("coords:{:.4},{:.4}", c.lat, c.lon),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::City(name) => f.write_str(name),
            Location::Coords(c) => write!(f, "{:.4}, {:.4}", c.lat, c.lon),
        }
    }
}

/// Weather condition as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub code: u32,
    pub description: String,
    pub icon: String,
}

impl Default for Condition {
    fn default() -> Self {
        Self {
            code: 0,
            description: "Unknown".to_string(),
            icon: String::new(),
        }
    }
}

/// Current conditions. Temperatures are always Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: Condition,
    pub observation_time: DateTime<Utc>,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInterval {
    pub timestamp: DateTime<Utc>,
    /// Provider-local wall clock time, as given by `dt_txt`.
    pub local_time: NaiveDateTime,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: Condition,
}

impl ForecastInterval {
    /// Calendar date this sample belongs to.
    pub fn date(&self) -> NaiveDate {
        self.local_time.date()
    }
}

/// Forecast payload: city label plus the raw interval list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location_name: String,
    pub intervals: Vec<ForecastInterval>,
}

/// The interval chosen to stand for a whole day.
pub type DailyForecast = ForecastInterval;
