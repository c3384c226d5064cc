use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::{Endpoint, WeatherError},
    model::{Condition, Forecast, ForecastInterval, Location, WeatherSnapshot},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}/{endpoint}` for `location` in metric units and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        location: &Location,
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, endpoint.path());

        let mut query = location.query_params();
        query.push(("appid", self.api_key.clone()));
        query.push(("units", "metric".to_string()));

        debug!(%endpoint, %location, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        if !status.is_success() {
            warn!(%endpoint, %status, "OpenWeather request failed");
            return Err(WeatherError::Fetch { endpoint, status, body });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

fn condition(weather: &[OwWeather]) -> Condition {
    weather
        .first()
        .map(|w| Condition {
            code: w.id,
            description: w.description.clone(),
            icon: w.icon.clone(),
        })
        .unwrap_or_default()
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        Self {
            condition: condition(&parsed.weather),
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            observation_time: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
        }
    }
}

impl From<OwForecastEntry> for ForecastInterval {
    fn from(entry: OwForecastEntry) -> Self {
        let timestamp = unix_to_utc(entry.dt).unwrap_or_else(Utc::now);
        // `dt_txt` carries the provider's calendar date; fall back to the epoch value.
        let local_time = NaiveDateTime::parse_from_str(&entry.dt_txt, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| timestamp.naive_utc());

        Self {
            condition: condition(&entry.weather),
            timestamp,
            local_time,
            temperature_c: entry.main.temp,
            feels_like_c: entry.main.feels_like,
            humidity_pct: entry.main.humidity,
            wind_speed_mps: entry.wind.speed,
        }
    }
}

impl From<OwForecastResponse> for Forecast {
    fn from(parsed: OwForecastResponse) -> Self {
        let location_name = match parsed.city.country {
            Some(country) if !country.is_empty() => format!("{}, {}", parsed.city.name, country),
            _ => parsed.city.name,
        };

        Self {
            location_name,
            intervals: parsed.list.into_iter().map(ForecastInterval::from).collect(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, location: &Location) -> Result<WeatherSnapshot, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json(Endpoint::Weather, location).await?;
        Ok(parsed.into())
    }

    async fn fetch_forecast(&self, location: &Location) -> Result<Forecast, WeatherError> {
        let parsed: OwForecastResponse = self.get_json(Endpoint::Forecast, location).await?;
        Ok(parsed.into())
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// Hosted icon image for a provider icon id, e.g. `10d`.
pub fn icon_url(icon: &str) -> String {
    format!("http://openweathermap.org/img/w/{icon}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn forecast_entry_uses_dt_txt_for_calendar_date() {
        let entry: OwForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1729555200,
            "dt_txt": "2024-10-22 00:00:00",
            "main": { "temp": 11.2, "feels_like": 10.1, "humidity": 80 },
            "weather": [{ "id": 500, "description": "light rain", "icon": "10n" }],
            "wind": { "speed": 4.1 }
        }))
        .expect("valid entry");

        let interval = ForecastInterval::from(entry);

        assert_eq!(interval.local_time.day(), 22);
        assert_eq!(interval.local_time.hour(), 0);
        assert_eq!(interval.condition.code, 500);
        assert_eq!(interval.condition.icon, "10n");
    }

    #[test]
    fn unparseable_dt_txt_falls_back_to_utc_timestamp() {
        let entry: OwForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1729566000,
            "dt_txt": "22/10/2024 3am",
            "main": { "temp": 9.0, "feels_like": 8.0, "humidity": 85 },
            "weather": [],
            "wind": { "speed": 2.0 }
        }))
        .expect("valid entry");

        let interval = ForecastInterval::from(entry);

        assert_eq!(interval.local_time, interval.timestamp.naive_utc());
        assert_eq!(interval.date().to_string(), "2024-10-22");
        assert_eq!(interval.local_time.hour(), 3);
    }

    #[test]
    fn missing_weather_entry_gives_unknown_condition() {
        assert_eq!(condition(&[]).description, "Unknown");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let p = OpenWeatherProvider::with_base_url("KEY".into(), "http://localhost:1234/");
        assert_eq!(p.base_url(), "http://localhost:1234");
    }

    #[test]
    fn icon_url_points_at_hosted_image() {
        assert_eq!(icon_url("01d"), "http://openweathermap.org/img/w/01d.png");
    }
}
