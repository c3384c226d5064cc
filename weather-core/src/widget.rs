//! Widget state: location, fetch outcomes, unit, theme and day carousel.
//!
//! [`Widget`] holds one mounted instance. [`WidgetHost`] owns at most one
//! widget and remounts it whenever it is initialised with a new config.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    cache::QueryCache,
    carousel::{Carousel, VisibleDay},
    config::{API_KEY_ENV_VARS, CacheSettings, Config},
    error::WeatherError,
    forecast::aggregate_daily,
    location::{GeoLocator, resolve_location},
    model::{Forecast, Location, WeatherSnapshot},
    provider::{WeatherProvider, openweather::OpenWeatherProvider},
    units::TemperatureUnit,
};

/// Shown when a failure carries no provider text.
pub const GENERIC_ERROR: &str =
    "Error fetching weather data. Please check your API key and city name.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// What the host passes when mounting a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub city: String,
    pub api_key: Option<String>,
}

impl WidgetConfig {
    pub fn new(city: impl Into<String>, api_key: Option<String>) -> Self {
        Self { city: city.into(), api_key }
    }
}

/// Data needed to draw the loaded widget.
#[derive(Debug)]
pub struct ReadyView<'a> {
    pub location_name: &'a str,
    pub current: &'a WeatherSnapshot,
    pub window: Vec<VisibleDay<'a>>,
    pub unit: TemperatureUnit,
    pub theme: Theme,
}

#[derive(Debug)]
pub enum WidgetView<'a> {
    Loading,
    Error { message: String },
    Ready(ReadyView<'a>),
}

#[derive(Debug)]
pub struct Widget {
    config: WidgetConfig,
    provider: Arc<dyn WeatherProvider>,
    locator: Arc<dyn GeoLocator>,
    weather_cache: QueryCache<WeatherSnapshot>,
    forecast_cache: QueryCache<Forecast>,
    location: Option<Location>,
    current: Option<Result<WeatherSnapshot, WeatherError>>,
    forecast: Option<Result<Forecast, WeatherError>>,
    carousel: Carousel,
    unit: TemperatureUnit,
    theme: Theme,
}

impl Widget {
    pub fn new(
        config: WidgetConfig,
        provider: Arc<dyn WeatherProvider>,
        locator: Arc<dyn GeoLocator>,
        cache: &CacheSettings,
    ) -> Self {
        Self {
            config,
            provider,
            locator,
            weather_cache: QueryCache::new(cache),
            forecast_cache: QueryCache::new(cache),
            location: None,
            current: None,
            forecast: None,
            carousel: Carousel::default(),
            unit: TemperatureUnit::default(),
            theme: Theme::default(),
        }
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Location used for the last load, once resolved.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Resolve the location if needed, then fetch current weather and forecast concurrently.
    ///
    /// Both outcomes replace whatever was loaded before.
    pub async fn load(&mut self) {
        let location = match &self.location {
            Some(location) => location.clone(),
            None => {
                let location = resolve_location(&self.config.city, self.locator.as_ref()).await;
                self.location = Some(location.clone());
                location
            }
        };

        let key = location.cache_key();
        let provider = self.provider.as_ref();
        let loc = &location;

        let (current, forecast) = tokio::join!(
            self.weather_cache.fetch(&key, move || provider.fetch_current(loc)),
            self.forecast_cache.fetch(&key, move || provider.fetch_forecast(loc)),
        );

        match &forecast {
            Ok(forecast) => self.carousel.replace_days(aggregate_daily(&forecast.intervals)),
            Err(_) => self.carousel.replace_days(Vec::new()),
        }

        debug!(
            %location,
            current_ok = current.is_ok(),
            forecast_ok = forecast.is_ok(),
            days = self.carousel.len(),
            "weather loaded"
        );

        self.current = Some(current);
        self.forecast = Some(forecast);
    }

    /// Explicit user refresh: bypass cached responses and reload.
    pub async fn refresh(&mut self) {
        self.weather_cache.invalidate();
        self.forecast_cache.invalidate();
        self.load().await;
    }

    /// Switch to another city. The next load resolves the location again.
    ///
    /// The API key is fixed for the widget's lifetime; a new key means a remount
    /// through [`WidgetHost::init`].
    pub fn set_city(&mut self, city: impl Into<String>) {
        let city = city.into();
        if city == self.config.city {
            return;
        }

        info!(from = %self.config.city, to = %city, "city changed");
        self.config.city = city;
        self.location = None;
        self.current = None;
        self.forecast = None;
        self.carousel = Carousel::default();
    }

    pub fn view(&self) -> WidgetView<'_> {
        let (current, forecast) = match (&self.current, &self.forecast) {
            (Some(current), Some(forecast)) => (current, forecast),
            _ => return WidgetView::Loading,
        };

        let current = match (current, forecast) {
            (Err(err), _) | (Ok(_), Err(err)) => {
                return WidgetView::Error { message: error_message(err) };
            }
            (Ok(current), Ok(_)) => current,
        };

        let location_name = if current.location_name.is_empty() {
            self.config.city.as_str()
        } else {
            current.location_name.as_str()
        };

        WidgetView::Ready(ReadyView {
            location_name,
            current,
            window: self.carousel.visible_window(),
            unit: self.unit,
            theme: self.theme,
        })
    }

    pub fn next_day(&mut self) {
        self.carousel.next();
    }

    pub fn advance_days(&mut self, days: usize) {
        self.carousel.advance(days);
    }

    pub fn previous_day(&mut self) {
        self.carousel.previous();
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}

fn error_message(err: &WeatherError) -> String {
    match err {
        WeatherError::Fetch { body, .. } if body.trim().is_empty() => GENERIC_ERROR.to_string(),
        other => other.to_string(),
    }
}

/// Owns the single mounted widget of an embedding host.
#[derive(Debug)]
pub struct WidgetHost {
    locator: Arc<dyn GeoLocator>,
    base_url: String,
    cache: CacheSettings,
    unit: TemperatureUnit,
    theme: Theme,
    env_api_key: Option<String>,
    widget: Option<Widget>,
}

impl WidgetHost {
    pub fn new(config: &Config, locator: Arc<dyn GeoLocator>) -> Self {
        let env_api_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|k| !k.trim().is_empty()));

        Self {
            locator,
            base_url: config.base_url().to_string(),
            cache: config.cache.clone(),
            unit: config.unit,
            theme: config.theme,
            env_api_key,
            widget: None,
        }
    }

    /// Replace the key picked up from the environment.
    pub fn with_env_api_key(mut self, key: Option<String>) -> Self {
        self.env_api_key = key;
        self
    }

    /// Tear down any mounted widget and mount a fresh one for `config`.
    ///
    /// Without a usable key or city nothing is mounted and the previous widget is left alone.
    pub fn init(&mut self, config: WidgetConfig) -> Option<&mut Widget> {
        if config.city.trim().is_empty() {
            warn!("No city provided");
            return None;
        }

        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.env_api_key.clone());

        let Some(api_key) = api_key else {
            warn!("No API key provided");
            return None;
        };

        if self.widget.take().is_some() {
            debug!("unmounting previous widget");
        }

        let provider = Arc::new(OpenWeatherProvider::with_base_url(api_key, self.base_url.clone()));
        let widget = Widget::new(config, provider, self.locator.clone(), &self.cache)
            .with_unit(self.unit)
            .with_theme(self.theme);

        Some(self.widget.insert(widget))
    }

    pub fn is_mounted(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget(&self) -> Option<&Widget> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut Widget> {
        self.widget.as_mut()
    }

    /// Unmount the widget; returns whether one was mounted.
    pub fn destroy(&mut self) -> bool {
        self.widget.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Endpoint,
        location::NoGeolocation,
        model::{Condition, ForecastInterval},
    };
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use reqwest::StatusCode;

    #[derive(Debug, Default)]
    struct StubProvider {
        fail_current: Option<String>,
        fail_forecast: Option<String>,
        days: u32,
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Paris".into(),
            temperature_c: 18.0,
            feels_like_c: 17.0,
            humidity_pct: 60,
            wind_speed_mps: 2.5,
            condition: Condition::default(),
            observation_time: Utc::now(),
        }
    }

    fn intervals(days: u32) -> Vec<ForecastInterval> {
        (1..=days)
            .flat_map(|day| [9, 12, 15].map(move |hour| (day, hour)))
            .map(|(day, hour)| {
                let local_time = NaiveDate::from_ymd_opt(2024, 10, day)
                    .and_then(|x| x.and_hms_opt(hour, 0, 0))
                    .expect("valid date");
                ForecastInterval {
                    timestamp: Utc.from_utc_datetime(&local_time),
                    local_time,
                    temperature_c: day as f64,
                    feels_like_c: day as f64,
                    humidity_pct: 50,
                    wind_speed_mps: 1.0,
                    condition: Condition::default(),
                }
            })
            .collect()
    }

    fn failure(endpoint: Endpoint, body: &str) -> WeatherError {
        WeatherError::Fetch { endpoint, status: StatusCode::UNAUTHORIZED, body: body.to_string() }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch_current(&self, _location: &Location) -> Result<WeatherSnapshot, WeatherError> {
            match &self.fail_current {
                Some(body) => Err(failure(Endpoint::Weather, body)),
                None => Ok(snapshot()),
            }
        }

        async fn fetch_forecast(&self, _location: &Location) -> Result<Forecast, WeatherError> {
            match &self.fail_forecast {
                Some(body) => Err(failure(Endpoint::Forecast, body)),
                None => Ok(Forecast { location_name: "Paris, FR".into(), intervals: intervals(self.days) }),
            }
        }
    }

    fn widget(provider: StubProvider) -> Widget {
        let settings = CacheSettings { retries: 0, retry_delay_ms: 0, ..CacheSettings::default() };
        Widget::new(
            WidgetConfig::new("Paris", None),
            Arc::new(provider),
            Arc::new(NoGeolocation),
            &settings,
        )
    }

    #[tokio::test]
    async fn loading_until_first_load() {
        let mut w = widget(StubProvider { days: 3, ..Default::default() });
        assert!(matches!(w.view(), WidgetView::Loading));

        w.load().await;

        let WidgetView::Ready(view) = w.view() else {
            panic!("expected ready view");
        };
        assert_eq!(view.location_name, "Paris");
        assert_eq!(view.window.len(), 3);
        assert_eq!(w.location(), Some(&Location::City("Paris".into())));
    }

    #[tokio::test]
    async fn current_failure_message_wins() {
        let mut w = widget(StubProvider {
            fail_current: Some("Invalid API key".into()),
            fail_forecast: Some("other".into()),
            ..Default::default()
        });
        w.load().await;

        let WidgetView::Error { message } = w.view() else {
            panic!("expected error view");
        };
        assert!(message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn forecast_failure_alone_is_an_error() {
        let mut w = widget(StubProvider { fail_forecast: Some(String::new()), ..Default::default() });
        w.load().await;

        let WidgetView::Error { message } = w.view() else {
            panic!("expected error view");
        };
        assert_eq!(message, GENERIC_ERROR);
        assert!(w.carousel().is_empty());
    }

    #[tokio::test]
    async fn empty_forecast_is_ready_with_no_cards() {
        let mut w = widget(StubProvider::default());
        w.load().await;

        let WidgetView::Ready(view) = w.view() else {
            panic!("expected ready view");
        };
        assert!(view.window.is_empty());
    }

    #[tokio::test]
    async fn toggles_do_not_touch_data() {
        let mut w = widget(StubProvider { days: 2, ..Default::default() });
        w.load().await;

        w.toggle_unit();
        w.toggle_theme();
        w.next_day();

        assert_eq!(w.unit(), TemperatureUnit::Fahrenheit);
        assert_eq!(w.theme(), Theme::Dark);
        assert_eq!(w.carousel().index(), Some(1));
        assert_eq!(w.carousel().current().map(|d| d.temperature_c), Some(2.0));

        w.set_unit(TemperatureUnit::Celsius);
        w.previous_day();
        assert_eq!(w.unit(), TemperatureUnit::Celsius);
        assert_eq!(w.carousel().index(), Some(0));
    }

    #[tokio::test]
    async fn city_change_resets_location_and_cursor() {
        let mut w = widget(StubProvider { days: 4, ..Default::default() });
        w.load().await;
        w.next_day();
        w.next_day();

        w.set_city("Rome");
        assert!(matches!(w.view(), WidgetView::Loading));
        assert!(w.location().is_none());

        w.load().await;
        assert_eq!(w.location(), Some(&Location::City("Rome".into())));
        assert_eq!(w.carousel().index(), Some(0));
    }

    #[tokio::test]
    async fn same_city_keeps_loaded_data() {
        let mut w = widget(StubProvider { days: 3, ..Default::default() });
        w.load().await;
        w.next_day();

        w.set_city("Paris");

        assert!(matches!(w.view(), WidgetView::Ready(_)));
        assert_eq!(w.carousel().index(), Some(1));
    }

    #[tokio::test]
    async fn reload_keeps_cursor_in_range() {
        let mut w = widget(StubProvider { days: 5, ..Default::default() });
        w.load().await;
        w.previous_day();
        assert_eq!(w.carousel().index(), Some(4));

        w.refresh().await;
        assert_eq!(w.carousel().index(), Some(4));
    }

    #[test]
    fn host_without_key_mounts_nothing() {
        let mut host = WidgetHost::new(&Config::default(), Arc::new(NoGeolocation)).with_env_api_key(None);

        assert!(host.init(WidgetConfig::new("Paris", None)).is_none());
        assert!(!host.is_mounted());
    }

    #[test]
    fn host_remounts_on_init() {
        let mut host = WidgetHost::new(&Config::default(), Arc::new(NoGeolocation))
            .with_env_api_key(Some("ENV".into()));

        host.init(WidgetConfig::new("Paris", None)).expect("mounted").next_day();
        let second = host.init(WidgetConfig::new("Rome", Some("KEY".into()))).expect("mounted");
        assert_eq!(second.config().city, "Rome");
        assert!(second.location().is_none());

        assert!(host.init(WidgetConfig::new(" ", None)).is_none());
        assert_eq!(host.widget().map(|w| w.config().city.as_str()), Some("Rome"));

        assert!(host.destroy());
        assert!(!host.is_mounted());
        assert!(!host.destroy());
    }
}
