//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (device position or configured city)
//! - The OpenWeather gateway and its query cache
//! - Daily forecast aggregation, the day carousel and unit formatting
//! - The widget state machine and its host handle
//!
//! It is used by `weather-cli`, but can also be embedded by other front ends.

pub mod cache;
pub mod carousel;
pub mod config;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;
pub mod units;
pub mod widget;

pub use carousel::{Carousel, Position, VisibleDay};
pub use config::{CacheSettings, Config};
pub use error::{Endpoint, LocationError, WeatherError};
pub use forecast::{aggregate_daily, day_label};
pub use location::{FixedPosition, GeoLocator, NoGeolocation, resolve_location};
pub use model::{Condition, Coordinates, DailyForecast, Forecast, ForecastInterval, Location, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use units::{TemperatureUnit, format_temperature, to_display_unit};
pub use widget::{Theme, Widget, WidgetConfig, WidgetHost, WidgetView};
