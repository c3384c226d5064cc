use crate::{
    Config,
    error::WeatherError,
    model::{Forecast, Location, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Current conditions and forecast for a location.
///
/// The two calls are independent: either may fail on its own.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, location: &Location) -> Result<WeatherSnapshot, WeatherError>;

    async fn fetch_forecast(&self, location: &Location) -> Result<Forecast, WeatherError>;
}

/// Construct the OpenWeather provider from config, with an optional explicit key.
pub fn provider_from_config(
    config: &Config,
    api_key: Option<&str>,
) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
    let api_key = config.resolve_api_key(api_key)?;
    Ok(Arc::new(OpenWeatherProvider::with_base_url(api_key, config.base_url())))
}
