use crate::{
    Config, WeatherReport, WeatherRequest, error::WeatherError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions plus forecast for one city and unit system.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_report(&self, request: &WeatherRequest) -> Result<WeatherReport, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = match config.base_url() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key, base_url),
        None => OpenWeatherProvider::new(api_key),
    };

    Ok(Box::new(provider))
}
