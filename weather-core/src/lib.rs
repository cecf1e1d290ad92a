//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] abstraction
//! - The view-model mapper and icon code map
//! - The widget controller that owns display state
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod icon;
pub mod mapper;
pub mod model;
pub mod provider;
pub mod widget;

pub use config::{Config, ProviderConfig};
pub use error::{SearchRejected, WeatherError};
pub use icon::WeatherIcon;
pub use model::{ForecastDay, UnitSystem, WeatherReport, WeatherRequest, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use widget::{RenderMode, SearchOutcome, SearchTicket, ViewState, WeatherWidget};
