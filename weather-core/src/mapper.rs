//! Reshapes raw OpenWeather payloads into display models.
//!
//! Everything here is pure: same payloads and unit system in, same report out.

use chrono::{DateTime, Utc};

use crate::{
    icon::WeatherIcon,
    model::{ForecastDay, UnitSystem, WeatherReport, WeatherSnapshot},
    provider::openweather::{OwCurrentResponse, OwForecastResponse, OwWeather},
};

/// The forecast endpoint reports every 3 hours, so every 8th slot is one per day.
pub const FORECAST_STRIDE: usize = 8;

const UNKNOWN_DESCRIPTION: &str = "Unknown";

pub fn map_report(
    units: UnitSystem,
    current: &OwCurrentResponse,
    forecast: &OwForecastResponse,
) -> WeatherReport {
    WeatherReport {
        units,
        snapshot: map_current(current),
        forecast: sample_forecast(forecast),
    }
}

pub fn map_current(current: &OwCurrentResponse) -> WeatherSnapshot {
    let (icon, description) = condition(current.weather.first());

    WeatherSnapshot {
        humidity: current.main.humidity,
        wind_speed: current.wind.speed,
        temperature: floor_temp(current.main.temp),
        location: current.name.clone(),
        icon,
        description,
        min_temp: floor_temp(current.main.temp_min),
        max_temp: floor_temp(current.main.temp_max),
        observed_at: current.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    }
}

/// Keep slots 0, 8, 16, ... verbatim. Day boundaries are not inspected.
pub fn sample_forecast(forecast: &OwForecastResponse) -> Vec<ForecastDay> {
    forecast
        .list
        .iter()
        .step_by(FORECAST_STRIDE)
        .map(|entry| {
            let (icon, description) = condition(entry.weather.first());
            ForecastDay {
                date: date_part(&entry.dt_txt).to_string(),
                avg_temp: floor_temp(entry.main.temp),
                description,
                icon,
            }
        })
        .collect()
}

/// Floors, never rounds: 21.9 and 21.1 both become 21.
pub fn floor_temp(value: f64) -> i32 {
    value.floor() as i32
}

fn condition(weather: Option<&OwWeather>) -> (WeatherIcon, String) {
    match weather {
        Some(w) => (WeatherIcon::from_code(&w.icon), w.description.clone()),
        None => (WeatherIcon::default(), UNKNOWN_DESCRIPTION.to_string()),
    }
}

/// `"2024-05-01 12:00:00"` -> `"2024-05-01"`
fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}
