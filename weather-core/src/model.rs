use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{error::ParseUnitSystemError, icon::WeatherIcon};

/// Unit system applied both to the outgoing request and to the display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Km/h",
            UnitSystem::Imperial => "Mph",
        }
    }

    /// Text of the toggle control: names the system you would switch *to*.
    pub fn switch_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Switch to °F",
            UnitSystem::Imperial => "Switch to °C",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = ParseUnitSystemError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(ParseUnitSystemError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
    pub units: UnitSystem,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>, units: UnitSystem) -> Self {
        Self { city: city.into(), units }
    }
}

/// Current conditions, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub humidity: u8,
    pub wind_speed: f64,
    pub temperature: i32,
    pub location: String,
    pub icon: WeatherIcon,
    pub description: String,
    pub min_temp: i32,
    pub max_temp: i32,
    pub observed_at: Option<DateTime<Utc>>,
}

/// One sampled forecast slot per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub avg_temp: i32,
    pub description: String,
    pub icon: WeatherIcon,
}

/// Snapshot and forecast from a single search. They are never shown apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub units: UnitSystem,
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,
}
