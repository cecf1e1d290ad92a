use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::WeatherError,
    mapper,
    model::{WeatherReport, WeatherRequest},
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
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/weather?q=..&units=..&appid=..`
    pub fn current_url(&self, request: &WeatherRequest) -> Result<Url, WeatherError> {
        self.endpoint_url("weather", request)
    }

    /// `{base}/forecast?q=..&units=..&appid=..`
    pub fn forecast_url(&self, request: &WeatherRequest) -> Result<Url, WeatherError> {
        self.endpoint_url("forecast", request)
    }

    fn endpoint_url(&self, endpoint: &str, request: &WeatherRequest) -> Result<Url, WeatherError> {
        Url::parse_with_params(
            &format!("{}/{endpoint}", self.base_url),
            &[
                ("q", request.city.as_str()),
                ("units", request.units.as_str()),
                ("appid", self.api_key.as_str()),
            ],
        )
        .map_err(WeatherError::transport)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, kind: &str, url: Url) -> Result<T, WeatherError> {
        let res = self.http.get(url).send().await.map_err(|e| {
            tracing::debug!("OpenWeather {kind} request failed to send: {e}");
            WeatherError::transport(e)
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            tracing::debug!("Failed to read OpenWeather {kind} response body: {e}");
            WeatherError::transport(e)
        })?;

        // The body is JSON on both paths; a non-JSON error page is a transport failure.
        if !status.is_success() {
            let parsed: Value = serde_json::from_str(&body).map_err(|e| {
                tracing::debug!(
                    "OpenWeather {kind} error body is not JSON ({e}): {}",
                    truncate_body(&body)
                );
                WeatherError::transport(e)
            })?;
            tracing::warn!("OpenWeather {kind} request failed with status {status}");
            return Err(WeatherError::provider(error_message(&parsed)));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Failed to parse OpenWeather {kind} JSON ({e}): {}", truncate_body(&body));
            WeatherError::transport(e)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWind {
    pub speed: f64,
}

/// Body of `/weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    #[serde(default)]
    pub dt: Option<i64>,
    pub main: OwMain,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastEntry {
    pub dt_txt: String,
    pub main: OwForecastMain,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
}

/// Body of `/forecast`: 3-hour slots, oldest first.
#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastResponse {
    pub list: Vec<OwForecastEntry>,
}

/// `message` of an error body such as `{"cod":"404","message":"city not found"}`.
/// Bodies that are not objects, or whose message is not a string, have none.
fn error_message(body: &Value) -> Option<String> {
    body.get("message").and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_report(&self, request: &WeatherRequest) -> Result<WeatherReport, WeatherError> {
        let current_url = self.current_url(request)?;
        let forecast_url = self.forecast_url(request)?;

        tracing::debug!(city = %request.city, units = %request.units, "fetching current weather and forecast");

        let (current, forecast) = tokio::join!(
            self.fetch_json::<OwCurrentResponse>("current", current_url),
            self.fetch_json::<OwForecastResponse>("forecast", forecast_url),
        );

        // Current weather's error wins when both fail.
        let current = current?;
        let forecast = forecast?;

        Ok(mapper::map_report(request.units, &current, &forecast))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitSystem;
    use serde_json::json;

    #[test]
    fn urls_carry_city_units_and_key() {
        let provider = OpenWeatherProvider::new("KEY".into());
        let request = WeatherRequest::new("London", UnitSystem::Imperial);

        let current = provider.current_url(&request).unwrap();
        assert_eq!(
            current.as_str(),
            "https://api.openweathermap.org/data/2.5/weather?q=London&units=imperial&appid=KEY"
        );

        let forecast = provider.forecast_url(&request).unwrap();
        assert_eq!(
            forecast.as_str(),
            "https://api.openweathermap.org/data/2.5/forecast?q=London&units=imperial&appid=KEY"
        );
    }

    #[test]
    fn city_is_percent_encoded() {
        let provider = OpenWeatherProvider::new("KEY".into());
        let request = WeatherRequest::new("São Paulo", UnitSystem::Metric);

        let url = provider.current_url(&request).unwrap();
        let q = url.query_pairs().find(|(k, _)| k == "q").map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some("São Paulo"));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let provider = OpenWeatherProvider::with_base_url("KEY".into(), "http://localhost:9000/");
        assert_eq!(provider.base_url(), "http://localhost:9000");

        let url = provider.forecast_url(&WeatherRequest::new("Oslo", UnitSystem::Metric)).unwrap();
        assert!(url.as_str().starts_with("http://localhost:9000/forecast?"));
    }

    #[test]
    fn invalid_base_url_is_transport_error() {
        let provider = OpenWeatherProvider::with_base_url("KEY".into(), "not a url");
        let err = provider
            .current_url(&WeatherRequest::new("Oslo", UnitSystem::Metric))
            .unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)));
    }

    #[test]
    fn error_message_only_from_string_field_of_object() {
        assert_eq!(
            error_message(&json!({ "cod": "404", "message": "city not found" })).as_deref(),
            Some("city not found")
        );
        assert_eq!(error_message(&json!({ "message": 404 })), None);
        assert_eq!(error_message(&json!("Bad Gateway")), None);
        assert_eq!(error_message(&json!([])), None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
