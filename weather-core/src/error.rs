use thiserror::Error;

/// Shown when the provider rejects a request without saying why.
pub const PROVIDER_FALLBACK_MESSAGE: &str = "Error fetching forecast data";

/// Shown for every network or decoding failure.
pub const TRANSPORT_MESSAGE: &str = "Error in fetching weather data";

/// Terminal failure of one search attempt.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider answered with a non-success status.
    #[error("{0}")]
    Provider(String),

    /// The request could not be sent, or a body could not be read or decoded.
    #[error("Error in fetching weather data")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl WeatherError {
    pub fn provider(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| PROVIDER_FALLBACK_MESSAGE.to_string());
        WeatherError::Provider(message)
    }

    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        WeatherError::Transport(err.into())
    }

    /// Message for the error region.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown unit system '{0}'. Supported unit systems: metric, imperial.")]
pub struct ParseUnitSystemError(pub String);

/// Pre-flight validation failure; the fetcher is never reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchRejected {
    #[error("Enter city Name")]
    EmptyCity,
}
