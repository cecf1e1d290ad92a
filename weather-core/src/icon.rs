use serde::{Deserialize, Serialize};

/// Bundled pictograms that provider icon codes resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    #[default]
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

impl WeatherIcon {
    /// Resolve an OpenWeather icon code such as `"10n"`.
    ///
    /// Codes outside the known set (thunderstorm, mist, typos) fall back to
    /// [`WeatherIcon::Clear`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "01d" | "01n" => WeatherIcon::Clear,
            "02d" | "02n" | "03d" | "03n" => WeatherIcon::Cloud,
            "04d" | "04n" => WeatherIcon::Drizzle,
            "09d" | "09n" | "10d" | "10n" => WeatherIcon::Rain,
            "13d" | "13n" => WeatherIcon::Snow,
            _ => WeatherIcon::Clear,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "\u{2600}",    // ☀
            WeatherIcon::Cloud => "\u{2601}",    // ☁
            WeatherIcon::Drizzle => "\u{1F326}", // 🌦
            WeatherIcon::Rain => "\u{1F327}",    // 🌧
            WeatherIcon::Snow => "\u{2744}",     // ❄
        }
    }
}

/// Auxiliary icons next to the search field and the humidity/wind readouts.
pub mod aux {
    pub const SEARCH: &str = "\u{1F50D}"; // 🔍
    pub const HUMIDITY: &str = "\u{1F4A7}"; // 💧
    pub const WIND: &str = "\u{1F32C}"; // 🌬
}
