//! Text rendering of the widget panel.

use chrono::NaiveDate;
use std::fmt::Write;
use weather_core::{
    ForecastDay, RenderMode, UnitSystem, ViewState, WeatherReport, icon::aux,
};

pub const LOADING_TEXT: &str = "Loading...";
pub const NO_DATA_TEXT: &str = "No data available";

/// Render whichever single mode the state is in.
pub fn render(state: &ViewState) -> String {
    match state.render_mode() {
        RenderMode::Loading => LOADING_TEXT.to_string(),
        RenderMode::Error(message) => message.to_string(),
        RenderMode::Data(report) => render_report(report),
        RenderMode::NoData => NO_DATA_TEXT.to_string(),
    }
}

/// Label of the unit toggle for the units currently in effect.
pub fn toggle_label(units: UnitSystem) -> &'static str {
    units.switch_label()
}

pub fn render_report(report: &WeatherReport) -> String {
    let snap = &report.snapshot;
    let deg = report.units.temperature_suffix();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}  {}{deg}", snap.icon.glyph(), snap.temperature);
    let _ = writeln!(out, "{}", snap.location);
    let _ = writeln!(out, "{}", snap.description);
    let _ = writeln!(out, "Min: {}{deg}, Max: {}{deg}", snap.min_temp, snap.max_temp);
    let _ = writeln!(
        out,
        "{} {}% Humidity    {} {} {} Wind Speed",
        aux::HUMIDITY,
        snap.humidity,
        aux::WIND,
        snap.wind_speed,
        report.units.speed_label(),
    );

    if !report.forecast.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "5-Day Forecast");
        for day in &report.forecast {
            let _ = writeln!(out, "{}", forecast_line(day, deg));
        }
    }

    out.trim_end().to_string()
}

fn forecast_line(day: &ForecastDay, deg: &str) -> String {
    let weekday = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
        .map(|d| d.format("%a").to_string())
        .unwrap_or_default();

    format!(
        "  {} {:<3} {}  {:>4}{deg}  {}",
        day.date,
        weekday,
        day.icon.glyph(),
        day.avg_temp,
        day.description
    )
}
