use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weather_core::{
    Config, RenderMode, SearchOutcome, UnitSystem, WeatherWidget, provider_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Terminal weather widget")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, default city and units.
    Configure,

    /// Show current weather and the 5-day forecast for a city, then exit.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        #[command(flatten)]
        units: UnitsArg,

        /// Print the report as JSON instead of the text panel.
        #[arg(long)]
        json: bool,
    },

    /// Interactive widget: search cities and switch units (default command).
    Widget {
        #[command(flatten)]
        units: UnitsArg,
    },
}

#[derive(Debug, Clone, Args)]
pub struct UnitsArg {
    /// Unit system: metric or imperial. Defaults to the configured one.
    #[arg(long, short = 'u')]
    pub units: Option<UnitSystem>,
}

impl UnitsArg {
    fn resolve(&self, config: &Config) -> UnitSystem {
        self.units.unwrap_or_else(|| config.default_units())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Widget {
            units: UnitsArg { units: None },
        });
        tracing::debug!(?command, "running command");

        match command {
            Command::Configure => configure(),
            Command::Show { city, units, json } => {
                let config = Config::load()?;
                let units = units.resolve(&config);
                let city = city.unwrap_or_else(|| config.default_city().to_string());
                show(&config, &city, units, json).await
            }
            Command::Widget { units } => {
                let config = Config::load()?;
                let units = units.resolve(&config);
                let widget = WeatherWidget::new(provider_from_config(&config)?, config.default_city(), units);
                interactive::run(widget).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("API key prompt aborted")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("City prompt aborted")?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let current = config.default_units();
    let start = UnitSystem::all().iter().position(|u| *u == current).unwrap_or(0);
    let units = Select::new("Default units:", UnitSystem::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Units prompt aborted")?;
    config.units = Some(units);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, city: &str, units: UnitSystem, json: bool) -> anyhow::Result<()> {
    let mut widget = WeatherWidget::new(provider_from_config(config)?, config.default_city(), units);

    if let SearchOutcome::Rejected(reason) = widget.search(city).await {
        bail!("{reason}");
    }

    match widget.state().render_mode() {
        RenderMode::Error(message) => bail!("{message}"),
        RenderMode::Data(report) if json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        _ => println!("{}", render::render(widget.state())),
    }

    Ok(())
}
