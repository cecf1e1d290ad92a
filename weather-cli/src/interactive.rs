//! Interactive widget loop.

use anyhow::Result;
use inquire::{Confirm, InquireError, Select, Text};
use std::fmt;
use weather_core::{WeatherWidget, icon::aux};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    ToggleUnits(&'static str),
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => write!(f, "{} Search city", aux::SEARCH),
            Action::ToggleUnits(label) => f.write_str(label),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

pub async fn run(mut widget: WeatherWidget) -> Result<()> {
    // Initial load, as if the widget had just been mounted.
    if refresh(&mut widget, None).await? == Flow::Exit {
        return Ok(());
    }

    loop {
        let actions = vec![
            Action::Search,
            Action::ToggleUnits(render::toggle_label(widget.units())),
            Action::Quit,
        ];

        let action = match Select::new("Weather", actions).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::Search => {
                let city = match Text::new("Search city...").prompt() {
                    Ok(city) => city,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(err) => return Err(err.into()),
                };
                if refresh(&mut widget, Some(&city)).await? == Flow::Exit {
                    break;
                }
            }
            Action::ToggleUnits(_) => {
                widget.flip_units();
                if refresh(&mut widget, None).await? == Flow::Exit {
                    break;
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Whether the loop keeps going after a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Searches `city` (or the current city), showing the loading panel while in flight.
async fn refresh(widget: &mut WeatherWidget, city: Option<&str>) -> Result<Flow> {
    let city = city.map_or_else(|| widget.current_city().to_string(), str::to_string);

    let ticket = match widget.begin_search(&city) {
        Ok(ticket) => ticket,
        Err(rejected) => return alert(&rejected.to_string()),
    };
    print_panel(widget);

    let result = widget.fetch(&ticket).await;
    if widget.complete_search(&ticket, result) {
        print_panel(widget);
    }
    Ok(Flow::Continue)
}

fn print_panel(widget: &WeatherWidget) {
    println!();
    println!("{}", render::render(widget.state()));
    println!();
}

/// Blocks until the user acknowledges.
fn alert(message: &str) -> Result<Flow> {
    let answer = Confirm::new(message)
        .with_default(true)
        .with_help_message("Press Enter to continue")
        .prompt();
    flow_after_alert(answer)
}

/// Esc dismisses the alert like Enter; Ctrl-C leaves the widget.
fn flow_after_alert(answer: Result<bool, InquireError>) -> Result<Flow> {
    match answer {
        Ok(_) | Err(InquireError::OperationCanceled) => Ok(Flow::Continue),
        Err(InquireError::OperationInterrupted) => Ok(Flow::Exit),
        Err(err) => Err(err.into()),
    }
}
